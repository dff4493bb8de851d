pub mod employee;

pub use employee::{Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeeIndex, EmployeePatch};
