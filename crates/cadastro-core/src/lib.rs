//! Cadastro Core - employee domain kernel
//!
//! This crate provides the storage-independent half of the employee registry:
//! - `Employee` record model with draft and patch input shapes
//! - Field validation rules (required fields, CPF and e-mail formats)
//! - The `EmployeeError` taxonomy and the structured `ExError` facility
//! - The structured logging facility shared by the store and engine layers

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Re-export commonly used types
pub use errors::{EmployeeError, ExError, ExErrorKind, Result};
pub use model::{Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeeIndex, EmployeePatch};
