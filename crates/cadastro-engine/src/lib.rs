//! Cadastro Engine - Orchestration layer
//!
//! Wraps the blocking store in an async `EmployeeStore`, maps outcomes to
//! user feedback and drives the list view through `EmployeeForm`.

pub mod config;
pub mod feedback;
pub mod form;
pub mod store;

pub use config::CadastroConfig;
pub use feedback::{Feedback, FeedbackKind, FeedbackSink, FeedbackSurface, Operation, TransientFeedback};
pub use form::{EmployeeForm, ListView};
pub use store::{EmployeeCursor, EmployeeStore, StoreLocation, StoreState};
