//! Field rules applied before anything reaches the store

pub mod validation;

pub use validation::{is_valid_cpf, is_valid_email, validate_draft, validate_patch};
