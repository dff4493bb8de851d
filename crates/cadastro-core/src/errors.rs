use cadastro_core_types::RequestId;
use thiserror::Error;

use crate::model::EmployeeId;

/// Result type alias using EmployeeError
pub type Result<T> = std::result::Result<T, EmployeeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in structured logs and by
/// callers that branch on the failure class rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// The store is not open, is still opening, or failed to open
    StoreUnavailable,
    /// Local pre-submission check rejected the input
    ValidationFailed,
    /// A unique index rejected the write
    ConstraintViolation,
    /// The target record does not exist
    NotFound,
    /// Engine error while reading
    ReadFailed,
    /// Engine error while writing
    WriteFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ReadFailed => "ERR_READ_FAILED",
            ExErrorKind::WriteFailed => "ERR_WRITE_FAILED",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context for log output.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the offending field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (employee_id: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Classified failure of an employee store operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmployeeError {
    /// Store is not ready (never opened, opening, closed, or failed to open)
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Input rejected before reaching the store
    #[error("Validation failed for '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// A unique index (cpf, email, telefone) rejected the write
    #[error("Constraint violation: duplicate value for '{field}'")]
    ConstraintViolation { field: String },

    /// No record with the given id
    #[error("Employee not found: {id}")]
    NotFound { id: EmployeeId },

    /// Engine error during a read or scan
    #[error("Read failed: {reason}")]
    ReadFailed { reason: String },

    /// Engine error during a mutation
    #[error("Write failed: {reason}")]
    WriteFailed { reason: String },
}

impl EmployeeError {
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        EmployeeError::StoreUnavailable {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EmployeeError::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<EmployeeError> for ExError {
    fn from(err: EmployeeError) -> Self {
        let message = err.to_string();
        match err {
            EmployeeError::StoreUnavailable { .. } => {
                ExError::new(ExErrorKind::StoreUnavailable).with_message(message)
            }
            EmployeeError::ValidationFailed { field, .. } => {
                ExError::new(ExErrorKind::ValidationFailed)
                    .with_field(field)
                    .with_message(message)
            }
            EmployeeError::ConstraintViolation { field } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_field(field)
                    .with_message(message)
            }
            EmployeeError::NotFound { id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(id.to_string())
                .with_message(message),
            EmployeeError::ReadFailed { .. } => {
                ExError::new(ExErrorKind::ReadFailed).with_message(message)
            }
            EmployeeError::WriteFailed { .. } => {
                ExError::new(ExErrorKind::WriteFailed).with_message(message)
            }
        }
    }
}
