//! User feedback
//!
//! Every form operation ends with exactly one `Feedback` message. The
//! messages are the pt-BR strings the registration screen has always shown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadastro_core::rules::validation::REASON_REQUIRED;
use cadastro_core::{EmployeeError, EmployeeField};

pub const ADD_OK: &str = "Funcionário cadastrado com sucesso!";
pub const ADD_ERROR: &str = "Erro ao cadastrar funcionário!";
pub const REQUIRED_FIELDS: &str = "Todos os campos são obrigatórios!";
pub const INVALID_CPF: &str = "CPF inválido!";
pub const INVALID_EMAIL: &str = "E-mail inválido!";
pub const LIST_OK: &str = "Lista de funcionários carregada com sucesso!";
pub const LIST_ERROR: &str = "Erro ao listar funcionários!";
pub const STORE_ERROR: &str = "Erro ao carregar banco de dados!";
pub const UPDATE_OK: &str = "Dados atualizados com sucesso!";
pub const UPDATE_ERROR: &str = "Erro ao atualizar funcionário!";
pub const NOT_FOUND: &str = "Funcionário não encontrado!";
pub const DELETE_OK: &str = "Funcionário removido com sucesso!";
pub const DELETE_ERROR: &str = "Erro ao remover funcionário!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// User-facing operation a feedback message reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn success(self) -> Feedback {
        Feedback::success(match self {
            Operation::List => LIST_OK,
            Operation::Add => ADD_OK,
            Operation::Update => UPDATE_OK,
            Operation::Delete => DELETE_OK,
        })
    }

    /// Map a failure of this operation to its message
    ///
    /// Specific causes (blank field, bad cpf/email, duplicate, missing
    /// record, closed store) get their own message; engine errors get the
    /// operation's generic one.
    pub fn failure(self, err: &EmployeeError) -> Feedback {
        let message = match err {
            EmployeeError::ValidationFailed { reason, .. } if reason == REASON_REQUIRED => {
                REQUIRED_FIELDS.to_string()
            }
            EmployeeError::ValidationFailed { field, .. }
                if field == EmployeeField::Cpf.as_str() =>
            {
                INVALID_CPF.to_string()
            }
            EmployeeError::ValidationFailed { field, .. }
                if field == EmployeeField::Email.as_str() =>
            {
                INVALID_EMAIL.to_string()
            }
            EmployeeError::ConstraintViolation { field } => {
                format!("Já existe um funcionário com este {}!", field_label(field))
            }
            EmployeeError::NotFound { .. } => NOT_FOUND.to_string(),
            EmployeeError::StoreUnavailable { .. } => STORE_ERROR.to_string(),
            _ => self.generic_error().to_string(),
        };
        Feedback::error(message)
    }

    fn generic_error(self) -> &'static str {
        match self {
            Operation::List => LIST_ERROR,
            Operation::Add => ADD_ERROR,
            Operation::Update => UPDATE_ERROR,
            Operation::Delete => DELETE_ERROR,
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "cpf" => "CPF",
        "email" => "e-mail",
        other => other,
    }
}

/// Receives the message produced at the end of each operation
pub trait FeedbackSink: Send + Sync {
    fn show(&self, feedback: Feedback);
}

/// A surface that can display and clear a message
pub trait FeedbackSurface: Send + Sync + 'static {
    fn display(&self, feedback: &Feedback);
    fn hide(&self);
}

/// Feedback sink that clears its surface a fixed time after each message
///
/// A newer message restarts the timer; the older timer no longer hides
/// anything. Outside a tokio runtime messages are shown but not hidden.
pub struct TransientFeedback<S> {
    inner: Arc<TransientInner<S>>,
}

struct TransientInner<S> {
    surface: S,
    hide_after: Duration,
    generation: AtomicU64,
}

impl<S: FeedbackSurface> TransientFeedback<S> {
    pub fn new(surface: S, hide_after: Duration) -> Self {
        Self {
            inner: Arc::new(TransientInner {
                surface,
                hide_after,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn surface(&self) -> &S {
        &self.inner.surface
    }
}

impl<S> Clone for TransientFeedback<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: FeedbackSurface> FeedbackSink for TransientFeedback<S> {
    fn show(&self, feedback: Feedback) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.surface.display(&feedback);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, feedback will not auto-hide");
            return;
        };

        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            tokio::time::sleep(inner.hide_after).await;
            if inner.generation.load(Ordering::SeqCst) == generation {
                inner.surface.hide();
            }
        });
    }
}
