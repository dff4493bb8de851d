use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{EmployeeError, Result};
use crate::model::{EmployeeDraft, EmployeeField, EmployeePatch};

static CPF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("valid CPF pattern"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid e-mail pattern")
});

pub const REASON_REQUIRED: &str = "required";
pub const REASON_CPF_FORMAT: &str = "must match NNN.NNN.NNN-NN";
pub const REASON_EMAIL_FORMAT: &str = "must be a valid e-mail address";

/// CPF in the masked `NNN.NNN.NNN-NN` form with ASCII digits (format only,
/// no check digits)
pub fn is_valid_cpf(cpf: &str) -> bool {
    CPF_PATTERN.is_match(cpf)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate a draft for insertion and return its trimmed form
///
/// Checks run in form order: every field must be present (non-blank)
/// before any format check, so a form with a blank field and a bad CPF
/// reports the blank field.
///
/// # Errors
///
/// `ValidationFailed` naming the first offending field.
pub fn validate_draft(draft: &EmployeeDraft) -> Result<EmployeeDraft> {
    let draft = draft.trimmed();

    for field in EmployeeField::ALL {
        if draft.value(field).is_empty() {
            return Err(EmployeeError::validation(field.as_str(), REASON_REQUIRED));
        }
    }

    check_format(EmployeeField::Cpf, &draft.cpf)?;
    check_format(EmployeeField::Email, &draft.email)?;

    Ok(draft)
}

/// Validate the supplied fields of a patch and return its trimmed form
///
/// A supplied field must be non-blank and, for cpf and email, well formed.
/// An empty patch is valid (it writes the record back unchanged).
///
/// # Errors
///
/// `ValidationFailed` naming the first offending field.
pub fn validate_patch(patch: &EmployeePatch) -> Result<EmployeePatch> {
    let patch = patch.trimmed();

    for field in patch.fields() {
        let value = patch.value(field).unwrap_or_default();
        if value.is_empty() {
            return Err(EmployeeError::validation(field.as_str(), REASON_REQUIRED));
        }
        check_format(field, value)?;
    }

    Ok(patch)
}

fn check_format(field: EmployeeField, value: &str) -> Result<()> {
    match field {
        EmployeeField::Cpf if !is_valid_cpf(value) => {
            Err(EmployeeError::validation(field.as_str(), REASON_CPF_FORMAT))
        }
        EmployeeField::Email if !is_valid_email(value) => {
            Err(EmployeeError::validation(field.as_str(), REASON_EMAIL_FORMAT))
        }
        _ => Ok(()),
    }
}
