//! `start` / `end` / `end_error` event macros
//!
//! Each macro takes the op name first and any extra `key = value` tracing
//! fields last. Expansion refers to `cadastro_core_types` and `tracing` by
//! path, so calling crates depend on both.

/// Emit the `start` event of an operation
///
/// ```
/// # use cadastro_core::log_op_start;
/// log_op_start!("employee_add");
/// log_op_start!("employee_update", employee_id = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = cadastro_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Emit the `end` event of an operation that succeeded
///
/// ```
/// # use cadastro_core::log_op_end;
/// log_op_end!("employee_list", duration_ms = 4, row_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = cadastro_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Emit the `end_error` event of an operation that failed
///
/// Accepts anything convertible into `ExError`. Validation and uniqueness
/// failures also record the offending column as `err_field`; other
/// failures record it empty.
///
/// ```
/// # use cadastro_core::{log_op_error, EmployeeError};
/// let err = EmployeeError::ConstraintViolation { field: "cpf".to_string() };
/// log_op_error!("employee_add", err, duration_ms = 2);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = cadastro_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_field = ex_err.field().unwrap_or_default(),
            err_message = ex_err.message(),
            $($($field)*)?
        );
    }};
}
