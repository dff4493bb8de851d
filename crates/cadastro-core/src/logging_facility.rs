//! Operation logging for the employee registry
//!
//! Every store and form operation brackets its work with a pair of events
//! sharing an `op` name:
//!
//! | layer | ops |
//! |-------|-----|
//! | store | `store_open`, `store_close`, `employee_list`, `employee_scan`, `employee_get`, `employee_find_by`, `employee_add`, `employee_update`, `employee_delete` |
//! | form  | `form_connect`, `form_refresh`, `form_submit`, `form_edit`, `form_remove` |
//!
//! A `start` event opens the pair and either `end` (with `duration_ms`) or
//! `end_error` (with `err_kind`, `err_code` and, for validation and
//! uniqueness failures, `err_field`) closes it. Store calls also carry a
//! `request_id`; calls about one record carry `employee_id`.
//!
//! The process picks its output once through [`init`], normally from the
//! `CADASTRO_LOG_PROFILE` setting:
//!
//! ```rust
//! use cadastro_core::logging_facility::{init, Profile};
//!
//! init("production".parse().unwrap_or(Profile::Development));
//! ```
//!
//! Tests install [`init_test_capture`] instead and assert on the recorded
//! pairs.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
