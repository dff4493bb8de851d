#![allow(clippy::unwrap_used, clippy::expect_used)]

use cadastro_core::logging_facility::test_capture::init_test_capture;
use cadastro_core::{log_op_end, log_op_error, log_op_start, EmployeeError, EmployeeId};
use cadastro_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_FIELD,
    FIELD_ERR_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = EmployeeError::ConstraintViolation {
        field: "cpf".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);

    assert_eq!(error_events.len(), 1);
    let event = &error_events[0];
    assert_eq!(event.level, tracing::Level::ERROR);
    assert_eq!(event.field(FIELD_ERR_KIND), Some("ConstraintViolation"));
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_CONSTRAINT_VIOLATION"));
    assert_eq!(event.field(FIELD_ERR_FIELD), Some("cpf"));
}

#[test]
fn test_log_op_error_without_field_records_it_empty() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_5";

    let err = EmployeeError::NotFound {
        id: EmployeeId::new(999),
    };
    log_op_error!(op_name, err, duration_ms = 1, employee_id = 999_i64);

    let event = capture
        .find_event(op_name, EVENT_END_ERROR, "employee_id", "999")
        .unwrap();
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(event.field(FIELD_ERR_FIELD), Some(""));
}

#[test]
fn test_extra_fields_are_recorded() {
    let capture = init_test_capture();
    let op_name = "test_extra_fields_unique_4";

    log_op_start!(op_name, employee_id = 7_i64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("employee_id"), Some("7"));
    assert!(events[0].component.is_some());
}
