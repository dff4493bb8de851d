//! Form boundary
//!
//! `EmployeeForm` plays the role of the registration screen: it calls the
//! store, turns every outcome into one feedback message and keeps the list
//! view in sync. Nothing fails past this boundary; methods report through
//! feedback and return what the caller needs to reset its inputs.

use std::sync::Arc;
use std::time::Instant;

use cadastro_core::{
    log_op_end, log_op_error, log_op_start, Employee, EmployeeDraft, EmployeeError, EmployeeId,
    EmployeePatch,
};

use crate::feedback::{FeedbackSink, Operation};
use crate::store::EmployeeStore;

/// Displays the employee list
///
/// Each call replaces whatever was shown before.
pub trait ListView: Send + Sync {
    fn render(&self, employees: &[Employee]);
}

pub struct EmployeeForm {
    store: EmployeeStore,
    feedback: Arc<dyn FeedbackSink>,
    view: Arc<dyn ListView>,
}

impl EmployeeForm {
    pub fn new(store: EmployeeStore, feedback: Arc<dyn FeedbackSink>, view: Arc<dyn ListView>) -> Self {
        Self {
            store,
            feedback,
            view,
        }
    }

    pub fn store(&self) -> &EmployeeStore {
        &self.store
    }

    /// Open the store and show the current list
    ///
    /// Returns whether the list was loaded.
    pub async fn start(&self) -> bool {
        self.connect().await && self.refresh().await
    }

    /// Open the store without loading the list
    ///
    /// Only a failure is reported.
    pub async fn connect(&self) -> bool {
        log_op_start!("form_connect");
        let start = Instant::now();

        if let Err(e) = self.store.open().await {
            self.report("form_connect", Operation::List, e, start);
            return false;
        }

        log_op_end!("form_connect", duration_ms = start.elapsed().as_millis() as u64);
        true
    }

    /// Reload the list, render it and announce the result
    pub async fn refresh(&self) -> bool {
        self.reload(true).await
    }

    /// Validate and store a new employee from raw form fields
    ///
    /// Returns the new id on success so the caller can clear its inputs.
    pub async fn submit<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Option<EmployeeId>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        log_op_start!("form_submit");
        let start = Instant::now();

        let added = match EmployeeDraft::from_fields(fields) {
            Ok(draft) => self.store.add(draft).await,
            Err(e) => Err(e),
        };

        match added {
            Ok(id) => {
                log_op_end!(
                    "form_submit",
                    duration_ms = start.elapsed().as_millis() as u64,
                    employee_id = id.get()
                );
                self.feedback.show(Operation::Add.success());
                self.reload(false).await;
                Some(id)
            }
            Err(e) => {
                self.report("form_submit", Operation::Add, e, start);
                None
            }
        }
    }

    /// Apply the supplied raw form fields to an existing employee
    pub async fn edit<K, V>(
        &self,
        id: EmployeeId,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Option<Employee>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        log_op_start!("form_edit", employee_id = id.get());
        let start = Instant::now();

        let updated = match EmployeePatch::from_fields(fields) {
            Ok(patch) => self.store.update(id, patch).await,
            Err(e) => Err(e),
        };

        match updated {
            Ok(employee) => {
                log_op_end!(
                    "form_edit",
                    duration_ms = start.elapsed().as_millis() as u64,
                    employee_id = id.get()
                );
                self.feedback.show(Operation::Update.success());
                self.reload(false).await;
                Some(employee)
            }
            Err(e) => {
                self.report("form_edit", Operation::Update, e, start);
                None
            }
        }
    }

    /// Delete an employee; returns whether a record was removed
    pub async fn remove(&self, id: EmployeeId) -> bool {
        log_op_start!("form_remove", employee_id = id.get());
        let start = Instant::now();

        match self.store.delete(id).await {
            Ok(()) => {
                log_op_end!(
                    "form_remove",
                    duration_ms = start.elapsed().as_millis() as u64,
                    employee_id = id.get()
                );
                self.feedback.show(Operation::Delete.success());
                self.reload(false).await;
                true
            }
            Err(e) => {
                self.report("form_remove", Operation::Delete, e, start);
                false
            }
        }
    }

    // After a mutation the view is rebuilt silently so the mutation's own
    // message stays on screen. A silent reload that fails is only logged.
    async fn reload(&self, announce: bool) -> bool {
        log_op_start!("form_refresh");
        let start = Instant::now();

        match self.store.list().await {
            Ok(employees) => {
                self.view.render(&employees);
                log_op_end!(
                    "form_refresh",
                    duration_ms = start.elapsed().as_millis() as u64,
                    row_count = employees.len()
                );
                if announce {
                    self.feedback.show(Operation::List.success());
                }
                true
            }
            Err(e) if announce => {
                self.report("form_refresh", Operation::List, e, start);
                false
            }
            Err(e) => {
                log_op_error!(
                    "form_refresh",
                    e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                false
            }
        }
    }

    fn report(&self, op: &'static str, operation: Operation, err: EmployeeError, start: Instant) {
        let feedback = operation.failure(&err);
        log_op_error!(op, err, duration_ms = start.elapsed().as_millis() as u64);
        self.feedback.show(feedback);
    }
}
