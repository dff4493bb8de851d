//! Command implementations

pub mod query;
pub mod register;

use std::path::PathBuf;
use std::sync::Arc;

use cadastro_engine::{CadastroConfig, EmployeeForm, EmployeeStore, ListView};

use crate::terminal::{JsonListView, LineListView, SilentListView, TerminalFeedback};

/// Settings shared by every command
pub struct Context {
    store: EmployeeStore,
    pub json: bool,
}

impl Context {
    pub fn new(config: &CadastroConfig, db: Option<PathBuf>, json: bool) -> Self {
        let store = match db {
            Some(path) => EmployeeStore::at_path(path),
            None => EmployeeStore::from_config(config),
        };
        Self { store, json }
    }

    pub fn store(&self) -> &EmployeeStore {
        &self.store
    }

    /// Form that prints the list after it loads
    pub fn listing_form(&self) -> EmployeeForm {
        let view: Arc<dyn ListView> = if self.json {
            Arc::new(JsonListView)
        } else {
            Arc::new(LineListView)
        };
        EmployeeForm::new(self.store.clone(), Arc::new(TerminalFeedback), view)
    }

    /// Form for mutations; the refreshed list is not printed
    pub fn editing_form(&self) -> EmployeeForm {
        EmployeeForm::new(
            self.store.clone(),
            Arc::new(TerminalFeedback),
            Arc::new(SilentListView),
        )
    }
}
