// Integration tests for EmployeeForm: every outcome becomes one feedback
// message and the list view tracks the store.

use std::sync::{Arc, Mutex};

use cadastro_core::{Employee, EmployeeId};
use cadastro_engine::feedback::{
    ADD_ERROR, ADD_OK, DELETE_OK, INVALID_CPF, INVALID_EMAIL, LIST_OK, NOT_FOUND, REQUIRED_FIELDS,
    STORE_ERROR, UPDATE_OK,
};
use cadastro_engine::{EmployeeForm, EmployeeStore, Feedback, FeedbackKind, FeedbackSink, ListView};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingSink {
    shown: Mutex<Vec<Feedback>>,
}

impl RecordingSink {
    fn messages(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.message.clone())
            .collect()
    }

    fn last(&self) -> Feedback {
        self.shown.lock().unwrap().last().cloned().unwrap()
    }
}

impl FeedbackSink for RecordingSink {
    fn show(&self, feedback: Feedback) {
        self.shown.lock().unwrap().push(feedback);
    }
}

#[derive(Default)]
struct RecordingView {
    renders: Mutex<Vec<Vec<Employee>>>,
}

impl RecordingView {
    fn current(&self) -> Vec<Employee> {
        self.renders.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }
}

impl ListView for RecordingView {
    fn render(&self, employees: &[Employee]) {
        self.renders.lock().unwrap().push(employees.to_vec());
    }
}

struct Harness {
    form: EmployeeForm,
    sink: Arc<RecordingSink>,
    view: Arc<RecordingView>,
}

fn harness(store: EmployeeStore) -> Harness {
    let sink = Arc::new(RecordingSink::default());
    let view = Arc::new(RecordingView::default());
    let form = EmployeeForm::new(store, sink.clone(), view.clone());
    Harness { form, sink, view }
}

async fn started() -> Harness {
    let h = harness(EmployeeStore::in_memory());
    assert!(h.form.start().await);
    h
}

fn ana_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("nome", "Ana Silva"),
        ("cpf", "123.456.789-00"),
        ("email", "ana@x.com"),
        ("telefone", "11999999999"),
        ("data_nascimento", "1990-01-01"),
        ("cargo", "Dev"),
    ]
}

fn with_field(key: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
    ana_fields()
        .into_iter()
        .map(|(k, v)| if k == key { (k, value) } else { (k, v) })
        .collect()
}

#[tokio::test]
async fn test_start_renders_empty_list_and_announces_it() {
    let h = started().await;

    assert_eq!(h.view.render_count(), 1);
    assert!(h.view.current().is_empty());
    assert_eq!(h.sink.messages(), vec![LIST_OK.to_string()]);
}

#[tokio::test]
async fn test_submit_adds_and_rerenders() {
    let h = started().await;

    let id = h.form.submit(ana_fields()).await;

    assert_eq!(id, Some(EmployeeId::new(1)));
    assert_eq!(h.sink.last(), Feedback::success(ADD_OK));
    let current = h.view.current();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].nome, "Ana Silva");
}

#[tokio::test]
async fn test_submit_blank_field_reports_required() {
    let h = started().await;

    let id = h.form.submit(with_field("telefone", "  ")).await;

    assert_eq!(id, None);
    assert_eq!(h.sink.last().message, REQUIRED_FIELDS);
    assert_eq!(h.sink.last().kind, FeedbackKind::Error);
    assert_eq!(h.view.render_count(), 1);
}

#[tokio::test]
async fn test_submit_missing_key_reports_required() {
    let h = started().await;
    let mut fields = ana_fields();
    fields.retain(|(k, _)| *k != "cargo");

    assert_eq!(h.form.submit(fields).await, None);
    assert_eq!(h.sink.last().message, REQUIRED_FIELDS);
}

#[tokio::test]
async fn test_submit_bad_cpf_and_email() {
    let h = started().await;

    assert_eq!(h.form.submit(with_field("cpf", "123")).await, None);
    assert_eq!(h.sink.last().message, INVALID_CPF);

    assert_eq!(h.form.submit(with_field("email", "ana@")).await, None);
    assert_eq!(h.sink.last().message, INVALID_EMAIL);

    assert!(h.form.store().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_with_id_key_is_rejected() {
    let h = started().await;
    let mut fields = ana_fields();
    fields.push(("id", "10"));

    assert_eq!(h.form.submit(fields).await, None);
    assert_eq!(h.sink.last().message, ADD_ERROR);
}

#[tokio::test]
async fn test_submit_duplicate_names_the_field() {
    let h = started().await;
    h.form.submit(ana_fields()).await.unwrap();

    let mut other = with_field("cpf", "123.456.789-00");
    for (k, v) in other.iter_mut() {
        match *k {
            "email" => *v = "outra@x.com",
            "telefone" => *v = "11888888888",
            _ => {}
        }
    }

    assert_eq!(h.form.submit(other).await, None);
    assert_eq!(h.sink.last().message, "Já existe um funcionário com este CPF!");
}

#[tokio::test]
async fn test_edit_updates_and_rerenders() {
    let h = started().await;
    let id = h.form.submit(ana_fields()).await.unwrap();

    let updated = h.form.edit(id, [("cargo", "Gerente")]).await;

    assert_eq!(updated.map(|e| e.cargo), Some("Gerente".to_string()));
    assert_eq!(h.sink.last().message, UPDATE_OK);
    assert_eq!(h.view.current()[0].cargo, "Gerente");
}

#[tokio::test]
async fn test_edit_missing_record() {
    let h = started().await;

    assert!(h.form.edit(EmployeeId::new(3), [("nome", "X")]).await.is_none());
    assert_eq!(h.sink.last().message, NOT_FOUND);
}

#[tokio::test]
async fn test_remove_and_remove_again() {
    let h = started().await;
    let id = h.form.submit(ana_fields()).await.unwrap();

    assert!(h.form.remove(id).await);
    assert_eq!(h.sink.last().message, DELETE_OK);
    assert!(h.view.current().is_empty());

    assert!(!h.form.remove(id).await);
    assert_eq!(h.sink.last().message, NOT_FOUND);
}

#[tokio::test]
async fn test_every_operation_emits_exactly_one_message() {
    let h = started().await;
    let before = h.sink.messages().len();

    let id = h.form.submit(ana_fields()).await.unwrap();
    h.form.edit(id, [("nome", "Ana S.")]).await.unwrap();
    h.form.remove(id).await;
    h.form.refresh().await;

    assert_eq!(
        h.sink.messages()[before..].to_vec(),
        vec![ADD_OK, UPDATE_OK, DELETE_OK, LIST_OK]
    );
}

#[tokio::test]
async fn test_submit_before_start_reports_store_error() {
    let h = harness(EmployeeStore::in_memory());

    assert_eq!(h.form.submit(ana_fields()).await, None);
    assert_eq!(h.sink.last().message, STORE_ERROR);
}

#[tokio::test]
async fn test_start_on_unreadable_database() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("FuncionariosDB.sqlite3");
    std::fs::write(&path, vec![0xFF; 4096]).unwrap();
    let h = harness(EmployeeStore::at_path(&path));

    assert!(!h.form.start().await);
    assert_eq!(h.sink.messages(), vec![STORE_ERROR.to_string()]);
    assert_eq!(h.view.render_count(), 0);
}

#[tokio::test]
async fn test_connect_is_silent_on_success() {
    let h = harness(EmployeeStore::in_memory());

    assert!(h.form.connect().await);
    assert!(h.sink.messages().is_empty());
    assert_eq!(h.view.render_count(), 0);

    assert!(h.form.submit(ana_fields()).await.is_some());
    assert_eq!(h.sink.messages(), vec![ADD_OK.to_string()]);
}

/// Drops the collection as soon as an add is confirmed, so the follow-up
/// reload hits a missing table.
struct TableDroppingSink {
    path: std::path::PathBuf,
    inner: RecordingSink,
}

impl FeedbackSink for TableDroppingSink {
    fn show(&self, feedback: Feedback) {
        if feedback.message == ADD_OK {
            let conn = rusqlite::Connection::open(&self.path).unwrap();
            conn.execute_batch("DROP TABLE funcionarios").unwrap();
        }
        self.inner.show(feedback);
    }
}

#[tokio::test]
async fn test_failed_reload_after_submit_keeps_single_message() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("FuncionariosDB.sqlite3");
    let sink = Arc::new(TableDroppingSink {
        path: path.clone(),
        inner: RecordingSink::default(),
    });
    let view = Arc::new(RecordingView::default());
    let form = EmployeeForm::new(EmployeeStore::at_path(&path), sink.clone(), view.clone());
    assert!(form.connect().await);

    assert_eq!(form.submit(ana_fields()).await, Some(EmployeeId::new(1)));

    assert_eq!(sink.inner.messages(), vec![ADD_OK.to_string()]);
    assert_eq!(view.render_count(), 0);
}
