//! Async employee store
//!
//! `EmployeeStore` owns the connection to the local database and exposes
//! each CRUD operation as an `async fn`. The blocking SQLite call runs on
//! the tokio blocking pool while the caller suspends.
//!
//! ## Handle lifecycle
//!
//! `Uninitialized -> Opening -> Ready`, or `Opening -> Failed`. Failed is
//! terminal. `close()` returns a Ready handle to `Uninitialized`. Every
//! operation other than `open()` requires `Ready` and otherwise fails with
//! `StoreUnavailable`.
//!
//! ## Logging
//!
//! Every operation emits `log_op_start!` at entry and `log_op_end!` or
//! `log_op_error!` at its terminal outcome, tagged with a request id.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cadastro_core::rules::{validate_draft, validate_patch};
use cadastro_core::{
    log_op_end, log_op_error, log_op_start, Employee, EmployeeDraft, EmployeeError, EmployeeId,
    EmployeeIndex, EmployeePatch, Result,
};
use cadastro_core_types::RequestId;
use cadastro_store::migrations::{apply_migrations_to, LATEST_VERSION};
use cadastro_store::{db, SqliteRepo};
use parking_lot::Mutex;
use rusqlite::Connection;
use tokio::sync::mpsc;

use crate::config::CadastroConfig;

/// Rows buffered between the scanning thread and the cursor
const CURSOR_CAPACITY: usize = 32;

/// Observable state of a store handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Opening,
    Ready,
    Failed,
}

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

type SharedConnection = Arc<Mutex<Connection>>;

enum Handle {
    Uninitialized,
    Opening,
    Ready(SharedConnection),
    Failed(String),
}

struct Inner {
    location: StoreLocation,
    schema_version: u32,
    handle: Mutex<Handle>,
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

/// Handle to the employee collection
///
/// Cheap to clone; clones share one connection and one lifecycle.
#[derive(Clone)]
pub struct EmployeeStore {
    inner: Arc<Inner>,
}

impl EmployeeStore {
    /// Create an unopened handle at the latest schema version
    pub fn new(location: StoreLocation) -> Self {
        Self::with_schema_version(location, LATEST_VERSION)
    }

    /// Create an unopened handle that opens the database at `schema_version`
    ///
    /// Opening a database already recorded at a newer version fails.
    pub fn with_schema_version(location: StoreLocation, schema_version: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                location,
                schema_version,
                handle: Mutex::new(Handle::Uninitialized),
            }),
        }
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreLocation::File(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    pub fn from_config(config: &CadastroConfig) -> Self {
        Self::at_path(config.database_path())
    }

    pub fn state(&self) -> StoreState {
        match &*self.inner.handle.lock() {
            Handle::Uninitialized => StoreState::Uninitialized,
            Handle::Opening => StoreState::Opening,
            Handle::Ready(_) => StoreState::Ready,
            Handle::Failed(_) => StoreState::Failed,
        }
    }

    /// Open the database, creating the collection and indexes on first use
    ///
    /// Opening a Ready handle is a no-op. Dropping the returned future
    /// does not abandon the open: it completes in the background.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the engine rejects the file, the recorded
    /// schema is newer than requested, a migration fails, another open is
    /// in flight, or an earlier open already failed.
    pub async fn open(&self) -> Result<()> {
        let request_id = RequestId::new();
        log_op_start!("store_open", request_id = %request_id);
        let start = Instant::now();

        self.open_impl().await.map_err(|e| {
            log_op_error!(
                "store_open",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            e
        })?;

        log_op_end!(
            "store_open",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id
        );
        Ok(())
    }

    async fn open_impl(&self) -> Result<()> {
        {
            let mut handle = self.inner.handle.lock();
            match &*handle {
                Handle::Ready(_) => return Ok(()),
                Handle::Opening => {
                    return Err(EmployeeError::store_unavailable("another open is in progress"))
                }
                Handle::Failed(reason) => {
                    return Err(EmployeeError::store_unavailable(format!(
                        "store failed to open: {}",
                        reason
                    )))
                }
                Handle::Uninitialized => {}
            }
            *handle = Handle::Opening;
        }

        // The blocking task owns the Opening -> Ready/Failed transition so a
        // dropped `open()` future cannot strand the handle in Opening.
        let inner = Arc::clone(&self.inner);
        let opened = tokio::task::spawn_blocking(move || {
            let opened = open_connection(&inner.location, inner.schema_version);
            let mut handle = inner.handle.lock();
            match opened {
                Ok(conn) => {
                    *handle = Handle::Ready(Arc::new(Mutex::new(conn)));
                    Ok(())
                }
                Err(e) => {
                    *handle = Handle::Failed(e.to_string());
                    Err(e)
                }
            }
        })
        .await;

        opened.unwrap_or_else(|e| {
            let err = EmployeeError::store_unavailable(format!("open task failed: {}", e));
            *self.inner.handle.lock() = Handle::Failed(err.to_string());
            Err(err)
        })
    }

    /// Release the connection and return to `Uninitialized`
    ///
    /// Operations already running finish on the connection they hold. A
    /// Failed handle stays Failed.
    pub fn close(&self) {
        log_op_start!("store_close");
        let start = Instant::now();

        let mut handle = self.inner.handle.lock();
        if matches!(*handle, Handle::Ready(_)) {
            *handle = Handle::Uninitialized;
        }
        drop(handle);

        log_op_end!("store_close", duration_ms = start.elapsed().as_millis() as u64);
    }

    /// All employees in ascending id order
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` when the store is not Ready, `ReadFailed` on an
    /// engine error during the scan.
    pub async fn list(&self) -> Result<Vec<Employee>> {
        let request_id = RequestId::new();
        log_op_start!("employee_list", request_id = %request_id);
        let start = Instant::now();

        let result = async {
            let conn = self.connection()?;
            run_blocking(conn, Access::Read, |c| SqliteRepo::list_employees(c)).await
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_list",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            e
        })?;

        log_op_end!(
            "employee_list",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            row_count = result.len()
        );
        Ok(result)
    }

    /// Stream employees in ascending id order through a cursor
    ///
    /// The scan holds the connection until the cursor is drained or
    /// dropped, so other operations on this store wait for it.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` when the store is not Ready. Engine errors during
    /// the scan arrive as a `ReadFailed` item on the cursor.
    pub async fn scan(&self) -> Result<EmployeeCursor> {
        log_op_start!("employee_scan");
        let start = Instant::now();

        let conn = self.connection().map_err(|e| {
            log_op_error!(
                "employee_scan",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        let (tx, rx) = mpsc::channel(CURSOR_CAPACITY);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let scanned = SqliteRepo::scan_employees(&guard, |employee| {
                match tx.blocking_send(Ok(employee)) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(()),
                }
            });
            if let Err(e) = scanned {
                tx.blocking_send(Err(e)).ok();
            }
        });

        log_op_end!("employee_scan", duration_ms = start.elapsed().as_millis() as u64);
        Ok(EmployeeCursor { rx })
    }

    /// Fetch one employee by id
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this id, `StoreUnavailable` when not
    /// Ready, `ReadFailed` on an engine error.
    pub async fn get(&self, id: EmployeeId) -> Result<Employee> {
        let request_id = RequestId::new();
        log_op_start!("employee_get", request_id = %request_id, employee_id = id.get());
        let start = Instant::now();

        let result = async {
            let conn = self.connection()?;
            run_blocking(conn, Access::Read, move |c| SqliteRepo::get_employee(c, id))
                .await?
                .ok_or(EmployeeError::NotFound { id })
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_get",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                employee_id = id.get()
            );
            e
        })?;

        log_op_end!(
            "employee_get",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            employee_id = id.get()
        );
        Ok(result)
    }

    /// Exact-match lookup through a secondary index
    ///
    /// The value is trimmed the same way form input is.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` when not Ready, `ReadFailed` on an engine error.
    pub async fn find_by(&self, index: EmployeeIndex, value: &str) -> Result<Vec<Employee>> {
        let request_id = RequestId::new();
        let field = index.field().as_str();
        log_op_start!("employee_find_by", request_id = %request_id, field = field);
        let start = Instant::now();

        let value = value.trim().to_string();
        let result = async {
            let conn = self.connection()?;
            run_blocking(conn, Access::Read, move |c| {
                SqliteRepo::find_by_index(c, index, &value)
            })
            .await
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_find_by",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                field = field
            );
            e
        })?;

        log_op_end!(
            "employee_find_by",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            field = field,
            row_count = result.len()
        );
        Ok(result)
    }

    /// Validate and insert a new employee, returning the assigned id
    ///
    /// Invalid input is rejected before the store is touched.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a blank field or a malformed cpf/email,
    /// `ConstraintViolation` when cpf, email or telefone is already taken,
    /// `StoreUnavailable` when not Ready, `WriteFailed` on an engine error.
    pub async fn add(&self, draft: EmployeeDraft) -> Result<EmployeeId> {
        let request_id = RequestId::new();
        log_op_start!("employee_add", request_id = %request_id);
        let start = Instant::now();

        let result = async {
            let draft = validate_draft(&draft)?;
            let conn = self.connection()?;
            run_blocking(conn, Access::Write, move |c| SqliteRepo::insert_employee(c, &draft))
                .await
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_add",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            e
        })?;

        log_op_end!(
            "employee_add",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            employee_id = result.get()
        );
        Ok(result)
    }

    /// Merge the supplied fields onto an existing employee
    ///
    /// Last write wins; there is no check that the record is unchanged
    /// since the caller read it.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a blank or malformed supplied field,
    /// `NotFound` if the id does not exist, `ConstraintViolation` on a
    /// unique collision, `StoreUnavailable` when not Ready, `WriteFailed`
    /// on an engine error.
    pub async fn update(&self, id: EmployeeId, patch: EmployeePatch) -> Result<Employee> {
        let request_id = RequestId::new();
        log_op_start!("employee_update", request_id = %request_id, employee_id = id.get());
        let start = Instant::now();

        let result = async {
            let patch = validate_patch(&patch)?;
            let conn = self.connection()?;
            run_blocking(conn, Access::Write, move |c| {
                SqliteRepo::update_employee(c, id, patch)
            })
            .await
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_update",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                employee_id = id.get()
            );
            e
        })?;

        log_op_end!(
            "employee_update",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            employee_id = id.get()
        );
        Ok(result)
    }

    /// Remove an employee by id
    ///
    /// # Errors
    ///
    /// `NotFound` if no record was removed, `StoreUnavailable` when not
    /// Ready, `WriteFailed` on an engine error.
    pub async fn delete(&self, id: EmployeeId) -> Result<()> {
        let request_id = RequestId::new();
        log_op_start!("employee_delete", request_id = %request_id, employee_id = id.get());
        let start = Instant::now();

        async {
            let conn = self.connection()?;
            run_blocking(conn, Access::Write, move |c| SqliteRepo::delete_employee(c, id)).await
        }
        .await
        .map_err(|e| {
            log_op_error!(
                "employee_delete",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                employee_id = id.get()
            );
            e
        })?;

        log_op_end!(
            "employee_delete",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            employee_id = id.get()
        );
        Ok(())
    }

    fn connection(&self) -> Result<SharedConnection> {
        match &*self.inner.handle.lock() {
            Handle::Ready(conn) => Ok(conn.clone()),
            Handle::Uninitialized => Err(EmployeeError::store_unavailable("store is not open")),
            Handle::Opening => Err(EmployeeError::store_unavailable("store is still opening")),
            Handle::Failed(reason) => Err(EmployeeError::store_unavailable(format!(
                "store failed to open: {}",
                reason
            ))),
        }
    }
}

impl std::fmt::Debug for EmployeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeStore")
            .field("location", &self.inner.location)
            .field("state", &self.state())
            .finish()
    }
}

/// Lazy, finite stream of employees from one scan
///
/// Dropping the cursor stops the scan.
pub struct EmployeeCursor {
    rx: mpsc::Receiver<Result<Employee>>,
}

impl EmployeeCursor {
    /// Next employee, an error item if the scan failed, or `None` at the end
    pub async fn next(&mut self) -> Option<Result<Employee>> {
        self.rx.recv().await
    }

    /// Drain the cursor into a vector, stopping at the first error
    ///
    /// # Errors
    ///
    /// The `ReadFailed` delivered by the scan, if any.
    pub async fn collect(mut self) -> Result<Vec<Employee>> {
        let mut employees = Vec::new();
        while let Some(item) = self.next().await {
            employees.push(item?);
        }
        Ok(employees)
    }
}

fn open_connection(location: &StoreLocation, schema_version: u32) -> Result<Connection> {
    let mut conn = match location {
        StoreLocation::File(path) => {
            create_parent_dir(path)?;
            db::open(path)?
        }
        StoreLocation::Memory => db::open_in_memory()?,
    };
    db::configure(&conn)?;

    let version = apply_migrations_to(&mut conn, schema_version)?;
    tracing::debug!(schema_version = version, "store ready");
    Ok(conn)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) => std::fs::create_dir_all(dir).map_err(|e| {
            EmployeeError::store_unavailable(format!(
                "cannot create directory {}: {}",
                dir.display(),
                e
            ))
        }),
        None => Ok(()),
    }
}

async fn run_blocking<T, F>(conn: SharedConnection, access: Access, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.lock();
        op(&mut guard)
    })
    .await
    .unwrap_or_else(|e| {
        let reason = format!("blocking task failed: {}", e);
        Err(match access {
            Access::Read => EmployeeError::ReadFailed { reason },
            Access::Write => EmployeeError::WriteFailed { reason },
        })
    })
}
