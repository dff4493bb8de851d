//! SQLite repository implementation
//!
//! Blocking CRUD over the `funcionarios` collection. Callers pass an
//! open, migrated connection; drafts and patches are expected to be
//! validated already.

use std::ops::ControlFlow;

use crate::errors::{from_rusqlite_read, from_rusqlite_write, Result};
use cadastro_core::{Employee, EmployeeDraft, EmployeeError, EmployeeId, EmployeeIndex, EmployeePatch};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};

const SELECT_COLUMNS: &str =
    "SELECT id, nome, cpf, email, telefone, data_nascimento, cargo FROM funcionarios";

/// SQLite repository for employees
pub struct SqliteRepo;

impl SqliteRepo {
    /// Insert a new employee and return the id the store assigned
    pub fn insert_employee(conn: &Connection, draft: &EmployeeDraft) -> Result<EmployeeId> {
        conn.execute(
            "INSERT INTO funcionarios (nome, cpf, email, telefone, data_nascimento, cargo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                draft.nome,
                draft.cpf,
                draft.email,
                draft.telefone,
                draft.data_nascimento,
                draft.cargo,
            ],
        )
        .map_err(from_rusqlite_write)?;

        let id = EmployeeId::new(conn.last_insert_rowid());
        tracing::debug!(employee_id = id.get(), "employee inserted");
        Ok(id)
    }

    /// Get an employee by id
    pub fn get_employee(conn: &Connection, id: EmployeeId) -> Result<Option<Employee>> {
        let mut stmt = conn
            .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .map_err(from_rusqlite_read)?;

        let employee = stmt
            .query_row([id.get()], row_to_employee)
            .optional()
            .map_err(from_rusqlite_read)?;

        Ok(employee)
    }

    /// Walk every employee in ascending id order, one row at a time
    ///
    /// `visit` sees each record as the cursor reaches it and can stop the
    /// walk early with `ControlFlow::Break`. Returns the number of records
    /// visited.
    pub fn scan_employees<F>(conn: &Connection, mut visit: F) -> Result<usize>
    where
        F: FnMut(Employee) -> ControlFlow<()>,
    {
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .map_err(from_rusqlite_read)?;
        let mut rows = stmt.query([]).map_err(from_rusqlite_read)?;

        let mut visited = 0;
        while let Some(row) = rows.next().map_err(from_rusqlite_read)? {
            let employee = row_to_employee(row).map_err(from_rusqlite_read)?;
            visited += 1;
            if visit(employee).is_break() {
                break;
            }
        }

        Ok(visited)
    }

    /// List all employees in ascending id order
    pub fn list_employees(conn: &Connection) -> Result<Vec<Employee>> {
        let mut employees = Vec::new();
        Self::scan_employees(conn, |employee| {
            employees.push(employee);
            ControlFlow::Continue(())
        })?;
        Ok(employees)
    }

    /// Exact-match lookup through one secondary index
    pub fn find_by_index(
        conn: &Connection,
        index: EmployeeIndex,
        value: &str,
    ) -> Result<Vec<Employee>> {
        // Column and index names come from a closed enum.
        let sql = format!(
            "SELECT id, nome, cpf, email, telefone, data_nascimento, cargo
             FROM funcionarios INDEXED BY {} WHERE {} = ?1 ORDER BY id",
            index.name(),
            index.field().as_str()
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite_read)?;

        let employees = stmt
            .query_map([value], row_to_employee)
            .map_err(from_rusqlite_read)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite_read)?;

        Ok(employees)
    }

    /// Merge `patch` onto the stored record and write it back
    ///
    /// The read and the write share one immediate transaction. There is
    /// no check that the record is unchanged since the caller last saw it.
    pub fn update_employee(
        conn: &mut Connection,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> Result<Employee> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite_write)?;

        let mut employee = {
            let mut stmt = tx
                .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
                .map_err(from_rusqlite_write)?;
            let found = stmt
                .query_row([id.get()], row_to_employee)
                .optional()
                .map_err(from_rusqlite_write)?;
            found.ok_or(EmployeeError::NotFound { id })?
        };

        employee.apply(patch);

        tx.execute(
            "UPDATE funcionarios SET
                nome = ?2,
                cpf = ?3,
                email = ?4,
                telefone = ?5,
                data_nascimento = ?6,
                cargo = ?7
             WHERE id = ?1",
            rusqlite::params![
                employee.id.get(),
                employee.nome,
                employee.cpf,
                employee.email,
                employee.telefone,
                employee.data_nascimento,
                employee.cargo,
            ],
        )
        .map_err(from_rusqlite_write)?;

        tx.commit().map_err(from_rusqlite_write)?;

        tracing::debug!(employee_id = id.get(), "employee updated");
        Ok(employee)
    }

    /// Delete an employee by id
    ///
    /// A delete that removes no row is reported as `NotFound`.
    pub fn delete_employee(conn: &Connection, id: EmployeeId) -> Result<()> {
        let removed = conn
            .execute("DELETE FROM funcionarios WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite_write)?;

        if removed == 0 {
            return Err(EmployeeError::NotFound { id });
        }

        tracing::debug!(employee_id = id.get(), "employee deleted");
        Ok(())
    }

    /// Number of stored employees
    pub fn count_employees(conn: &Connection) -> Result<usize> {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM funcionarios", [], |row| row.get(0))
            .map_err(from_rusqlite_read)?;
        Ok(count as usize)
    }
}

fn row_to_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: EmployeeId::new(row.get(0)?),
        nome: row.get(1)?,
        cpf: row.get(2)?,
        email: row.get(3)?,
        telefone: row.get(4)?,
        data_nascimento: row.get(5)?,
        cargo: row.get(6)?,
    })
}
