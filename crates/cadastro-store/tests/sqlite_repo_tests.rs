// Integration tests for SqliteRepo CRUD over the funcionarios collection.

use std::ops::ControlFlow;

use cadastro_core::{EmployeeDraft, EmployeeError, EmployeeField, EmployeeId, EmployeeIndex, EmployeePatch};
use cadastro_store::migrations::apply_migrations;
use cadastro_store::SqliteRepo;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

fn draft(n: u32) -> EmployeeDraft {
    EmployeeDraft {
        nome: format!("Pessoa {}", n),
        cpf: format!("{:03}.456.789-00", n),
        email: format!("pessoa{}@x.com", n),
        telefone: format!("1199999{:04}", n),
        data_nascimento: "1990-01-01".to_string(),
        cargo: if n % 2 == 0 { "Dev" } else { "QA" }.to_string(),
    }
}

fn ana() -> EmployeeDraft {
    EmployeeDraft {
        nome: "Ana Silva".to_string(),
        cpf: "123.456.789-00".to_string(),
        email: "ana@x.com".to_string(),
        telefone: "11999999999".to_string(),
        data_nascimento: "1990-01-01".to_string(),
        cargo: "Dev".to_string(),
    }
}

#[test]
fn test_insert_into_empty_collection_assigns_id_one() {
    let conn = setup_test_db();

    let id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();
    assert_eq!(id, EmployeeId::new(1));

    let stored = SqliteRepo::get_employee(&conn, id).unwrap().unwrap();
    assert_eq!(stored.nome, "Ana Silva");
    assert_eq!(stored.cargo, "Dev");
}

#[test]
fn test_ids_strictly_increase_and_are_not_reused() {
    let conn = setup_test_db();

    let first = SqliteRepo::insert_employee(&conn, &draft(1)).unwrap();
    let second = SqliteRepo::insert_employee(&conn, &draft(2)).unwrap();
    assert!(second > first);

    SqliteRepo::delete_employee(&conn, second).unwrap();
    let third = SqliteRepo::insert_employee(&conn, &draft(3)).unwrap();
    assert!(third > second, "id {} was reused", third);
}

#[test]
fn test_duplicate_unique_field_is_constraint_violation() {
    let conn = setup_test_db();
    SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    for field in [EmployeeField::Cpf, EmployeeField::Email, EmployeeField::Telefone] {
        let mut other = draft(7);
        match field {
            EmployeeField::Cpf => other.cpf = ana().cpf,
            EmployeeField::Email => other.email = ana().email,
            _ => other.telefone = ana().telefone,
        }

        let result = SqliteRepo::insert_employee(&conn, &other);
        assert_eq!(
            result,
            Err(EmployeeError::ConstraintViolation {
                field: field.as_str().to_string()
            })
        );
    }

    assert_eq!(SqliteRepo::count_employees(&conn).unwrap(), 1);
}

#[test]
fn test_duplicate_nome_and_cargo_are_allowed() {
    let conn = setup_test_db();
    let mut twin = draft(2);
    twin.nome = "Ana Silva".to_string();
    twin.cargo = "Dev".to_string();

    SqliteRepo::insert_employee(&conn, &ana()).unwrap();
    SqliteRepo::insert_employee(&conn, &twin).unwrap();

    let by_nome = SqliteRepo::find_by_index(&conn, EmployeeIndex::Nome, "Ana Silva").unwrap();
    assert_eq!(by_nome.len(), 2);
}

#[test]
fn test_get_missing_is_none() {
    let conn = setup_test_db();
    assert_eq!(SqliteRepo::get_employee(&conn, EmployeeId::new(42)).unwrap(), None);
}

#[test]
fn test_list_is_in_ascending_id_order() {
    let conn = setup_test_db();
    for n in [3, 1, 2] {
        SqliteRepo::insert_employee(&conn, &draft(n)).unwrap();
    }

    let ids: Vec<i64> = SqliteRepo::list_employees(&conn)
        .unwrap()
        .iter()
        .map(|e| e.id.get())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_list_empty_collection() {
    let conn = setup_test_db();
    assert!(SqliteRepo::list_employees(&conn).unwrap().is_empty());
}

#[test]
fn test_scan_stops_on_break() {
    let conn = setup_test_db();
    for n in 1..=5 {
        SqliteRepo::insert_employee(&conn, &draft(n)).unwrap();
    }

    let mut seen = Vec::new();
    let visited = SqliteRepo::scan_employees(&conn, |employee| {
        seen.push(employee.id.get());
        if seen.len() == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap();

    assert_eq!(visited, 2);
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_find_by_unique_index() {
    let conn = setup_test_db();
    SqliteRepo::insert_employee(&conn, &draft(1)).unwrap();
    let ana_id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    let found = SqliteRepo::find_by_index(&conn, EmployeeIndex::Cpf, "123.456.789-00").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, ana_id);

    let none = SqliteRepo::find_by_index(&conn, EmployeeIndex::Email, "nobody@x.com").unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_find_by_cargo_returns_all_matches() {
    let conn = setup_test_db();
    for n in 1..=4 {
        SqliteRepo::insert_employee(&conn, &draft(n)).unwrap();
    }

    let devs = SqliteRepo::find_by_index(&conn, EmployeeIndex::Cargo, "Dev").unwrap();
    let ids: Vec<i64> = devs.iter().map(|e| e.id.get()).collect();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_update_merges_patch() {
    let mut conn = setup_test_db();
    let id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    let updated = SqliteRepo::update_employee(
        &mut conn,
        id,
        EmployeePatch::default().with(EmployeeField::Cargo, "Gerente"),
    )
    .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.cargo, "Gerente");
    assert_eq!(updated.nome, "Ana Silva");
    assert_eq!(SqliteRepo::get_employee(&conn, id).unwrap(), Some(updated));
}

#[test]
fn test_update_missing_is_not_found() {
    let mut conn = setup_test_db();

    let result = SqliteRepo::update_employee(
        &mut conn,
        EmployeeId::new(9),
        EmployeePatch::default().with(EmployeeField::Nome, "X"),
    );

    assert_eq!(result, Err(EmployeeError::NotFound { id: EmployeeId::new(9) }));
    assert_eq!(SqliteRepo::count_employees(&conn).unwrap(), 0);
}

#[test]
fn test_update_into_duplicate_leaves_record_unchanged() {
    let mut conn = setup_test_db();
    SqliteRepo::insert_employee(&conn, &ana()).unwrap();
    let other = SqliteRepo::insert_employee(&conn, &draft(2)).unwrap();
    let before = SqliteRepo::get_employee(&conn, other).unwrap();

    let result = SqliteRepo::update_employee(
        &mut conn,
        other,
        EmployeePatch::default().with(EmployeeField::Email, "ana@x.com"),
    );

    assert_eq!(
        result,
        Err(EmployeeError::ConstraintViolation {
            field: "email".to_string()
        })
    );
    assert_eq!(SqliteRepo::get_employee(&conn, other).unwrap(), before);
}

#[test]
fn test_update_keeping_own_unique_values_succeeds() {
    let mut conn = setup_test_db();
    let id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    let patch = EmployeePatch::default()
        .with(EmployeeField::Cpf, "123.456.789-00")
        .with(EmployeeField::Nome, "Ana S.");
    let updated = SqliteRepo::update_employee(&mut conn, id, patch).unwrap();

    assert_eq!(updated.nome, "Ana S.");
}

#[test]
fn test_delete_then_get_is_none() {
    let conn = setup_test_db();
    let id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    SqliteRepo::delete_employee(&conn, id).unwrap();

    assert_eq!(SqliteRepo::get_employee(&conn, id).unwrap(), None);
    assert!(SqliteRepo::list_employees(&conn).unwrap().is_empty());
}

#[test]
fn test_delete_missing_is_not_found() {
    let conn = setup_test_db();
    SqliteRepo::insert_employee(&conn, &ana()).unwrap();

    let result = SqliteRepo::delete_employee(&conn, EmployeeId::new(99));

    assert_eq!(result, Err(EmployeeError::NotFound { id: EmployeeId::new(99) }));
    assert_eq!(SqliteRepo::count_employees(&conn).unwrap(), 1);
}

#[test]
fn test_freed_unique_value_can_be_reused_after_delete() {
    let conn = setup_test_db();
    let id = SqliteRepo::insert_employee(&conn, &ana()).unwrap();
    SqliteRepo::delete_employee(&conn, id).unwrap();

    let again = SqliteRepo::insert_employee(&conn, &ana()).unwrap();
    assert!(again > id);
}
