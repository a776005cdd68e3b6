use super::*;
use crate::coerce::CoercionMode;
use crate::core::traits::RowSet;
use crate::core::value::{CellValue, TypedValue};
use crate::testing::MockDatabase;

type TestConsole<'i> = LineConsole<&'i [u8], Vec<u8>>;

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn tables(names: &[&str]) -> RowSet {
    RowSet::new(
        vec!["table_name".into()],
        names.iter().map(|n| vec![text(n)]).collect(),
    )
}

fn columns(cols: &[(&str, &str)]) -> RowSet {
    RowSet::new(
        vec!["column_name".into(), "data_type".into()],
        cols.iter().map(|(n, t)| vec![text(n), text(t)]).collect(),
    )
}

/// Script the two catalog queries every operation starts with.
fn with_users_catalog(db: &MockDatabase) {
    db.push_rows(tables(&["orders", "users"]));
    db.push_rows(columns(&[("id", "integer"), ("name", "text")]));
}

fn users(rows: &[(i64, &str)]) -> RowSet {
    RowSet::new(
        vec!["id".into(), "name".into()],
        rows.iter()
            .map(|(id, name)| vec![CellValue::Integer(*id), text(name)])
            .collect(),
    )
}

async fn run_with(db: &MockDatabase, input: &str, config: SessionConfig) -> (Result<()>, String) {
    let console: TestConsole<'_> = LineConsole::new(input.as_bytes(), Vec::new());
    let mut session = Session::new(db, console, config);
    let result = session.run().await;
    let (_, output) = session.into_console().into_parts();
    (result, String::from_utf8(output).unwrap())
}

async fn run(db: &MockDatabase, input: &str) -> (Result<()>, String) {
    run_with(db, input, SessionConfig::default()).await
}

#[tokio::test]
async fn test_exit_shows_menu_and_stops() {
    let db = MockDatabase::new();
    let (result, output) = run(&db, "6\n").await;

    assert!(result.is_ok());
    assert!(output.contains("1. CREATE"));
    assert!(output.contains("5. LIST"));
    assert!(output.contains("6. EXIT"));
    assert!(output.ends_with("Bye\n"));
    assert!(db.calls().is_empty());
}

#[tokio::test]
async fn test_end_of_input_ends_session() {
    let db = MockDatabase::new();
    let (result, output) = run(&db, "").await;
    assert!(result.is_ok());
    assert!(output.contains("Bye"));
}

#[tokio::test]
async fn test_invalid_option_shows_menu_again() {
    let db = MockDatabase::new();
    let (result, output) = run(&db, "9\nexit\n").await;

    assert!(result.is_ok());
    assert!(output.contains("Invalid option"));
    assert_eq!(output.matches("6. EXIT").count(), 2);
}

#[tokio::test]
async fn test_read_renders_matches() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[(5, "ann")]));

    let (result, output) = run(&db, "2\nusers\nid\n5\n6\n").await;
    assert!(result.is_ok());

    let calls = db.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].sql, "SELECT * FROM \"users\" WHERE \"id\" = $1");
    assert_eq!(calls[2].params, vec![TypedValue::Integer(5)]);

    assert!(output.contains("Tables in schema 'public':"));
    assert!(output.contains("2. users"));
    assert!(output.contains("- id (integer)"));
    assert!(output.contains("Row 1:\nid: 5\nname: ann\n"));
    assert!(output.contains("Total rows: 1"));
}

#[tokio::test]
async fn test_read_without_matches() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[]));

    let (_, output) = run(&db, "READ\nusers\nname\nzed\n6\n").await;
    assert!(output.contains("No matches"));
    assert_eq!(db.calls()[2].params, vec![TypedValue::Text("zed".into())]);
}

#[tokio::test]
async fn test_unknown_table_returns_to_menu() {
    let db = MockDatabase::new();
    db.push_rows(tables(&["users"]));

    let (result, output) = run(&db, "2\nnope\n6\n").await;
    assert!(result.is_ok());
    assert!(output.contains("Error: Table 'nope' does not exist"));
    // Only the table listing ran
    assert_eq!(db.calls().len(), 1);
    assert!(output.ends_with("Bye\n"));
}

#[tokio::test]
async fn test_unknown_column_never_reaches_statement() {
    let db = MockDatabase::new();
    with_users_catalog(&db);

    let (_, output) = run(&db, "2\nusers\nemail\n6\n").await;
    assert!(output.contains("Error: Column 'email' does not exist in table 'users'"));
    assert_eq!(db.calls().len(), 2);
}

#[tokio::test]
async fn test_create_inserts_coerced_values() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_affected(1);

    let (result, output) = run(&db, "1\nusers\n7\nbob\n6\n").await;
    assert!(result.is_ok());

    let insert = &db.calls()[2];
    assert_eq!(
        insert.sql,
        "INSERT INTO \"users\" (\"id\", \"name\") VALUES ($1, $2)"
    );
    assert_eq!(
        insert.params,
        vec![TypedValue::Integer(7), TypedValue::Text("bob".into())]
    );
    assert!(output.contains("Value for id (integer): "));
    assert!(output.contains("Value for name (text): "));
    assert!(output.contains("Rows inserted: 1"));
}

#[tokio::test]
async fn test_create_lenient_substitutes_zero() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_affected(1);

    let (result, _) = run(&db, "1\nusers\nabc\nbob\n6\n").await;
    assert!(result.is_ok());
    assert_eq!(db.calls()[2].params[0], TypedValue::Integer(0));
}

#[tokio::test]
async fn test_create_strict_rejects_bad_number() {
    let db = MockDatabase::new();
    with_users_catalog(&db);

    let config = SessionConfig {
        coercion: CoercionMode::Strict,
        ..Default::default()
    };
    let (result, output) = run_with(&db, "1\nusers\nabc\n6\n", config).await;

    assert!(result.is_ok());
    assert!(output.contains("Error: Cannot convert \"abc\" to integer"));
    assert_eq!(db.calls().len(), 2);
}

#[tokio::test]
async fn test_statement_failure_is_reported() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_error(CrudError::Statement(
        "ERROR: duplicate key value violates unique constraint".into(),
    ));

    let (result, output) = run(&db, "1\nusers\n1\nann\n6\n").await;
    assert!(result.is_ok());
    assert!(output.contains("Error: Statement failed: ERROR: duplicate key"));
    assert!(output.ends_with("Bye\n"));
}

#[tokio::test]
async fn test_update_binds_new_value_then_filter() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[(5, "ann")]));
    db.push_affected(1);

    let (result, output) = run(&db, "3\nusers\nid\n5\nname\ncarl\n6\n").await;
    assert!(result.is_ok());

    let update = &db.calls()[3];
    assert_eq!(
        update.sql,
        "UPDATE \"users\" SET \"name\" = $1 WHERE \"id\" = $2"
    );
    assert_eq!(
        update.params,
        vec![TypedValue::Text("carl".into()), TypedValue::Integer(5)]
    );
    assert!(output.contains("name: ann"));
    assert!(output.contains("Rows updated: 1"));
}

#[tokio::test]
async fn test_update_without_matches_aborts() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[]));

    let (_, output) = run(&db, "3\nusers\nid\n99\n6\n").await;
    assert!(output.contains("No matches"));
    assert!(!output.contains("Rows updated"));
    assert_eq!(db.calls().len(), 3);
}

#[tokio::test]
async fn test_delete_after_showing_matches() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[(1, "ann"), (2, "ann")]));
    db.push_affected(2);

    let (_, output) = run(&db, "4\nusers\nname\nann\n6\n").await;

    let delete = &db.calls()[3];
    assert_eq!(delete.sql, "DELETE FROM \"users\" WHERE \"name\" = $1");
    assert_eq!(delete.params, vec![TypedValue::Text("ann".into())]);
    assert!(output.contains("Row 2:"));
    assert!(output.contains("Rows deleted: 2"));
}

#[tokio::test]
async fn test_list_with_limit_and_order() {
    let db = MockDatabase::new();
    db.push_rows(tables(&["orders", "users"]));
    db.push_rows(columns(&[("id", "integer"), ("created_at", "timestamp without time zone")]));
    db.push_rows(RowSet::new(
        vec!["id".into(), "created_at".into()],
        vec![
            vec![CellValue::Integer(2), text("2024-02-01 09:00:00")],
            vec![CellValue::Integer(1), text("2024-01-01 09:00:00")],
        ],
    ));

    let (result, output) = run(&db, "5\norders\ny\n10\nyes\ncreated_at\ndesc\n6\n").await;
    assert!(result.is_ok());

    let list = &db.calls()[2];
    assert_eq!(
        list.sql,
        "SELECT * FROM \"orders\" ORDER BY \"created_at\" DESC LIMIT 10"
    );
    assert!(list.params.is_empty());
    assert!(output.contains("1. id: 2 created_at: 2024-02-01 09:00:00"));
    assert!(output.contains("2. id: 1 created_at: 2024-01-01 09:00:00"));
    assert!(output.contains("Total rows: 2"));
}

#[tokio::test]
async fn test_list_plain() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    db.push_rows(users(&[]));

    let (_, output) = run(&db, "5\nusers\nn\nn\n6\n").await;
    assert_eq!(db.calls()[2].sql, "SELECT * FROM \"users\"");
    assert!(output.contains("Total rows: 0"));
}

#[tokio::test]
async fn test_list_rejects_bad_limit_and_direction() {
    let db = MockDatabase::new();
    with_users_catalog(&db);
    let (_, output) = run(&db, "5\nusers\ny\n10; DROP TABLE users\n6\n").await;
    assert!(output.contains("Error: Invalid limit"));

    let db = MockDatabase::new();
    with_users_catalog(&db);
    let (_, output) = run(&db, "5\nusers\nn\ny\nid\nsideways\n6\n").await;
    assert!(output.contains("Error: Invalid sort direction"));
    assert_eq!(db.calls().len(), 2);
}

#[tokio::test]
async fn test_end_of_input_mid_operation() {
    let db = MockDatabase::new();
    with_users_catalog(&db);

    let (result, output) = run(&db, "2\nusers\n").await;
    assert!(result.is_ok());
    assert!(output.ends_with("Bye\n"));
}
