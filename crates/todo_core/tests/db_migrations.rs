use rusqlite::Connection;
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO tasks (id, title, start_date) VALUES ('a', 'kept', '2024-01-01');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "task database schema version 999 is newer than supported {}",
            latest_version()
        )
    );
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    // The refused database keeps its stamp.
    let conn = Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 999);
}

#[test]
fn schema_enforces_column_constraints() {
    let conn = open_db_in_memory().unwrap();

    let blank_title = conn.execute(
        "INSERT INTO tasks (id, title, start_date) VALUES ('x', '  ', '2024-01-01');",
        [],
    );
    assert!(blank_title.is_err());

    let bad_type = conn.execute(
        "INSERT INTO tasks (id, title, start_date, recurrence_type)
         VALUES ('y', 'ok', '2024-01-01', 'Hourly');",
        [],
    );
    assert!(bad_type.is_err());

    let zero_interval = conn.execute(
        "INSERT INTO tasks (id, title, start_date, recurrence_type, recurrence_interval)
         VALUES ('z', 'ok', '2024-01-01', 'Daily', 0);",
        [],
    );
    assert!(zero_interval.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
