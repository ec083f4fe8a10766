use portfolio_core::db::migrations::latest_version;
use portfolio_core::db::{open_db, open_db_in_memory, DbError};
use portfolio_core::{LocalStorage, SqliteLocalStorage, StorageError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "local_storage");
}

#[test]
fn reopening_database_keeps_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio.db");

    let storage = SqliteLocalStorage::open(&path).unwrap();
    storage.set_item("portfolio_posts", "[]").unwrap();
    storage.set_item("portfolio_posts", r#"[{"id":"a"}]"#).unwrap();
    drop(storage);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    drop(conn);

    let storage = SqliteLocalStorage::open(&path).unwrap();
    assert_eq!(
        storage.get_item("portfolio_posts").unwrap().as_deref(),
        Some(r#"[{"id":"a"}]"#)
    );
    assert_eq!(storage.keys().unwrap(), vec!["portfolio_posts".to_string()]);
}

#[test]
fn remove_item_and_blank_keys() {
    let storage = SqliteLocalStorage::in_memory().unwrap();
    storage.set_item("portfolio_mock_mode", "true").unwrap();
    storage.remove_item("portfolio_mock_mode").unwrap();

    assert_eq!(storage.get_item("portfolio_mock_mode").unwrap(), None);
    assert!(matches!(
        storage.set_item("  ", "x"),
        Err(StorageError::InvalidKey(_))
    ));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
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
