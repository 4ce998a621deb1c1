use rusqlite::Connection;
use vafs_core::db::migrations::latest_version;
use vafs_core::db::{open_db, open_db_in_memory, DbError};
use vafs_core::ROOT_NAME;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "folders");
    assert_table_exists(&conn, "files");
    assert_table_exists(&conn, "depth_links");
}

#[test]
fn init_migration_seeds_exactly_one_root_folder() {
    let conn = open_db_in_memory().unwrap();

    let root_rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM folders WHERE name = ?1;",
            [ROOT_NAME],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(root_rows, 1);

    // Root is depth 0 implicitly: no depth link row exists for it.
    let root_links: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM depth_links
             WHERE child_id = (SELECT id FROM folders WHERE name = ?1);",
            [ROOT_NAME],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(root_links, 0);
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn.execute(
        "INSERT INTO files (folder_id, name) VALUES (9999, 'orphan.txt');",
        [],
    );
    assert!(err.is_err(), "file insert without owning folder must fail");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vafs.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "folders");

    let root_rows: i64 = conn_second
        .query_row(
            "SELECT COUNT(*) FROM folders WHERE name = ?1;",
            [ROOT_NAME],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(root_rows, 1, "reopening must not seed a second root");
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
