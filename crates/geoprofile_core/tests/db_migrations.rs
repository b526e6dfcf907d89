use geoprofile_core::db::migrations::apply_migrations;
use geoprofile_core::db::{latest_version, open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::Connection;

#[test]
fn fresh_database_gets_the_settings_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let columns: Vec<String> = conn
        .prepare("SELECT name FROM pragma_table_info('settings') ORDER BY cid;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, vec!["key", "value", "updated_at"]);
}

#[test]
fn migrating_an_up_to_date_file_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geoprofile.db");
    drop(open_db(&path).unwrap());

    let mut conn = Connection::open(&path).unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn stored_preferences_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geoprofile.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO settings (key, value) VALUES ('search_field', 'location');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let value: String = conn
        .query_row(
            "SELECT value FROM settings WHERE key = 'search_field';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "location");
}

#[test]
fn blank_setting_keys_are_rejected_by_schema() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute("INSERT INTO settings (key, value) VALUES ('  ', 'x');", []);
    assert!(result.is_err());
}

#[test]
fn file_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "schema_too_new");
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { found: 999, supported } if supported == latest_version()
    ));
}

#[test]
fn failing_script_leaves_the_version_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clash.db");

    // An index already owns the name the first script needs.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE other (x TEXT); CREATE INDEX settings ON other (x);")
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Migration { version: 1, .. }));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
}
