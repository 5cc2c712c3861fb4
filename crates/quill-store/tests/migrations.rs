use quill_store::migrate::latest_version;
use quill_store::Store;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM quill_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, latest_version());
}

#[test]
fn newer_database_is_rejected() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE quill_schema SET version = 99;", [])
        .expect("bump version");
    let err = store.migrate().expect_err("should refuse");
    assert!(err.to_string().contains("newer than available"));
}

#[test]
fn on_disk_store_survives_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("quill.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .titles()
            .create(quill_store::repo::TitleNew {
                name: "Salt Roads".to_string(),
                ..Default::default()
            })
            .expect("create");
    }

    let store = Store::open(&path).expect("reopen");
    store.migrate().expect("migrate");
    assert_eq!(store.titles().list().expect("list").len(), 1);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
