use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

const MIGRATIONS: &[(&str, &str)] = &[("001_init.sql", include_str!("../migrations/001_init.sql"))];

/// Number of migrations this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    ensure_schema_table(&tx)?;
    let current = read_version(&tx)?;

    if current > latest_version() {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current,
            latest_version()
        )));
    }

    for (version, (name, sql)) in (1_i64..).zip(MIGRATIONS) {
        if current >= version {
            continue;
        }
        debug!(migration = name, version, "applying migration");
        tx.execute_batch(sql)?;
        let updated = tx.execute("UPDATE quill_schema SET version = ?1;", [version])?;
        if updated != 1 {
            return Err(StoreError::Migration(format!(
                "expected single schema row, updated {}",
                updated
            )));
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    ensure_schema_table(conn)?;
    read_version(conn)
}

fn ensure_schema_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS quill_schema (version INTEGER NOT NULL);")?;
    let existing: Option<i64> = conn
        .query_row("SELECT version FROM quill_schema LIMIT 1;", [], |row| row.get(0))
        .optional()?;
    if existing.is_none() {
        conn.execute("INSERT INTO quill_schema (version) VALUES (0);", [])?;
    }
    Ok(())
}

fn read_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row("SELECT version FROM quill_schema LIMIT 1;", [], |row| {
        row.get(0)
    })?;
    Ok(version)
}
