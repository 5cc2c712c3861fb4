//! Lenient column readers. A NULL or malformed value in a non-key column is
//! replaced by the type's default and logged, so one bad row never fails a
//! whole listing.

use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::Row;
use tracing::warn;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn int(row: &Row<'_>, index: usize, column: &str) -> i64 {
    match row.get_ref(index) {
        Ok(ValueRef::Integer(value)) => value,
        Ok(ValueRef::Real(value)) if value.fract() == 0.0 => value as i64,
        Ok(ValueRef::Text(raw)) => {
            match std::str::from_utf8(raw).ok().and_then(|s| s.trim().parse().ok()) {
                Some(value) => value,
                None => malformed(column, "integer"),
            }
        }
        Ok(ValueRef::Null) => {
            warn!(column, "NULL integer column; using 0");
            0
        }
        Ok(_) => malformed(column, "integer"),
        Err(err) => {
            warn!(column, error = %err, "unreadable integer column; using 0");
            0
        }
    }
}

pub(crate) fn flag(row: &Row<'_>, index: usize, column: &str) -> bool {
    int(row, index, column) != 0
}

/// NULL is a legitimate "absent"; only non-text values are reported.
pub(crate) fn opt_text(row: &Row<'_>, index: usize, column: &str) -> Option<String> {
    match row.get_ref(index) {
        Ok(ValueRef::Text(raw)) => Some(String::from_utf8_lossy(raw).into_owned()),
        Ok(ValueRef::Null) => None,
        Ok(ValueRef::Integer(value)) => Some(value.to_string()),
        Ok(_) => malformed(column, "text"),
        Err(err) => {
            warn!(column, error = %err, "unreadable text column; ignoring");
            None
        }
    }
}

pub(crate) fn text(row: &Row<'_>, index: usize, column: &str) -> String {
    match opt_text(row, index, column) {
        Some(value) => value,
        None => {
            warn!(column, "missing text column; using empty string");
            String::new()
        }
    }
}

pub(crate) fn opt_date(row: &Row<'_>, index: usize, column: &str) -> Option<NaiveDate> {
    let raw = opt_text(row, index, column)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(column, value = trimmed, "malformed date column; ignoring");
            None
        }
    }
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|date| date.format(DATE_FORMAT).to_string())
}

fn malformed<T: Default>(column: &str, expected: &str) -> T {
    warn!(column, expected, "malformed column value; using default");
    T::default()
}

#[cfg(test)]
mod tests {
    use super::{flag, int, opt_date, text};
    use chrono::NaiveDate;
    use rusqlite::Connection;

    fn read<T>(sql: &str, reader: impl FnOnce(&rusqlite::Row<'_>) -> T) -> T {
        let conn = Connection::open_in_memory().expect("open");
        let mut stmt = conn.prepare(sql).expect("prepare");
        let mut rows = stmt.query([]).expect("query");
        let row = rows.next().expect("step").expect("row");
        reader(row)
    }

    #[test]
    fn integers_tolerate_null_and_garbage() {
        assert_eq!(read("SELECT 42", |row| int(row, 0, "n")), 42);
        assert_eq!(read("SELECT NULL", |row| int(row, 0, "n")), 0);
        assert_eq!(read("SELECT 'lots'", |row| int(row, 0, "n")), 0);
        assert_eq!(read("SELECT ' 17 '", |row| int(row, 0, "n")), 17);
        assert!(read("SELECT 3", |row| flag(row, 0, "f")));
        assert!(!read("SELECT X'00'", |row| flag(row, 0, "f")));
    }

    #[test]
    fn dates_parse_or_drop() {
        assert_eq!(
            read("SELECT '2024-02-29'", |row| opt_date(row, 0, "d")),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(read("SELECT 'someday'", |row| opt_date(row, 0, "d")), None);
        assert_eq!(read("SELECT NULL", |row| opt_date(row, 0, "d")), None);
        assert_eq!(read("SELECT ''", |row| opt_date(row, 0, "d")), None);
    }

    #[test]
    fn missing_text_is_empty() {
        assert_eq!(read("SELECT NULL", |row| text(row, 0, "t")), "");
        assert_eq!(read("SELECT 'x'", |row| text(row, 0, "t")), "x");
    }
}
