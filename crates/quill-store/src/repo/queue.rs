use crate::error::{Result, StoreError};
use crate::repo::{columns, ensure_exists};
use chrono::NaiveDate;
use quill_core::domain::{QueueEntry, QueueEntryId, QueueId, QueueStatus, TitleId};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub const DEFAULT_QUEUE: QueueId = QueueId(1);

#[derive(Debug, Clone)]
pub struct QueueEntryNew {
    pub queue_id: QueueId,
    pub title_id: TitleId,
    pub status: QueueStatus,
    pub scheduled_on: Option<NaiveDate>,
}

const SELECT_ENTRIES: &str = "SELECT q.id, q.queue_id, q.title_id, t.name, q.status,
        q.scheduled_on, t.ready
     FROM queue_entries q
     INNER JOIN titles t ON t.id = q.title_id";

pub struct QueueRepo<'a> {
    conn: &'a Connection,
}

impl<'a> QueueRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, input: QueueEntryNew) -> Result<QueueEntry> {
        ensure_exists(self.conn, "titles", input.title_id.get(), "title")?;
        self.conn.execute(
            "INSERT INTO queue_entries (queue_id, title_id, status, scheduled_on)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.queue_id.get(),
                input.title_id.get(),
                input.status.code(),
                columns::format_date(input.scheduled_on),
            ],
        )?;
        let id = QueueEntryId(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("queue entry {id}")))
    }

    pub fn get(&self, id: QueueEntryId) -> Result<Option<QueueEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ENTRIES} WHERE q.id = ?1;"))?;
        stmt.query_row([id.get()], entry_from_row)
            .optional()
            .map_err(StoreError::from)
    }

    /// Entries of one queue, or of every queue when `queue` is `None`.
    pub fn list(&self, queue: Option<QueueId>) -> Result<Vec<QueueEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_ENTRIES} WHERE ?1 IS NULL OR q.queue_id = ?1
             ORDER BY q.queue_id ASC, q.scheduled_on IS NULL, q.scheduled_on ASC, q.id ASC;"
        ))?;
        let rows = stmt.query_map([queue.map(QueueId::get)], entry_from_row)?;
        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    pub fn set_status(&self, id: QueueEntryId, status: QueueStatus) -> Result<QueueEntry> {
        let updated = self.conn.execute(
            "UPDATE queue_entries SET status = ?2 WHERE id = ?1;",
            params![id.get(), status.code()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("queue entry {id}")));
        }
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("queue entry {id}")))
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<QueueEntry> {
    Ok(QueueEntry {
        id: QueueEntryId(row.get(0)?),
        queue_id: QueueId(columns::int(row, 1, "queue_entries.queue_id")),
        title_id: TitleId(row.get(2)?),
        title: columns::text(row, 3, "titles.name"),
        status: QueueStatus::from_code(columns::int(row, 4, "queue_entries.status")),
        scheduled_on: columns::opt_date(row, 5, "queue_entries.scheduled_on"),
        title_ready: columns::flag(row, 6, "titles.ready"),
    })
}
