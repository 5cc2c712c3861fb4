mod columns;
pub mod publishers;
pub mod queue;
pub mod submissions;
pub mod tags;
pub mod titles;

use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};

pub use publishers::{PublisherNew, PublishersRepo};
pub use queue::{QueueEntryNew, QueueRepo, DEFAULT_QUEUE};
pub use submissions::{SubmissionNew, SubmissionsRepo};
pub use tags::TagsRepo;
pub use titles::{TitleNew, TitleUpdate, TitlesRepo};

pub(crate) fn ensure_exists(conn: &Connection, table: &str, id: i64, what: &str) -> Result<()> {
    let found: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE id = ?1;"),
            [id],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::NotFound(format!("{what} {id}"))),
    }
}
