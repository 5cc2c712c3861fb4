pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use quill_core::domain::{TagId, TitleId};
use quill_core::filter::{LookupError, TagMembership};
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn titles(&self) -> repo::TitlesRepo<'_> {
        repo::TitlesRepo::new(&self.conn)
    }

    pub fn publishers(&self) -> repo::PublishersRepo<'_> {
        repo::PublishersRepo::new(&self.conn)
    }

    pub fn submissions(&self) -> repo::SubmissionsRepo<'_> {
        repo::SubmissionsRepo::new(&self.conn)
    }

    pub fn queue(&self) -> repo::QueueRepo<'_> {
        repo::QueueRepo::new(&self.conn)
    }

    pub fn tags(&self) -> repo::TagsRepo<'_> {
        repo::TagsRepo::new(&self.conn)
    }
}

impl TagMembership for Store {
    fn title_ids_for_tag(&self, tag: TagId) -> std::result::Result<Vec<TitleId>, LookupError> {
        self.tags()
            .title_ids_for_tag(tag)
            .map_err(|err| LookupError(err.to_string()))
    }
}
