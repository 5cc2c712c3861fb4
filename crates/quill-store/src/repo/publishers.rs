use crate::error::{Result, StoreError};
use crate::repo::columns;
use quill_core::domain::{normalize_name, Publisher, PublisherId, ResponseKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone, Default)]
pub struct PublisherNew {
    pub name: String,
    pub url: Option<String>,
    pub exclusive: bool,
    pub paying: bool,
    pub goner: bool,
}

const SELECT_PUBLISHERS: &str = "SELECT p.id, p.name, p.url, p.exclusive, p.paying, p.goner,
        (SELECT COUNT(*) FROM submissions s
         WHERE s.publisher_id = p.id AND s.responded_on IS NULL AND s.response = ?)
     FROM publishers p";

pub struct PublishersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> PublishersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, input: PublisherNew) -> Result<Publisher> {
        let name = normalize_name(&input.name)?;
        if self.find_by_name(&name)?.is_some() {
            return Err(StoreError::Duplicate(format!("publisher {name}")));
        }
        let url = input
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self.conn.execute(
            "INSERT INTO publishers (name, url, exclusive, paying, goner)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![name, url, input.exclusive, input.paying, input.goner],
        )?;
        self.require(PublisherId(self.conn.last_insert_rowid()))
    }

    pub fn get(&self, id: PublisherId) -> Result<Option<Publisher>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PUBLISHERS} WHERE p.id = ?;"))?;
        stmt.query_row(params![ResponseKind::None.code(), id.get()], publisher_from_row)
            .optional()
            .map_err(StoreError::from)
    }

    pub fn require(&self, id: PublisherId) -> Result<Publisher> {
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("publisher {id}")))
    }

    /// Case-insensitive exact match.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Publisher>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PUBLISHERS} WHERE p.name = ? COLLATE NOCASE;"))?;
        stmt.query_row(
            params![ResponseKind::None.code(), name.trim()],
            publisher_from_row,
        )
        .optional()
        .map_err(StoreError::from)
    }

    pub fn list(&self) -> Result<Vec<Publisher>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PUBLISHERS} ORDER BY p.name COLLATE NOCASE ASC;"))?;
        let rows = stmt.query_map([ResponseKind::None.code()], publisher_from_row)?;
        let mut publishers = Vec::new();
        for publisher in rows {
            publishers.push(publisher?);
        }
        Ok(publishers)
    }

    pub fn set_goner(&self, id: PublisherId, goner: bool) -> Result<Publisher> {
        let updated = self.conn.execute(
            "UPDATE publishers SET goner = ?2 WHERE id = ?1;",
            params![id.get(), goner],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("publisher {id}")));
        }
        self.require(id)
    }
}

fn publisher_from_row(row: &Row<'_>) -> rusqlite::Result<Publisher> {
    Ok(Publisher {
        id: PublisherId(row.get(0)?),
        name: columns::text(row, 1, "publishers.name"),
        url: columns::opt_text(row, 2, "publishers.url"),
        exclusive: columns::flag(row, 3, "publishers.exclusive"),
        paying: columns::flag(row, 4, "publishers.paying"),
        goner: columns::flag(row, 5, "publishers.goner"),
        active_submissions: columns::int(row, 6, "active_submissions"),
    })
}
