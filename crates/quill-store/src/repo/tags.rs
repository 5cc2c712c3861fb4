use crate::error::{Result, StoreError};
use crate::repo::{columns, ensure_exists};
use quill_core::domain::{Tag, TagId, TagName, TitleId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, warn};

pub struct TagsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TagsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn upsert(&self, name: &TagName) -> Result<Tag> {
        self.conn.execute(
            "INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING;",
            [name.as_str()],
        )?;
        self.find(name)?
            .ok_or_else(|| StoreError::Migration("missing tag after upsert".to_string()))
    }

    pub fn find(&self, name: &TagName) -> Result<Option<Tag>> {
        self.conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1;",
                [name.as_str()],
                |row| Ok(tag_from_row(row)),
            )
            .optional()
            .map(Option::flatten)
            .map_err(StoreError::from)
    }

    pub fn list_with_counts(&self) -> Result<Vec<(Tag, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.id, tags.name, COUNT(title_tags.title_id) AS cnt
             FROM tags
             LEFT JOIN title_tags ON tags.id = title_tags.tag_id
             GROUP BY tags.id, tags.name
             ORDER BY tags.name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(tag) = tag_from_row(row) {
                items.push((tag, columns::int(row, 2, "cnt")));
            }
        }
        Ok(items)
    }

    pub fn list_for_title(&self, title: TitleId) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.id, tags.name
             FROM tags
             INNER JOIN title_tags ON tags.id = title_tags.tag_id
             WHERE title_tags.title_id = ?1
             ORDER BY tags.name ASC;",
        )?;
        let mut rows = stmt.query([title.get()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.extend(tag_from_row(row));
        }
        Ok(tags)
    }

    /// Reverse lookup: every title bearing `tag`.
    pub fn title_ids_for_tag(&self, tag: TagId) -> Result<Vec<TitleId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title_id FROM title_tags WHERE tag_id = ?1 ORDER BY title_id;")?;
        let rows = stmt.query_map([tag.get()], |row| row.get::<_, i64>(0))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(TitleId(id?));
        }
        Ok(ids)
    }

    /// Tags `title` with `name`, creating the tag when needed. Returns the
    /// tag whose membership changed so callers can invalidate their cache.
    pub fn assign(&self, title: TitleId, name: &TagName) -> Result<TagId> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_exists(&tx, "titles", title.get(), "title")?;
        let tag = TagsRepo::new(&tx).upsert(name)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO title_tags (title_id, tag_id) VALUES (?1, ?2);",
            params![title.get(), tag.id.get()],
        )?;
        tx.commit()?;
        debug!(title = %title, tag = %tag.id, inserted, "tag assigned");
        Ok(tag.id)
    }

    /// Returns `None` when no such tag exists.
    pub fn unassign(&self, title: TitleId, name: &TagName) -> Result<Option<TagId>> {
        let Some(tag) = self.find(name)? else {
            return Ok(None);
        };
        let removed = self.conn.execute(
            "DELETE FROM title_tags WHERE title_id = ?1 AND tag_id = ?2;",
            params![title.get(), tag.id.get()],
        )?;
        debug!(title = %title, tag = %tag.id, removed, "tag unassigned");
        Ok(Some(tag.id))
    }
}

/// A stored name that no longer normalises is skipped rather than failing
/// the whole listing.
fn tag_from_row(row: &Row<'_>) -> Option<Tag> {
    let id = TagId(columns::int(row, 0, "tags.id"));
    let raw = columns::text(row, 1, "tags.name");
    match TagName::new(&raw) {
        Ok(name) => Some(Tag { id, name }),
        Err(err) => {
            warn!(tag = %id, name = raw.as_str(), error = %err, "malformed tag name; skipping");
            None
        }
    }
}
