use crate::error::{Result, StoreError};
use crate::repo::columns;
use quill_core::domain::{normalize_name, Title, TitleId};
use rusqlite::{params, Connection, Row};

#[derive(Debug, Clone, Default)]
pub struct TitleNew {
    pub name: String,
    pub folder: Option<String>,
    pub word_count: i64,
    pub ready: bool,
    pub flagged: bool,
    pub question: bool,
    pub published: bool,
    pub self_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TitleUpdate {
    pub word_count: Option<i64>,
    pub folder: Option<Option<String>>,
    pub ready: Option<bool>,
    pub flagged: Option<bool>,
    pub question: Option<bool>,
    pub published: Option<bool>,
    pub self_published: Option<bool>,
}

const SELECT_TITLES: &str = "SELECT t.id, t.name, t.folder, t.word_count, t.ready, t.flagged,
        t.question, t.published, t.self_published,
        (SELECT COUNT(*) FROM submissions s WHERE s.title_id = t.id)
     FROM titles t";

pub struct TitlesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TitlesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, input: TitleNew) -> Result<Title> {
        let name = normalize_name(&input.name)?;
        let folder = input
            .folder
            .map(|folder| folder.trim().to_string())
            .filter(|folder| !folder.is_empty());
        self.conn.execute(
            "INSERT INTO titles (name, folder, word_count, ready, flagged, question, published, self_published)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                name,
                folder,
                input.word_count,
                input.ready,
                input.flagged,
                input.question,
                input.published,
                input.self_published,
            ],
        )?;
        let id = TitleId(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("title {id}")))
    }

    pub fn get(&self, id: TitleId) -> Result<Option<Title>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TITLES} WHERE t.id = ?1;"))?;
        let mut rows = stmt.query([id.get()])?;
        match rows.next()? {
            Some(row) => Ok(Some(title_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn require(&self, id: TitleId) -> Result<Title> {
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("title {id}")))
    }

    pub fn list(&self) -> Result<Vec<Title>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TITLES} ORDER BY t.name COLLATE NOCASE ASC, t.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(title_from_row(row)?);
        }
        Ok(titles)
    }

    pub fn update(&self, id: TitleId, update: TitleUpdate) -> Result<Title> {
        let current = self.require(id)?;
        let folder = match update.folder {
            Some(folder) => folder
                .map(|folder| folder.trim().to_string())
                .filter(|folder| !folder.is_empty()),
            None => current.folder,
        };
        self.conn.execute(
            "UPDATE titles SET folder = ?2, word_count = ?3, ready = ?4, flagged = ?5,
                 question = ?6, published = ?7, self_published = ?8
             WHERE id = ?1;",
            params![
                id.get(),
                folder,
                update.word_count.unwrap_or(current.word_count),
                update.ready.unwrap_or(current.ready),
                update.flagged.unwrap_or(current.flagged),
                update.question.unwrap_or(current.question),
                update.published.unwrap_or(current.published),
                update.self_published.unwrap_or(current.self_published),
            ],
        )?;
        self.require(id)
    }

    pub fn delete(&self, id: TitleId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM titles WHERE id = ?1;", [id.get()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("title {id}")));
        }
        Ok(())
    }
}

fn title_from_row(row: &Row<'_>) -> Result<Title> {
    Ok(Title {
        id: TitleId(row.get(0)?),
        name: columns::text(row, 1, "titles.name"),
        folder: columns::opt_text(row, 2, "titles.folder"),
        word_count: columns::int(row, 3, "titles.word_count"),
        ready: columns::flag(row, 4, "titles.ready"),
        flagged: columns::flag(row, 5, "titles.flagged"),
        question: columns::flag(row, 6, "titles.question"),
        published: columns::flag(row, 7, "titles.published"),
        self_published: columns::flag(row, 8, "titles.self_published"),
        submission_count: columns::int(row, 9, "submission_count"),
    })
}
