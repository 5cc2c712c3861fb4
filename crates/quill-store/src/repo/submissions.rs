use crate::error::{Result, StoreError};
use crate::repo::{columns, ensure_exists};
use chrono::NaiveDate;
use quill_core::domain::{PublisherId, ResponseKind, Submission, SubmissionId, TitleId};
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone)]
pub struct SubmissionNew {
    pub title_id: TitleId,
    pub publisher_id: PublisherId,
    pub submitted_on: Option<NaiveDate>,
    pub responded_on: Option<NaiveDate>,
    pub response: ResponseKind,
    pub contest: bool,
}

const SELECT_SUBMISSIONS: &str = "SELECT s.id, s.title_id, t.name, s.publisher_id, p.name,
        s.submitted_on, s.responded_on, s.response, s.contest
     FROM submissions s
     INNER JOIN titles t ON t.id = s.title_id
     INNER JOIN publishers p ON p.id = s.publisher_id";

pub struct SubmissionsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SubmissionsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, input: SubmissionNew) -> Result<Submission> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_exists(&tx, "titles", input.title_id.get(), "title")?;
        ensure_exists(&tx, "publishers", input.publisher_id.get(), "publisher")?;
        tx.execute(
            "INSERT INTO submissions (title_id, publisher_id, submitted_on, responded_on, response, contest)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                input.title_id.get(),
                input.publisher_id.get(),
                columns::format_date(input.submitted_on),
                columns::format_date(input.responded_on),
                input.response.code(),
                input.contest,
            ],
        )?;
        let id = SubmissionId(tx.last_insert_rowid());
        tx.commit()?;
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("submission {id}")))
    }

    pub fn get(&self, id: SubmissionId) -> Result<Option<Submission>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SUBMISSIONS} WHERE s.id = ?1;"))?;
        stmt.query_row([id.get()], submission_from_row)
            .optional()
            .map_err(StoreError::from)
    }

    /// Most recent first.
    pub fn list(&self) -> Result<Vec<Submission>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_SUBMISSIONS} ORDER BY s.submitted_on DESC, s.id DESC;"
        ))?;
        let rows = stmt.query_map([], submission_from_row)?;
        let mut submissions = Vec::new();
        for submission in rows {
            submissions.push(submission?);
        }
        Ok(submissions)
    }

    pub fn record_response(
        &self,
        id: SubmissionId,
        response: ResponseKind,
        responded_on: Option<NaiveDate>,
    ) -> Result<Submission> {
        let updated = self.conn.execute(
            "UPDATE submissions SET response = ?2, responded_on = ?3 WHERE id = ?1;",
            params![id.get(), response.code(), columns::format_date(responded_on)],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("submission {id}")));
        }
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("submission {id}")))
    }
}

fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    Ok(Submission {
        id: SubmissionId(row.get(0)?),
        title_id: TitleId(row.get(1)?),
        title: columns::text(row, 2, "titles.name"),
        publisher_id: PublisherId(row.get(3)?),
        publisher: columns::text(row, 4, "publishers.name"),
        submitted_on: columns::opt_date(row, 5, "submissions.submitted_on"),
        responded_on: columns::opt_date(row, 6, "submissions.responded_on"),
        response: ResponseKind::from_code(columns::int(row, 7, "submissions.response")),
        contest: columns::flag(row, 8, "submissions.contest"),
    })
}
