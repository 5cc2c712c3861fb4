use crate::domain::ids::{PublisherId, SubmissionId, TitleId};
use crate::domain::Record;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    #[default]
    None,
    Accepted,
    Declined,
    Withdrawn,
}

impl ResponseKind {
    pub fn code(self) -> i64 {
        match self {
            ResponseKind::None => 0,
            ResponseKind::Accepted => 1,
            ResponseKind::Declined => 2,
            ResponseKind::Withdrawn => 3,
        }
    }

    /// Unknown codes read as `None`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ResponseKind::Accepted,
            2 => ResponseKind::Declined,
            3 => ResponseKind::Withdrawn,
            _ => ResponseKind::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResponseKind::None => "none",
            ResponseKind::Accepted => "accepted",
            ResponseKind::Declined => "declined",
            ResponseKind::Withdrawn => "withdrawn",
        }
    }
}

impl FromStr for ResponseKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "pending" => Ok(ResponseKind::None),
            "accepted" => Ok(ResponseKind::Accepted),
            "declined" | "rejected" => Ok(ResponseKind::Declined),
            "withdrawn" => Ok(ResponseKind::Withdrawn),
            other => Err(CoreError::InvalidResponseKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub title_id: TitleId,
    pub title: String,
    pub publisher_id: PublisherId,
    pub publisher: String,
    pub submitted_on: Option<NaiveDate>,
    pub responded_on: Option<NaiveDate>,
    pub response: ResponseKind,
    pub contest: bool,
}

impl Submission {
    /// Still waiting on the publisher.
    pub fn is_active(&self) -> bool {
        self.responded_on.is_none() && self.response == ResponseKind::None
    }
}

impl Record for Submission {
    type Id = SubmissionId;

    fn id(&self) -> SubmissionId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{ResponseKind, Submission};
    use chrono::NaiveDate;

    #[test]
    fn unknown_response_code_reads_as_none() {
        assert_eq!(ResponseKind::from_code(99), ResponseKind::None);
        assert_eq!(ResponseKind::from_code(-1), ResponseKind::None);
        for kind in [
            ResponseKind::None,
            ResponseKind::Accepted,
            ResponseKind::Declined,
            ResponseKind::Withdrawn,
        ] {
            assert_eq!(ResponseKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn responded_submission_is_not_active() {
        let mut submission = Submission::default();
        assert!(submission.is_active());
        submission.responded_on = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert!(!submission.is_active());
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("Rejected".parse::<ResponseKind>().unwrap(), ResponseKind::Declined);
        assert!("maybe".parse::<ResponseKind>().is_err());
    }
}
