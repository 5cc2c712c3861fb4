use crate::domain::ids::{QueueEntryId, QueueId, TitleId};
use crate::domain::Record;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    #[default]
    Pending,
    Scheduled,
    Published,
    Removed,
}

impl QueueStatus {
    pub fn code(self) -> i64 {
        match self {
            QueueStatus::Pending => 0,
            QueueStatus::Scheduled => 1,
            QueueStatus::Published => 2,
            QueueStatus::Removed => 3,
        }
    }

    /// Unknown codes read as `Pending`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => QueueStatus::Scheduled,
            2 => QueueStatus::Published,
            3 => QueueStatus::Removed,
            _ => QueueStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Scheduled => "scheduled",
            QueueStatus::Published => "published",
            QueueStatus::Removed => "removed",
        }
    }
}

impl FromStr for QueueStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(QueueStatus::Pending),
            "scheduled" => Ok(QueueStatus::Scheduled),
            "published" => Ok(QueueStatus::Published),
            "removed" => Ok(QueueStatus::Removed),
            other => Err(CoreError::InvalidQueueStatus(other.to_string())),
        }
    }
}

/// A title placed in a publishing queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub queue_id: QueueId,
    pub title_id: TitleId,
    pub title: String,
    pub status: QueueStatus,
    pub scheduled_on: Option<NaiveDate>,
    pub title_ready: bool,
}

impl Record for QueueEntry {
    type Id = QueueEntryId;

    fn id(&self) -> QueueEntryId {
        self.id
    }
}
