use crate::domain::ids::TitleId;
use crate::domain::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub folder: Option<String>,
    pub word_count: i64,
    pub ready: bool,
    pub flagged: bool,
    pub question: bool,
    pub published: bool,
    pub self_published: bool,
    /// Number of submissions ever made for this title.
    pub submission_count: i64,
}

impl Title {
    pub fn new(id: TitleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Record for Title {
    type Id = TitleId;

    fn id(&self) -> TitleId {
        self.id
    }
}
