use crate::domain::ids::PublisherId;
use crate::domain::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub url: Option<String>,
    /// Does not accept simultaneous submissions.
    pub exclusive: bool,
    pub paying: bool,
    /// Closed for good.
    pub goner: bool,
    pub active_submissions: i64,
}

impl Publisher {
    pub fn new(id: PublisherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

impl Record for Publisher {
    type Id = PublisherId;

    fn id(&self) -> PublisherId {
        self.id
    }
}
