pub mod ids;
pub mod publisher;
pub mod queue;
pub mod submission;
pub mod tag;
pub mod title;

use std::fmt::Debug;
use std::hash::Hash;

pub use ids::{PublisherId, QueueEntryId, QueueId, SubmissionId, TagId, TitleId};
pub use publisher::Publisher;
pub use queue::{QueueEntry, QueueStatus};
pub use submission::{ResponseKind, Submission};
pub use tag::{normalize_tag_name, Tag, TagName};
pub use title::Title;

/// A candidate row as seen by the filters.
pub trait Record {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

pub fn normalize_name(raw: &str) -> Result<String, crate::CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(crate::CoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}
