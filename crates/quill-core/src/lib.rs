pub mod domain;
pub mod error;
pub mod filter;

pub use domain::*;
pub use error::CoreError;
pub use filter::{
    FilterEvent, ListView, LookupError, PublisherFilter, QueueFilter, RowFilter, SubmissionFilter,
    TagCombine, TagMembership, TagMembershipIndex, TitleFilter, TriState, View,
};
