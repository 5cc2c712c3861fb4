use crate::domain::{TagId, TitleId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("tag lookup failed: {0}")]
pub struct LookupError(pub String);

/// Reverse lookup from a tag to the titles bearing it.
pub trait TagMembership {
    fn title_ids_for_tag(&self, tag: TagId) -> Result<Vec<TitleId>, LookupError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCombine {
    /// Row bears at least one selected tag.
    #[default]
    Any,
    /// Row bears every selected tag.
    All,
}

impl TagCombine {
    pub fn label(self) -> &'static str {
        match self {
            TagCombine::Any => "any",
            TagCombine::All => "all",
        }
    }
}

impl fmt::Display for TagCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TagCombine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "or" => Ok(TagCombine::Any),
            "all" | "and" => Ok(TagCombine::All),
            other => Err(CoreError::InvalidTagCombine(other.to_string())),
        }
    }
}

/// Cached outcome of one reverse lookup.
#[derive(Debug, Clone)]
enum Membership {
    Members(Rc<HashSet<TitleId>>),
    /// The lookup failed; the tag constrains nothing until invalidated.
    Failed,
}

/// Selected tags plus a lazily built tag -> member titles cache.
///
/// A cache entry is built on the first membership test that needs it and
/// stays until [`TagMembershipIndex::invalidate`] drops it. Whoever changes
/// tag assignments must invalidate the affected tag. Failed lookups are
/// cached too, so a broken source is queried once per tag, not once per row.
pub struct TagMembershipIndex {
    tags: Vec<TagId>,
    combine: TagCombine,
    cache: RefCell<HashMap<TagId, Membership>>,
    lookups: Cell<usize>,
    source: Rc<dyn TagMembership>,
}

impl TagMembershipIndex {
    pub fn new(source: Rc<dyn TagMembership>) -> Self {
        Self {
            tags: Vec::new(),
            combine: TagCombine::default(),
            cache: RefCell::new(HashMap::new()),
            lookups: Cell::new(0),
            source,
        }
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    pub fn combine(&self) -> TagCombine {
        self.combine
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Returns false when the tag was already selected.
    pub(crate) fn add(&mut self, tag: TagId) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Returns false when the tag was not selected.
    pub(crate) fn remove(&mut self, tag: TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|selected| *selected != tag);
        self.tags.len() != before
    }

    /// Returns false when the mode did not change.
    pub(crate) fn set_combine(&mut self, combine: TagCombine) -> bool {
        if self.combine == combine {
            return false;
        }
        self.combine = combine;
        true
    }

    /// Deselects every tag. Cached membership is kept.
    pub(crate) fn clear(&mut self) -> bool {
        let had_tags = !self.tags.is_empty();
        self.tags.clear();
        had_tags
    }

    /// Drops the cached members of `tag`. Returns whether anything was cached.
    pub fn invalidate(&mut self, tag: TagId) -> bool {
        let dropped = self.cache.get_mut().remove(&tag).is_some();
        trace!(tag = %tag, dropped, "tag membership invalidated");
        dropped
    }

    pub fn invalidate_all(&mut self) {
        let dropped = self.cache.get_mut().drain().count();
        trace!(dropped, "all tag membership invalidated");
    }

    pub fn is_cached(&self, tag: TagId) -> bool {
        self.cache.borrow().contains_key(&tag)
    }

    /// Whether the last lookup for `tag` failed and has not been invalidated.
    pub fn is_failed(&self, tag: TagId) -> bool {
        matches!(self.cache.borrow().get(&tag), Some(Membership::Failed))
    }

    /// Number of reverse lookups issued against the source.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    pub fn is_row_included(&self, row: TitleId) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        match self.combine {
            TagCombine::Any => self.tags.iter().any(|tag| self.admits(*tag, row)),
            TagCombine::All => self.tags.iter().all(|tag| self.admits(*tag, row)),
        }
    }

    fn admits(&self, tag: TagId, row: TitleId) -> bool {
        match self.membership(tag) {
            Membership::Members(members) => members.contains(&row),
            Membership::Failed => true,
        }
    }

    fn membership(&self, tag: TagId) -> Membership {
        let cached = self.cache.borrow().get(&tag).cloned();
        if let Some(membership) = cached {
            return membership;
        }

        self.lookups.set(self.lookups.get() + 1);
        let membership = match self.source.title_ids_for_tag(tag) {
            Ok(ids) => {
                let members = ids.into_iter().collect::<HashSet<_>>();
                trace!(tag = %tag, members = members.len(), "tag membership cached");
                Membership::Members(Rc::new(members))
            }
            Err(err) => {
                warn!(tag = %tag, error = %err, "tag lookup failed; tag left unconstrained");
                Membership::Failed
            }
        };
        self.cache.borrow_mut().insert(tag, membership.clone());
        membership
    }
}

impl fmt::Debug for TagMembershipIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagMembershipIndex")
            .field("tags", &self.tags)
            .field("combine", &self.combine)
            .field("cached", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}
