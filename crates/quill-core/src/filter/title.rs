use crate::domain::{TagId, Title};
use crate::filter::base::{FilterCore, RowFilter};
use crate::filter::evaluator::{
    evaluate_bool, evaluate_nonzero, Activity, CriteriaSet, CriterionKind, FilterState, Predicate,
};
use crate::filter::tags::{TagCombine, TagMembership, TagMembershipIndex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCriterion {
    Text,
    Ready,
    Flagged,
    Question,
    Published,
    SelfPublished,
    Submitted,
}

impl CriterionKind for TitleCriterion {
    const ALL: &'static [Self] = &[
        TitleCriterion::Text,
        TitleCriterion::Ready,
        TitleCriterion::Flagged,
        TitleCriterion::Question,
        TitleCriterion::Published,
        TitleCriterion::SelfPublished,
        TitleCriterion::Submitted,
    ];

    fn activity(self) -> Activity {
        match self {
            TitleCriterion::Text => Activity::Text,
            _ => Activity::Flag,
        }
    }
}

const CRITERIA: &[(TitleCriterion, Predicate<Title>)] = &[
    (TitleCriterion::Text, |row, _, scope| scope.matches(&row.name)),
    (TitleCriterion::Ready, |row, state, _| evaluate_bool(state, row.ready)),
    (TitleCriterion::Flagged, |row, state, _| evaluate_bool(state, row.flagged)),
    (TitleCriterion::Question, |row, state, _| evaluate_bool(state, row.question)),
    (TitleCriterion::Published, |row, state, _| evaluate_bool(state, row.published)),
    (TitleCriterion::SelfPublished, |row, state, _| {
        evaluate_bool(state, row.self_published)
    }),
    (TitleCriterion::Submitted, |row, state, _| {
        evaluate_nonzero(state, row.submission_count)
    }),
];

/// Positive `threshold` admits counts above it, negative admits counts below
/// its magnitude, zero admits everything.
pub fn word_count_admits(threshold: i64, word_count: i64) -> bool {
    match threshold.cmp(&0) {
        Ordering::Greater => word_count > threshold,
        Ordering::Less => word_count < threshold.saturating_neg(),
        Ordering::Equal => true,
    }
}

/// Saved state of a [`TitleFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleFilterState {
    #[serde(flatten)]
    pub base: FilterState<TitleCriterion>,
    pub word_count: i64,
    pub folder: String,
    pub tags: Vec<TagId>,
    pub tag_combine: TagCombine,
}

pub struct TitleFilter {
    core: FilterCore<Title>,
    criteria: CriteriaSet<TitleCriterion, Title>,
    word_count: i64,
    folder: String,
    folder_needle: String,
    tags: TagMembershipIndex,
}

impl TitleFilter {
    pub fn new(tag_source: Rc<dyn TagMembership>) -> Self {
        Self {
            core: FilterCore::new(),
            criteria: CriteriaSet::new(CRITERIA),
            word_count: 0,
            folder: String::new(),
            folder_needle: String::new(),
            tags: TagMembershipIndex::new(tag_source),
        }
    }

    pub fn word_count(&self) -> i64 {
        self.word_count
    }

    pub fn set_word_count(&mut self, threshold: i64) {
        self.word_count = threshold;
        self.apply_filter();
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Case-insensitive substring of the title's folder.
    pub fn set_folder(&mut self, folder: &str) {
        self.folder = folder.to_string();
        self.folder_needle = folder.trim().to_lowercase();
        self.apply_filter();
    }

    pub fn tags(&self) -> &TagMembershipIndex {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: TagId) -> bool {
        let added = self.tags.add(tag);
        if added {
            self.apply_filter();
        }
        added
    }

    pub fn remove_tag(&mut self, tag: TagId) -> bool {
        let removed = self.tags.remove(tag);
        if removed {
            self.apply_filter();
        }
        removed
    }

    pub fn set_tag_combine(&mut self, combine: TagCombine) -> bool {
        let changed = self.tags.set_combine(combine);
        if changed {
            self.apply_filter();
        }
        changed
    }

    /// Drops cached membership for `tag` after its assignments changed.
    pub fn invalidate_tag(&mut self, tag: TagId) -> bool {
        self.tags.invalidate(tag)
    }

    /// Drops all cached membership, e.g. after a bulk re-tag or once a failing
    /// tag source has recovered.
    pub fn invalidate_all_tags(&mut self) {
        self.tags.invalidate_all();
    }

    pub fn snapshot(&self) -> TitleFilterState {
        TitleFilterState {
            base: self.criteria_state(),
            word_count: self.word_count,
            folder: self.folder.clone(),
            tags: self.tags.tags().to_vec(),
            tag_combine: self.tags.combine(),
        }
    }

    pub fn restore(&mut self, state: &TitleFilterState) {
        self.batch(|filter| {
            filter.restore_criteria(&state.base);
            filter.set_word_count(state.word_count);
            filter.set_folder(&state.folder);
            filter.set_tag_combine(state.tag_combine);
            for tag in &state.tags {
                filter.add_tag(*tag);
            }
        });
    }
}

tri_state_properties!(TitleFilter, TitleCriterion {
    ready_state / set_ready_state => Ready,
    flagged_state / set_flagged_state => Flagged,
    question_state / set_question_state => Question,
    published_state / set_published_state => Published,
    self_published_state / set_self_published_state => SelfPublished,
    submitted_state / set_submitted_state => Submitted,
});

shortcuts!(TitleFilter {
    set_to_ready => set_ready_state(On),
    set_to_flagged => set_flagged_state(On),
    set_to_question => set_question_state(On),
    set_to_published => set_published_state(On),
    set_to_self_published => set_self_published_state(On),
    set_to_submitted => set_submitted_state(On),
    set_to_unsubmitted => set_submitted_state(Off),
});

impl RowFilter for TitleFilter {
    type Row = Title;
    type Kind = TitleCriterion;

    fn core(&self) -> &FilterCore<Title> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FilterCore<Title> {
        &mut self.core
    }

    fn criteria(&self) -> &CriteriaSet<TitleCriterion, Title> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut CriteriaSet<TitleCriterion, Title> {
        &mut self.criteria
    }

    fn admits_extra(&self, row: &Title) -> bool {
        word_count_admits(self.word_count, row.word_count)
            && (self.folder_needle.is_empty()
                || row
                    .folder
                    .as_deref()
                    .is_some_and(|folder| folder.to_lowercase().contains(&self.folder_needle)))
            && self.tags.is_row_included(row.id)
    }

    fn is_extra_active(&self) -> bool {
        self.word_count != 0 || !self.folder_needle.is_empty() || !self.tags.is_empty()
    }

    fn reset_extra(&mut self) {
        self.word_count = 0;
        self.folder.clear();
        self.folder_needle.clear();
        self.tags.clear();
        self.tags.set_combine(TagCombine::default());
    }
}
