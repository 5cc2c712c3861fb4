use crate::domain::{QueueEntry, QueueStatus};
use crate::filter::base::{FilterCore, RowFilter};
use crate::filter::evaluator::{
    evaluate_bool, Activity, CriteriaSet, CriterionKind, FilterState, Predicate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueCriterion {
    Text,
    Ready,
    Scheduled,
}

impl CriterionKind for QueueCriterion {
    const ALL: &'static [Self] = &[
        QueueCriterion::Text,
        QueueCriterion::Ready,
        QueueCriterion::Scheduled,
    ];

    fn activity(self) -> Activity {
        match self {
            QueueCriterion::Text => Activity::Text,
            _ => Activity::Flag,
        }
    }
}

const CRITERIA: &[(QueueCriterion, Predicate<QueueEntry>)] = &[
    (QueueCriterion::Text, |row, _, scope| scope.matches(&row.title)),
    (QueueCriterion::Ready, |row, state, _| evaluate_bool(state, row.title_ready)),
    (QueueCriterion::Scheduled, |row, state, _| {
        evaluate_bool(state, row.scheduled_on.is_some())
    }),
];

/// Saved state of a [`QueueFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueFilterState {
    #[serde(flatten)]
    pub base: FilterState<QueueCriterion>,
    pub status: Option<QueueStatus>,
}

pub struct QueueFilter {
    core: FilterCore<QueueEntry>,
    criteria: CriteriaSet<QueueCriterion, QueueEntry>,
    status: Option<QueueStatus>,
}

impl QueueFilter {
    pub fn new() -> Self {
        Self {
            core: FilterCore::new(),
            criteria: CriteriaSet::new(CRITERIA),
            status: None,
        }
    }

    pub fn status(&self) -> Option<QueueStatus> {
        self.status
    }

    /// `None` admits entries of every status.
    pub fn set_status(&mut self, status: Option<QueueStatus>) {
        self.status = status;
        self.apply_filter();
    }

    /// Shows only entries with `status`; every other criterion is cleared.
    pub fn set_to_status(&mut self, status: QueueStatus) {
        self.set_custom_property_state(|filter| filter.set_status(Some(status)));
    }

    pub fn snapshot(&self) -> QueueFilterState {
        QueueFilterState {
            base: self.criteria_state(),
            status: self.status,
        }
    }

    pub fn restore(&mut self, state: &QueueFilterState) {
        self.batch(|filter| {
            filter.restore_criteria(&state.base);
            filter.set_status(state.status);
        });
    }
}

impl Default for QueueFilter {
    fn default() -> Self {
        Self::new()
    }
}

tri_state_properties!(QueueFilter, QueueCriterion {
    ready_state / set_ready_state => Ready,
    scheduled_state / set_scheduled_state => Scheduled,
});

shortcuts!(QueueFilter {
    set_to_ready => set_ready_state(On),
    set_to_scheduled => set_scheduled_state(On),
});

impl RowFilter for QueueFilter {
    type Row = QueueEntry;
    type Kind = QueueCriterion;

    fn core(&self) -> &FilterCore<QueueEntry> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FilterCore<QueueEntry> {
        &mut self.core
    }

    fn criteria(&self) -> &CriteriaSet<QueueCriterion, QueueEntry> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut CriteriaSet<QueueCriterion, QueueEntry> {
        &mut self.criteria
    }

    fn admits_extra(&self, row: &QueueEntry) -> bool {
        self.status.map_or(true, |status| row.status == status)
    }

    fn is_extra_active(&self) -> bool {
        self.status.is_some()
    }

    fn reset_extra(&mut self) {
        self.status = None;
    }
}
