use crate::domain::Publisher;
use crate::filter::base::{FilterCore, RowFilter};
use crate::filter::evaluator::{
    evaluate_bool, evaluate_nonzero, Activity, CriteriaSet, CriterionKind, FilterState, Predicate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherCriterion {
    Text,
    HasUrl,
    Exclusive,
    Paying,
    Goner,
    ActiveSubmissions,
}

impl CriterionKind for PublisherCriterion {
    const ALL: &'static [Self] = &[
        PublisherCriterion::Text,
        PublisherCriterion::HasUrl,
        PublisherCriterion::Exclusive,
        PublisherCriterion::Paying,
        PublisherCriterion::Goner,
        PublisherCriterion::ActiveSubmissions,
    ];

    fn activity(self) -> Activity {
        match self {
            PublisherCriterion::Text => Activity::Text,
            _ => Activity::Flag,
        }
    }
}

const CRITERIA: &[(PublisherCriterion, Predicate<Publisher>)] = &[
    (PublisherCriterion::Text, |row, _, scope| {
        scope.matches_any([row.name.as_str(), row.url.as_deref().unwrap_or_default()])
    }),
    (PublisherCriterion::HasUrl, |row, state, _| evaluate_bool(state, row.has_url())),
    (PublisherCriterion::Exclusive, |row, state, _| evaluate_bool(state, row.exclusive)),
    (PublisherCriterion::Paying, |row, state, _| evaluate_bool(state, row.paying)),
    (PublisherCriterion::Goner, |row, state, _| evaluate_bool(state, row.goner)),
    (PublisherCriterion::ActiveSubmissions, |row, state, _| {
        evaluate_nonzero(state, row.active_submissions)
    }),
];

pub type PublisherFilterState = FilterState<PublisherCriterion>;

pub struct PublisherFilter {
    core: FilterCore<Publisher>,
    criteria: CriteriaSet<PublisherCriterion, Publisher>,
}

impl PublisherFilter {
    pub fn new() -> Self {
        Self {
            core: FilterCore::new(),
            criteria: CriteriaSet::new(CRITERIA),
        }
    }

    pub fn snapshot(&self) -> PublisherFilterState {
        self.criteria_state()
    }

    pub fn restore(&mut self, state: &PublisherFilterState) {
        self.restore_criteria(state);
    }
}

impl Default for PublisherFilter {
    fn default() -> Self {
        Self::new()
    }
}

tri_state_properties!(PublisherFilter, PublisherCriterion {
    has_url_state / set_has_url_state => HasUrl,
    exclusive_state / set_exclusive_state => Exclusive,
    paying_state / set_paying_state => Paying,
    goner_state / set_goner_state => Goner,
    active_submissions_state / set_active_submissions_state => ActiveSubmissions,
});

shortcuts!(PublisherFilter {
    set_to_open => set_goner_state(Off),
    set_to_exclusive => set_exclusive_state(On),
    set_to_paying => set_paying_state(On),
    set_to_goner => set_goner_state(On),
    set_to_active => set_active_submissions_state(On),
});

impl RowFilter for PublisherFilter {
    type Row = Publisher;
    type Kind = PublisherCriterion;

    fn core(&self) -> &FilterCore<Publisher> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FilterCore<Publisher> {
        &mut self.core
    }

    fn criteria(&self) -> &CriteriaSet<PublisherCriterion, Publisher> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut CriteriaSet<PublisherCriterion, Publisher> {
        &mut self.criteria
    }
}
