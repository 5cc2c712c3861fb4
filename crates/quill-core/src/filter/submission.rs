use crate::domain::{ResponseKind, Submission};
use crate::filter::base::{FilterCore, RowFilter};
use crate::filter::evaluator::{
    evaluate_bool, evaluate_eq, Activity, CriteriaSet, CriterionKind, FilterState, Predicate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionCriterion {
    Text,
    Active,
    Accepted,
    Declined,
    Withdrawn,
    Contest,
}

impl CriterionKind for SubmissionCriterion {
    const ALL: &'static [Self] = &[
        SubmissionCriterion::Text,
        SubmissionCriterion::Active,
        SubmissionCriterion::Accepted,
        SubmissionCriterion::Declined,
        SubmissionCriterion::Withdrawn,
        SubmissionCriterion::Contest,
    ];

    fn activity(self) -> Activity {
        match self {
            SubmissionCriterion::Text => Activity::Text,
            _ => Activity::Flag,
        }
    }
}

const CRITERIA: &[(SubmissionCriterion, Predicate<Submission>)] = &[
    (SubmissionCriterion::Text, |row, _, scope| {
        scope.matches_any([row.title.as_str(), row.publisher.as_str()])
    }),
    (SubmissionCriterion::Active, |row, state, _| evaluate_bool(state, row.is_active())),
    (SubmissionCriterion::Accepted, |row, state, _| {
        evaluate_eq(state, row.response.code(), ResponseKind::Accepted.code())
    }),
    (SubmissionCriterion::Declined, |row, state, _| {
        evaluate_eq(state, row.response.code(), ResponseKind::Declined.code())
    }),
    (SubmissionCriterion::Withdrawn, |row, state, _| {
        evaluate_eq(state, row.response.code(), ResponseKind::Withdrawn.code())
    }),
    (SubmissionCriterion::Contest, |row, state, _| evaluate_bool(state, row.contest)),
];

pub type SubmissionFilterState = FilterState<SubmissionCriterion>;

pub struct SubmissionFilter {
    core: FilterCore<Submission>,
    criteria: CriteriaSet<SubmissionCriterion, Submission>,
}

impl SubmissionFilter {
    pub fn new() -> Self {
        Self {
            core: FilterCore::new(),
            criteria: CriteriaSet::new(CRITERIA),
        }
    }

    pub fn snapshot(&self) -> SubmissionFilterState {
        self.criteria_state()
    }

    pub fn restore(&mut self, state: &SubmissionFilterState) {
        self.restore_criteria(state);
    }
}

impl Default for SubmissionFilter {
    fn default() -> Self {
        Self::new()
    }
}

tri_state_properties!(SubmissionFilter, SubmissionCriterion {
    active_state / set_active_state => Active,
    accepted_state / set_accepted_state => Accepted,
    declined_state / set_declined_state => Declined,
    withdrawn_state / set_withdrawn_state => Withdrawn,
    contest_state / set_contest_state => Contest,
});

shortcuts!(SubmissionFilter {
    set_to_active => set_active_state(On),
    set_to_accepted => set_accepted_state(On),
    set_to_declined => set_declined_state(On),
    set_to_withdrawn => set_withdrawn_state(On),
    set_to_contest => set_contest_state(On),
});

impl RowFilter for SubmissionFilter {
    type Row = Submission;
    type Kind = SubmissionCriterion;

    fn core(&self) -> &FilterCore<Submission> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FilterCore<Submission> {
        &mut self.core
    }

    fn criteria(&self) -> &CriteriaSet<SubmissionCriterion, Submission> {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut CriteriaSet<SubmissionCriterion, Submission> {
        &mut self.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmissionCriterion, SubmissionFilter};
    use crate::domain::{PublisherId, ResponseKind, Submission, SubmissionId, TitleId};
    use crate::filter::testing::RecordingView;
    use crate::filter::{RowFilter, TriState};
    use chrono::NaiveDate;

    fn submission(id: i64, title: &str, publisher: &str) -> Submission {
        Submission {
            id: SubmissionId(id),
            title_id: TitleId(id * 10),
            title: title.to_string(),
            publisher_id: PublisherId(id * 100),
            publisher: publisher.to_string(),
            submitted_on: NaiveDate::from_ymd_opt(2024, 1, id as u32),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Submission> {
        let responded = NaiveDate::from_ymd_opt(2024, 6, 1);
        vec![
            submission(1, "Salt Roads", "Clarkesworld"),
            Submission {
                response: ResponseKind::Accepted,
                responded_on: responded,
                ..submission(2, "Lantern Season", "Strange Horizons")
            },
            Submission {
                response: ResponseKind::Declined,
                responded_on: responded,
                contest: true,
                ..submission(3, "Salt Roads", "Writers of the Future")
            },
            Submission {
                response: ResponseKind::Withdrawn,
                ..submission(4, "The Glass Orchard", "Uncanny")
            },
        ]
    }

    fn admitted(filter: &SubmissionFilter) -> Vec<i64> {
        sample()
            .iter()
            .filter(|row| filter.on_data_row_filter(row))
            .map(|row| row.id.get())
            .collect()
    }

    #[test]
    fn neutral_admits_all() {
        let filter = SubmissionFilter::new();
        assert!(!filter.is_any_filter_active());
        assert_eq!(admitted(&filter), vec![1, 2, 3, 4]);
    }

    #[test]
    fn response_criteria_use_polarity() {
        let mut filter = SubmissionFilter::new();
        filter.set_accepted_state(TriState::On);
        assert_eq!(admitted(&filter), vec![2]);
        filter.set_accepted_state(TriState::Off);
        assert_eq!(admitted(&filter), vec![1, 3, 4]);
    }

    #[test]
    fn withdrawn_without_date_is_not_active() {
        let mut filter = SubmissionFilter::new();
        filter.set_to_active();
        assert_eq!(admitted(&filter), vec![1]);
    }

    #[test]
    fn shortcuts_clear_each_other() {
        let mut filter = SubmissionFilter::new();
        filter.set_text("salt");
        filter.set_to_declined();
        assert_eq!(filter.text(), "");
        assert_eq!(admitted(&filter), vec![3]);

        filter.set_to_contest();
        assert_eq!(filter.declined_state(), TriState::Neutral);
        assert_eq!(filter.contest_state(), TriState::On);
        assert_eq!(admitted(&filter), vec![3]);

        filter.set_to_withdrawn();
        assert_eq!(filter.contest_state(), TriState::Neutral);
        assert_eq!(admitted(&filter), vec![4]);
    }

    #[test]
    fn text_matches_title_or_publisher() {
        let mut filter = SubmissionFilter::new();
        filter.set_text("salt");
        assert_eq!(admitted(&filter), vec![1, 3]);
        filter.set_text("HORIZONS");
        assert_eq!(admitted(&filter), vec![2]);
    }

    #[test]
    fn clear_all_is_one_refresh_and_matches_fresh() {
        let view = RecordingView::shared(sample());
        let mut filter = SubmissionFilter::new();
        filter.set_view(view.clone());
        filter.set_text("salt");
        filter.set_contest_state(TriState::Off);
        assert_eq!(filter.record_count(), 1);
        let before = view.borrow().refreshes;

        filter.clear_all();
        assert_eq!(view.borrow().refreshes, before + 1);
        assert_eq!(filter.record_count(), 4);
        let fresh = SubmissionFilter::new();
        for row in sample() {
            assert_eq!(filter.on_data_row_filter(&row), fresh.on_data_row_filter(&row));
        }
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut filter = SubmissionFilter::new();
        filter.set_text("uncanny");
        filter.set_active_state(TriState::Off);
        let state = filter.snapshot();
        assert_eq!(
            state.criteria.get(&SubmissionCriterion::Active),
            Some(&TriState::Off)
        );

        let mut other = SubmissionFilter::new();
        other.restore(&state);
        assert_eq!(admitted(&other), vec![4]);
    }
}
