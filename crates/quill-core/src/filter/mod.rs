//! Interactive row filters.
//!
//! Each concrete filter owns a [`FilterCore`] (id and text criteria, suspend
//! depth, bound view) plus a [`CriteriaSet`] of tri-state criteria. Setting a
//! property re-applies the filter, which asks the bound [`View`] to
//! re-evaluate every candidate row with [`RowFilter::on_data_row_filter`].

macro_rules! tri_state_properties {
    ($filter:ty, $kind:ident { $($getter:ident / $setter:ident => $variant:ident),* $(,)? }) => {
        impl $filter {
            $(
                pub fn $getter(&self) -> $crate::filter::TriState {
                    $crate::filter::RowFilter::criterion(self, $kind::$variant)
                }

                pub fn $setter(&mut self, state: $crate::filter::TriState) {
                    $crate::filter::RowFilter::set_criterion(self, $kind::$variant, state)
                }
            )*
        }
    };
}

macro_rules! shortcuts {
    ($filter:ty { $($name:ident => $setter:ident($state:ident)),* $(,)? }) => {
        impl $filter {
            $(
                pub fn $name(&mut self) {
                    $crate::filter::RowFilter::set_custom_property_state(self, |filter| {
                        filter.$setter($crate::filter::TriState::$state)
                    })
                }
            )*
        }
    };
}

mod base;
mod evaluator;
mod publisher;
mod queue;
mod submission;
mod tags;
mod title;
mod tristate;
mod view;

pub use base::{FilterCore, FilterEvent, RowFilter, Suspended};
pub use evaluator::{
    evaluate_bool, evaluate_eq, evaluate_nonzero, Activity, CriteriaSet, CriterionKind,
    Evaluator, FilterState, Predicate, Scope,
};
pub use publisher::{PublisherCriterion, PublisherFilter, PublisherFilterState};
pub use queue::{QueueCriterion, QueueFilter, QueueFilterState};
pub use submission::{SubmissionCriterion, SubmissionFilter, SubmissionFilterState};
pub use tags::{LookupError, TagCombine, TagMembership, TagMembershipIndex};
pub use title::{word_count_admits, TitleCriterion, TitleFilter, TitleFilterState};
pub use tristate::TriState;
pub use view::{ListView, View};

#[cfg(test)]
pub(crate) mod testing;
