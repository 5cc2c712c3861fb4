use crate::filter::tristate::TriState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Values owned by the filter that a predicate may read.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    /// Trimmed, lowercased text criterion; empty when unset.
    pub text: &'a str,
}

impl Scope<'_> {
    /// Case-insensitive substring test against the text criterion. Always
    /// true while the text criterion is empty.
    pub fn matches(&self, haystack: &str) -> bool {
        self.text.is_empty() || haystack.to_lowercase().contains(self.text)
    }

    pub fn matches_any<'h>(&self, haystacks: impl IntoIterator<Item = &'h str>) -> bool {
        self.text.is_empty() || haystacks.into_iter().any(|haystack| self.matches(haystack))
    }
}

pub type Predicate<R> = fn(&R, TriState, &Scope<'_>) -> bool;

/// How a criterion decides whether it is currently constraining rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Active whenever its flag is not neutral.
    Flag,
    /// Active whenever the filter's text criterion is non-empty.
    Text,
}

pub trait CriterionKind: Copy + Eq + Ord + Debug + 'static {
    const ALL: &'static [Self];

    fn activity(self) -> Activity {
        Activity::Flag
    }
}

/// `On` requires `value`, `Off` requires `!value`, `Neutral` admits everything.
pub fn evaluate_bool(state: TriState, value: bool) -> bool {
    match state {
        TriState::On => value,
        TriState::Off => !value,
        TriState::Neutral => true,
    }
}

pub fn evaluate_eq(state: TriState, value: i64, target: i64) -> bool {
    evaluate_bool(state, value == target)
}

pub fn evaluate_nonzero(state: TriState, value: i64) -> bool {
    evaluate_bool(state, value != 0)
}

fn always<R>(_row: &R, _state: TriState, _scope: &Scope<'_>) -> bool {
    true
}

/// One tri-state criterion bound to its predicate.
pub struct Evaluator<K, R> {
    kind: K,
    state: TriState,
    predicate: Predicate<R>,
}

impl<K: CriterionKind, R> Evaluator<K, R> {
    /// Looks `kind` up in `table`. Kinds without an entry admit every row.
    pub fn new(kind: K, table: &[(K, Predicate<R>)]) -> Self {
        let predicate = table
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, predicate)| *predicate)
            .unwrap_or(always::<R> as Predicate<R>);
        Self {
            kind,
            state: TriState::Neutral,
            predicate,
        }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn state(&self) -> TriState {
        self.state
    }

    pub fn set_state(&mut self, state: TriState) {
        self.state = state;
    }

    pub fn evaluate(&self, row: &R, scope: &Scope<'_>) -> bool {
        (self.predicate)(row, self.state, scope)
    }

    pub fn is_active(&self, scope: &Scope<'_>) -> bool {
        match self.kind.activity() {
            Activity::Flag => !self.state.is_neutral(),
            Activity::Text => !scope.text.is_empty(),
        }
    }
}

impl<K: Debug, R> Debug for Evaluator<K, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// One evaluator per variant of `K`, in declaration order.
#[derive(Debug)]
pub struct CriteriaSet<K, R> {
    evaluators: Vec<Evaluator<K, R>>,
}

impl<K: CriterionKind, R> CriteriaSet<K, R> {
    pub fn new(table: &[(K, Predicate<R>)]) -> Self {
        let evaluators = K::ALL
            .iter()
            .map(|kind| Evaluator::new(*kind, table))
            .collect();
        Self { evaluators }
    }

    pub fn get(&self, kind: K) -> Option<&Evaluator<K, R>> {
        self.evaluators.iter().find(|evaluator| evaluator.kind == kind)
    }

    pub fn state(&self, kind: K) -> TriState {
        self.get(kind)
            .map(Evaluator::state)
            .unwrap_or(TriState::Neutral)
    }

    pub fn set_state(&mut self, kind: K, state: TriState) {
        if let Some(evaluator) = self
            .evaluators
            .iter_mut()
            .find(|evaluator| evaluator.kind == kind)
        {
            evaluator.set_state(state);
        }
    }

    pub fn admits(&self, row: &R, scope: &Scope<'_>) -> bool {
        self.evaluators
            .iter()
            .all(|evaluator| evaluator.evaluate(row, scope))
    }

    pub fn any_active(&self, scope: &Scope<'_>) -> bool {
        self.evaluators
            .iter()
            .any(|evaluator| evaluator.is_active(scope))
    }

    pub fn active_count(&self, scope: &Scope<'_>) -> usize {
        self.evaluators
            .iter()
            .filter(|evaluator| evaluator.is_active(scope))
            .count()
    }

    pub fn reset(&mut self) {
        for evaluator in &mut self.evaluators {
            evaluator.set_state(TriState::Neutral);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Evaluator<K, R>> {
        self.evaluators.iter()
    }

    /// Non-neutral flags of flag-driven criteria.
    pub fn flags(&self) -> BTreeMap<K, TriState> {
        self.evaluators
            .iter()
            .filter(|evaluator| evaluator.kind.activity() == Activity::Flag)
            .filter(|evaluator| !evaluator.state.is_neutral())
            .map(|evaluator| (evaluator.kind, evaluator.state))
            .collect()
    }
}

/// Serializable criterion values shared by every filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState<K: Ord> {
    pub text: String,
    pub criteria: BTreeMap<K, TriState>,
}

impl<K: Ord> Default for FilterState<K> {
    fn default() -> Self {
        Self {
            text: String::new(),
            criteria: BTreeMap::new(),
        }
    }
}
