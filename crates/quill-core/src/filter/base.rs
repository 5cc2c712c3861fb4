use crate::domain::Record;
use crate::filter::evaluator::{CriteriaSet, CriterionKind, FilterState, Scope};
use crate::filter::tristate::TriState;
use crate::filter::view::View;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

/// Raised after every completed apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    RecordCount(usize),
    AnyFilterActive(bool),
}

type Observer = Box<dyn FnMut(FilterEvent)>;

/// State shared by every filter: the single-id and text criteria, the
/// suspend depth and the bound view.
pub struct FilterCore<R: Record> {
    id: Option<R::Id>,
    text: String,
    needle: String,
    suspend_depth: u32,
    view: Option<Box<dyn View<R>>>,
    record_count: usize,
    applies: usize,
    observers: Vec<Observer>,
}

impl<R: Record> FilterCore<R> {
    pub fn new() -> Self {
        Self {
            id: None,
            text: String::new(),
            needle: String::new(),
            suspend_depth: 0,
            view: None,
            record_count: 0,
            applies: 0,
            observers: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<R::Id> {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scope(&self) -> Scope<'_> {
        Scope { text: &self.needle }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend_depth > 0
    }

    pub fn suspend_depth(&self) -> u32 {
        self.suspend_depth
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Completed (not deferred) applies so far.
    pub fn applies(&self) -> usize {
        self.applies
    }

    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    /// True when the id criterion is set or the text criterion is non-empty.
    pub fn is_active(&self) -> bool {
        self.id.is_some() || !self.needle.is_empty()
    }

    pub fn admits_id(&self, row: &R) -> bool {
        self.id.map_or(true, |id| row.id() == id)
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.needle = text.trim().to_lowercase();
    }

    fn clear(&mut self) {
        self.id = None;
        self.text.clear();
        self.needle.clear();
    }

    fn notify(&mut self, event: FilterEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}

impl<R: Record> Default for FilterCore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> fmt::Debug for FilterCore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCore")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("suspend_depth", &self.suspend_depth)
            .field("record_count", &self.record_count)
            .field("has_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

/// Shared behaviour of the concrete filters.
///
/// Implementors supply their [`FilterCore`] and [`CriteriaSet`], plus hooks
/// for any compound state that is not a tri-state criterion. Everything else
/// (apply, suspend/resume, clear, exclusive shortcuts) is provided.
pub trait RowFilter {
    type Row: Record;
    type Kind: CriterionKind;

    fn core(&self) -> &FilterCore<Self::Row>;
    fn core_mut(&mut self) -> &mut FilterCore<Self::Row>;
    fn criteria(&self) -> &CriteriaSet<Self::Kind, Self::Row>;
    fn criteria_mut(&mut self) -> &mut CriteriaSet<Self::Kind, Self::Row>;

    /// Admission by state outside the criteria set.
    fn admits_extra(&self, _row: &Self::Row) -> bool {
        true
    }

    fn is_extra_active(&self) -> bool {
        false
    }

    /// Returns compound state to its defaults. Called by `clear_all`.
    fn reset_extra(&mut self) {}

    /// The combined admission predicate.
    fn on_data_row_filter(&self, row: &Self::Row) -> bool {
        let core = self.core();
        core.admits_id(row) && self.criteria().admits(row, &core.scope()) && self.admits_extra(row)
    }

    fn is_any_evaluator_active(&self) -> bool {
        self.criteria().any_active(&self.core().scope()) || self.is_extra_active()
    }

    fn is_any_filter_active(&self) -> bool {
        self.core().is_active() || self.is_any_evaluator_active()
    }

    fn record_count(&self) -> usize {
        self.core().record_count()
    }

    fn id_filter(&self) -> Option<<Self::Row as Record>::Id> {
        self.core().id()
    }

    fn text(&self) -> &str {
        self.core().text()
    }

    fn criterion(&self, kind: Self::Kind) -> TriState {
        self.criteria().state(kind)
    }

    /// Refreshes the bound view unless suspended.
    fn apply_filter(&mut self) {
        if self.core().is_suspended() {
            trace!(depth = self.core().suspend_depth(), "apply deferred while suspended");
            return;
        }

        let mut view = self.core_mut().view.take();
        let admitted = view
            .as_mut()
            .map(|view| view.refresh(&|row: &Self::Row| self.on_data_row_filter(row)));
        let active = self.is_any_filter_active();

        let core = self.core_mut();
        core.view = view;
        core.applies += 1;
        if let Some(count) = admitted {
            core.record_count = count;
            core.notify(FilterEvent::RecordCount(count));
        }
        core.notify(FilterEvent::AnyFilterActive(active));
        debug!(records = ?admitted, active, "filter applied");
    }

    /// Binds the view and applies.
    fn set_view<V>(&mut self, view: V)
    where
        V: View<Self::Row> + 'static,
        Self: Sized,
    {
        self.core_mut().view = Some(Box::new(view));
        self.apply_filter();
    }

    fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(FilterEvent) + 'static,
        Self: Sized,
    {
        self.core_mut().observers.push(Box::new(observer));
    }

    /// Defers applies until the returned guard (and any nested guard) drops.
    fn suspend(&mut self) -> Suspended<'_, Self>
    where
        Self: Sized,
    {
        Suspended::new(self)
    }

    /// Runs `change` suspended; applies once afterwards.
    fn batch<T>(&mut self, change: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        let mut guard = self.suspend();
        change(&mut guard)
    }

    fn set_text(&mut self, text: &str) {
        self.core_mut().set_text(text);
        self.apply_filter();
    }

    fn set_criterion(&mut self, kind: Self::Kind, state: TriState) {
        self.criteria_mut().set_state(kind, state);
        self.apply_filter();
    }

    /// Resets every criterion with a single apply.
    fn clear_all(&mut self)
    where
        Self: Sized,
    {
        let mut guard = self.suspend();
        guard.core_mut().clear();
        guard.criteria_mut().reset();
        guard.reset_extra();
    }

    /// Shows only the row with `id`; every other criterion is cleared.
    fn set_id_filter(&mut self, id: Option<<Self::Row as Record>::Id>)
    where
        Self: Sized,
    {
        let mut guard = self.suspend();
        guard.clear_all();
        guard.core_mut().id = id;
    }

    /// Clears everything, then lets `setter` turn exactly one criterion on.
    fn set_custom_property_state(&mut self, setter: impl FnOnce(&mut Self))
    where
        Self: Sized,
    {
        let mut guard = self.suspend();
        guard.clear_all();
        setter(&mut guard);
    }

    fn criteria_state(&self) -> FilterState<Self::Kind> {
        FilterState {
            text: self.core().text().to_string(),
            criteria: self.criteria().flags(),
        }
    }

    /// Replaces text and criteria from `state` with a single apply.
    fn restore_criteria(&mut self, state: &FilterState<Self::Kind>)
    where
        Self: Sized,
    {
        let mut guard = self.suspend();
        guard.clear_all();
        guard.core_mut().set_text(&state.text);
        for (kind, flag) in &state.criteria {
            guard.criteria_mut().set_state(*kind, *flag);
        }
    }
}

/// Scoped suspension. Dropping the outermost guard applies the filter once.
pub struct Suspended<'a, F: RowFilter> {
    filter: &'a mut F,
}

impl<'a, F: RowFilter> Suspended<'a, F> {
    fn new(filter: &'a mut F) -> Self {
        filter.core_mut().suspend_depth += 1;
        Self { filter }
    }
}

impl<F: RowFilter> Deref for Suspended<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.filter
    }
}

impl<F: RowFilter> DerefMut for Suspended<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.filter
    }
}

impl<F: RowFilter> Drop for Suspended<'_, F> {
    fn drop(&mut self) {
        let resumed = {
            let core = self.filter.core_mut();
            core.suspend_depth = core.suspend_depth.saturating_sub(1);
            core.suspend_depth == 0
        };
        if resumed {
            self.filter.apply_filter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterCore, FilterEvent, RowFilter};
    use crate::domain::Record;
    use crate::filter::evaluator::{evaluate_bool, Activity, CriteriaSet, CriterionKind, Predicate};
    use crate::filter::testing::RecordingView;
    use crate::filter::TriState;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct Row {
        id: i64,
        name: &'static str,
        done: bool,
    }

    impl Record for Row {
        type Id = i64;

        fn id(&self) -> i64 {
            self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Kind {
        Text,
        Done,
    }

    impl CriterionKind for Kind {
        const ALL: &'static [Self] = &[Kind::Text, Kind::Done];

        fn activity(self) -> Activity {
            match self {
                Kind::Text => Activity::Text,
                Kind::Done => Activity::Flag,
            }
        }
    }

    const TABLE: &[(Kind, Predicate<Row>)] = &[
        (Kind::Text, |row, _, scope| scope.matches(row.name)),
        (Kind::Done, |row, state, _| evaluate_bool(state, row.done)),
    ];

    struct TodoFilter {
        core: FilterCore<Row>,
        criteria: CriteriaSet<Kind, Row>,
    }

    impl TodoFilter {
        fn new() -> Self {
            Self {
                core: FilterCore::new(),
                criteria: CriteriaSet::new(TABLE),
            }
        }
    }

    impl RowFilter for TodoFilter {
        type Row = Row;
        type Kind = Kind;

        fn core(&self) -> &FilterCore<Row> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut FilterCore<Row> {
            &mut self.core
        }

        fn criteria(&self) -> &CriteriaSet<Kind, Row> {
            &self.criteria
        }

        fn criteria_mut(&mut self) -> &mut CriteriaSet<Kind, Row> {
            &mut self.criteria
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "Laundry", done: true },
            Row { id: 2, name: "Taxes", done: false },
            Row { id: 3, name: "Call mum", done: false },
        ]
    }

    #[test]
    fn each_setter_applies_once() {
        let view = RecordingView::shared(rows());
        let mut filter = TodoFilter::new();
        filter.set_view(view.clone());
        assert_eq!(view.borrow().refreshes, 1);
        assert_eq!(filter.record_count(), 3);

        filter.set_criterion(Kind::Done, TriState::Off);
        assert_eq!(view.borrow().refreshes, 2);
        assert_eq!(filter.record_count(), 2);

        filter.set_text("TAX");
        assert_eq!(view.borrow().refreshes, 3);
        assert_eq!(filter.record_count(), 1);
    }

    #[test]
    fn suspended_changes_refresh_once_with_final_state() {
        let view = RecordingView::shared(rows());
        let mut filter = TodoFilter::new();
        filter.set_view(view.clone());

        {
            let mut batch = filter.suspend();
            batch.set_criterion(Kind::Done, TriState::On);
            batch.set_text("call");
            batch.set_criterion(Kind::Done, TriState::Off);
            assert_eq!(view.borrow().refreshes, 1);
            assert!(batch.core().is_suspended());
        }

        assert_eq!(view.borrow().refreshes, 2);
        assert_eq!(filter.record_count(), 1);
        assert!(!filter.core().is_suspended());
    }

    #[test]
    fn nested_suspension_applies_only_at_outermost_exit() {
        let view = RecordingView::shared(rows());
        let mut filter = TodoFilter::new();
        filter.set_view(view.clone());

        filter.batch(|outer| {
            outer.batch(|inner| {
                inner.set_criterion(Kind::Done, TriState::On);
                assert_eq!(inner.core().suspend_depth(), 2);
            });
            assert_eq!(outer.core().suspend_depth(), 1);
            outer.clear_all();
            outer.set_text("laundry");
        });

        assert_eq!(view.borrow().refreshes, 2);
        assert_eq!(filter.record_count(), 1);
        assert_eq!(filter.criterion(Kind::Done), TriState::Neutral);
    }

    #[test]
    fn clear_all_refreshes_once() {
        let view = RecordingView::shared(rows());
        let mut filter = TodoFilter::new();
        filter.set_view(view.clone());
        filter.set_criterion(Kind::Done, TriState::On);
        filter.set_text("x");
        let before = view.borrow().refreshes;

        filter.clear_all();
        assert_eq!(view.borrow().refreshes, before + 1);
        assert!(!filter.is_any_filter_active());
        assert_eq!(filter.record_count(), 3);
    }

    #[test]
    fn id_filter_is_exclusive() {
        let mut filter = TodoFilter::new();
        filter.set_criterion(Kind::Done, TriState::On);
        filter.set_id_filter(Some(2));

        assert!(filter.is_any_filter_active());
        assert_eq!(filter.criterion(Kind::Done), TriState::Neutral);
        let rows = rows();
        assert!(!filter.on_data_row_filter(&rows[0]));
        assert!(filter.on_data_row_filter(&rows[1]));

        filter.clear_all();
        assert!(!filter.is_any_filter_active());
        assert_eq!(filter.id_filter(), None);
    }

    #[test]
    fn whitespace_text_is_inactive() {
        let mut filter = TodoFilter::new();
        filter.set_text("   ");
        assert!(!filter.is_any_filter_active());
        assert_eq!(filter.text(), "   ");
    }

    #[test]
    fn apply_without_view_still_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut filter = TodoFilter::new();
        let sink = events.clone();
        filter.subscribe(move |event| sink.borrow_mut().push(event));

        filter.set_criterion(Kind::Done, TriState::On);
        assert_eq!(
            events.borrow().as_slice(),
            &[FilterEvent::AnyFilterActive(true)]
        );

        filter.set_view(RecordingView::shared(rows()));
        assert_eq!(
            events.borrow()[1..],
            [FilterEvent::RecordCount(1), FilterEvent::AnyFilterActive(true)]
        );
    }

    #[test]
    fn restore_replaces_previous_state() {
        let mut filter = TodoFilter::new();
        filter.set_text("mum");
        filter.set_criterion(Kind::Done, TriState::Off);
        let saved = filter.criteria_state();

        let mut other = TodoFilter::new();
        other.set_criterion(Kind::Done, TriState::On);
        other.restore_criteria(&saved);
        assert_eq!(other.text(), "mum");
        assert_eq!(other.criterion(Kind::Done), TriState::Off);
        assert_eq!(other.core().applies(), 2);
    }
}
