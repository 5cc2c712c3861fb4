use std::cell::RefCell;
use std::rc::Rc;

/// A bound view over candidate rows. The filter never iterates the rows
/// itself; it hands the view an admission predicate and asks it to refresh.
pub trait View<R> {
    /// Re-evaluates every candidate row and returns how many were admitted.
    fn refresh(&mut self, admit: &dyn Fn(&R) -> bool) -> usize;
}

impl<R, V: View<R> + ?Sized> View<R> for Rc<RefCell<V>> {
    fn refresh(&mut self, admit: &dyn Fn(&R) -> bool) -> usize {
        self.borrow_mut().refresh(admit)
    }
}

impl<R, V: View<R> + ?Sized> View<R> for Box<V> {
    fn refresh(&mut self, admit: &dyn Fn(&R) -> bool) -> usize {
        (**self).refresh(admit)
    }
}

/// In-memory list of candidate rows plus the currently admitted subset.
#[derive(Debug, Clone)]
pub struct ListView<R> {
    rows: Vec<R>,
    visible: Vec<usize>,
    refreshes: usize,
}

impl<R> ListView<R> {
    /// Every row is visible until the first refresh.
    pub fn new(rows: Vec<R>) -> Self {
        let visible = (0..rows.len()).collect();
        Self {
            rows,
            visible,
            refreshes: 0,
        }
    }

    pub fn shared(rows: Vec<R>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(rows)))
    }

    /// Replaces the candidate rows; the caller re-applies its filter.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.visible = (0..rows.len()).collect();
        self.rows = rows;
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn visible(&self) -> impl Iterator<Item = &R> + '_ {
        self.visible.iter().filter_map(|index| self.rows.get(*index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Number of refreshes performed so far.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl<R> View<R> for ListView<R> {
    fn refresh(&mut self, admit: &dyn Fn(&R) -> bool) -> usize {
        self.refreshes += 1;
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| admit(row))
            .map(|(index, _)| index)
            .collect();
        self.visible.len()
    }
}
