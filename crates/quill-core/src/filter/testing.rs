use crate::domain::{TagId, TitleId};
use crate::filter::{LookupError, TagMembership, View};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory tag assignments that count reverse lookups.
#[derive(Debug, Default)]
pub(crate) struct MemoryTags {
    members: RefCell<HashMap<TagId, Vec<TitleId>>>,
    calls: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryTags {
    pub(crate) fn assign(&self, tag: TagId, title: TitleId) {
        self.members.borrow_mut().entry(tag).or_default().push(title);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn fail(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl TagMembership for MemoryTags {
    fn title_ids_for_tag(&self, tag: TagId) -> Result<Vec<TitleId>, LookupError> {
        self.calls.set(self.calls.get() + 1);
        if self.failing.get() {
            return Err(LookupError("database is locked".to_string()));
        }
        Ok(self
            .members
            .borrow()
            .get(&tag)
            .cloned()
            .unwrap_or_default())
    }
}

/// A view that records how often it was refreshed and what it admitted.
pub(crate) struct RecordingView<R> {
    pub(crate) rows: Vec<R>,
    pub(crate) refreshes: usize,
    pub(crate) admitted: usize,
}

impl<R> RecordingView<R> {
    pub(crate) fn shared(rows: Vec<R>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            rows,
            refreshes: 0,
            admitted: 0,
        }))
    }
}

impl<R> View<R> for RecordingView<R> {
    fn refresh(&mut self, admit: &dyn Fn(&R) -> bool) -> usize {
        self.refreshes += 1;
        self.admitted = self.rows.iter().filter(|row| admit(row)).count();
        self.admitted
    }
}
