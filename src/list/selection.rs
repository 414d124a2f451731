//! Checked rows for bulk actions. Ids that vanish on reload are pruned
//! by the controller.

use std::collections::BTreeSet;

use crate::models::RecordId;

/// Row ids checked for a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn select(&mut self, id: RecordId, checked: bool) {
        if checked {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Check or uncheck exactly the given (visible) ids.
    pub fn select_all(&mut self, visible: impl IntoIterator<Item = RecordId>, checked: bool) {
        for id in visible {
            self.select(id, checked);
        }
    }

    /// Drop ids that are no longer present.
    pub fn retain(&mut self, mut present: impl FnMut(RecordId) -> bool) {
        self.ids.retain(|id| present(*id));
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &BTreeSet<RecordId> {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
