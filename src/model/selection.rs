//! Set of selected (favourited) ids with O(1) membership

use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Reconcile with the backing store's view of the set.
    pub fn replace(&mut self, ids: HashSet<String>) {
        self.ids = ids;
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl FromIterator<String> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
