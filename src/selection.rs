//! Selection state.
//!
//! Selection is tracked by record id, so it survives re-sorting, filtering
//! and record replacement. "Select all" is scoped to what the user can see.

use crate::value::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionTracker {
    selected: BTreeSet<RecordId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id, whether or not it is currently visible.
    /// Returns true if the id is selected afterwards.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Header-checkbox behaviour.
    ///
    /// If every visible id is already selected the selection is cleared;
    /// otherwise it becomes exactly the visible ids. Selected ids outside
    /// the visible set are dropped either way. With nothing visible the
    /// selection is cleared.
    pub fn toggle_all(&mut self, visible: &[RecordId]) {
        if self.all_selected(visible) {
            self.selected.clear();
        } else {
            self.selected = visible.iter().cloned().collect();
        }
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// True if every id in `ids` is selected (vacuously true for none).
    pub fn all_selected(&self, ids: &[RecordId]) -> bool {
        ids.iter().all(|id| self.selected.contains(id))
    }

    pub fn any_selected(&self, ids: &[RecordId]) -> bool {
        ids.iter().any(|id| self.selected.contains(id))
    }

    pub fn selected_ids(&self) -> &BTreeSet<RecordId> {
        &self.selected
    }

    /// Keep only ids for which `keep` returns true.
    /// Returns the number of ids removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&RecordId) -> bool,
    {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        before - self.selected.len()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<RecordId> {
        raw.iter().map(|&i| RecordId::Int(i)).collect()
    }

    #[test]
    fn test_toggle() {
        let mut sel = SelectionTracker::new();
        assert!(sel.toggle(RecordId::Int(1)));
        assert!(sel.is_selected(&RecordId::Int(1)));
        assert!(!sel.toggle(RecordId::Int(1)));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_visible_then_clears() {
        let mut sel = SelectionTracker::new();
        let visible = ids(&[2, 5, 7]);

        sel.toggle_all(&visible);
        assert_eq!(sel.len(), 3);
        assert!(sel.all_selected(&visible));

        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_all_with_partial_selection_selects_exactly_visible() {
        let mut sel = SelectionTracker::new();
        sel.toggle(RecordId::Int(2));
        sel.toggle(RecordId::Int(99)); // not visible
        let visible = ids(&[2, 5, 7]);

        sel.toggle_all(&visible);
        let selected: Vec<RecordId> = sel.selected_ids().iter().cloned().collect();
        assert_eq!(selected, visible);
        assert!(!sel.is_selected(&RecordId::Int(99)));
    }

    #[test]
    fn test_toggle_all_with_nothing_visible_clears() {
        let mut sel = SelectionTracker::new();
        sel.toggle(RecordId::Int(3));
        sel.toggle_all(&[]);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_retain() {
        let mut sel = SelectionTracker::new();
        for id in ids(&[1, 2, 3, 4]) {
            sel.toggle(id);
        }
        let removed = sel.retain(|id| id.as_i64().is_some_and(|v| v % 2 == 0));
        assert_eq!(removed, 2);
        assert_eq!(sel.selected_ids().len(), 2);
        assert!(sel.any_selected(&ids(&[1, 2])));
        assert!(!sel.any_selected(&ids(&[1, 3])));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut sel = SelectionTracker::new();
        sel.toggle(RecordId::Int(3));
        sel.toggle(RecordId::from("a"));
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, r#"[3,"a"]"#);
    }
}
