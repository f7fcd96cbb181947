//! Block selection for group operations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::store::LayoutStore;

/// Ordered set of selected block ids.
///
/// Always a subset of the store's ids once [`SelectionSet::retain_present`]
/// has run after a store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionSet {
    pub anchor: Option<BlockId>,
    pub selected: BTreeSet<BlockId>,
}

impl SelectionSet {
    /// Toggle `id`.
    ///
    /// Without `multi` the selection becomes `{id}`, or empty when `id` was the
    /// only member. With `multi` the id is added or removed and the rest kept.
    /// Ids unknown to `store` are ignored. Returns whether anything changed.
    pub fn toggle(&mut self, id: BlockId, multi: bool, store: &LayoutStore) -> bool {
        if !store.contains(id) {
            return false;
        }
        if multi {
            self.shift_toggle(id);
            return true;
        }
        if self.selected.len() == 1 && self.selected.contains(&id) {
            self.clear();
        } else {
            self.selected = BTreeSet::from([id]);
            self.anchor = Some(id);
        }
        true
    }

    /// Additive toggle, keeping the anchor on a surviving member.
    pub fn shift_toggle(&mut self, id: BlockId) {
        if self.selected.contains(&id) {
            let _ = self.selected.remove(&id);
            if self.anchor == Some(id) {
                self.anchor = self.selected.iter().next().copied();
            }
        } else {
            let _ = self.selected.insert(id);
            if self.anchor.is_none() {
                self.anchor = Some(id);
            }
        }
    }

    /// Replace the selection with exactly `id`.
    pub fn select_only(&mut self, id: BlockId) {
        self.selected = BTreeSet::from([id]);
        self.anchor = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drop ids that no longer exist in `store`. Returns how many were pruned.
    pub fn retain_present(&mut self, store: &LayoutStore) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| store.contains(*id));
        if self.anchor.is_some_and(|anchor| !self.selected.contains(&anchor)) {
            self.anchor = self.selected.iter().next().copied();
        }
        before - self.selected.len()
    }

    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn as_sorted_vec(&self) -> Vec<BlockId> {
        self.selected.iter().copied().collect()
    }
}
