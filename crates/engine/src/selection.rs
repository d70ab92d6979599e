use crate::operators::OperatorCache;
use recruit_model::{FilterKey, TagId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Hard cap on simultaneously selected tags.
///
/// Combination enumeration walks a `u32` bitmask over the selection.
pub const MAX_SELECTED_TAGS: usize = 5;

const _: () = assert!(MAX_SELECTED_TAGS < u32::BITS as usize);

/// A selected tag together with the operator field it filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedTag {
    pub key: FilterKey,
    pub id: TagId,
}

impl SelectedTag {
    pub const fn new(key: FilterKey, id: TagId) -> Self {
        Self { key, id }
    }
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// False when the toggle was rejected and nothing changed
    pub applied: bool,
    /// Whether the tag is selected after the toggle
    pub selected: bool,
}

/// Selected tags in insertion order, partitioned by filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectedTag>,
    capacity: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::with_capacity(MAX_SELECTED_TAGS)
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity is clamped to `1..=MAX_SELECTED_TAGS`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(MAX_SELECTED_TAGS),
            capacity: capacity.clamp(1, MAX_SELECTED_TAGS),
        }
    }

    /// Add the tag if absent, remove it if present.
    ///
    /// A tag is identified by id; toggling an id selected under another key
    /// removes it. Adding at capacity is rejected without mutation.
    pub fn toggle(&mut self, key: FilterKey, id: TagId) -> ToggleOutcome {
        if self.remove(id).is_some() {
            return ToggleOutcome {
                applied: true,
                selected: false,
            };
        }
        let applied = self.insert(key, id);
        ToggleOutcome {
            applied,
            selected: applied,
        }
    }

    /// Insert without toggling. Returns false when already present or full.
    pub fn insert(&mut self, key: FilterKey, id: TagId) -> bool {
        if self.contains(id) || self.is_at_capacity() {
            return false;
        }
        self.entries.push(SelectedTag::new(key, id));
        true
    }

    pub fn remove(&mut self, id: TagId) -> Option<SelectedTag> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    #[must_use]
    pub fn contains(&self, id: TagId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_at_capacity(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> Vec<TagId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn entries(&self) -> &[SelectedTag] {
        &self.entries
    }

    /// Ids selected under `key`, in insertion order.
    pub fn by_key(&self, key: FilterKey) -> Vec<TagId> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.id)
            .collect()
    }

    /// Remove everything, returning what was selected.
    pub fn clear(&mut self) -> Vec<SelectedTag> {
        std::mem::take(&mut self.entries)
    }
}

/// Selection plus the fetched-tag index and the operator cache.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selection: Selection,
    fetched: HashSet<SelectedTag>,
    pub operators: OperatorCache,
}

impl SelectionState {
    pub fn new(capacity: usize) -> Self {
        Self {
            selection: Selection::with_capacity(capacity),
            fetched: HashSet::new(),
            operators: OperatorCache::new(),
        }
    }

    /// Toggle a tag; removal also forgets that the tag was fetched.
    pub fn toggle(&mut self, key: FilterKey, id: TagId) -> ToggleOutcome {
        if let Some(removed) = self.selection.remove(id) {
            self.fetched.remove(&removed);
            return ToggleOutcome {
                applied: true,
                selected: false,
            };
        }
        self.selection.toggle(key, id)
    }

    pub fn deselect(&mut self, id: TagId) -> bool {
        match self.selection.remove(id) {
            Some(removed) => {
                self.fetched.remove(&removed);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) -> Vec<SelectedTag> {
        let cleared = self.selection.clear();
        for tag in &cleared {
            self.fetched.remove(tag);
        }
        cleared
    }

    /// Selected tags whose operators have not been fetched yet.
    pub fn missing(&self) -> Vec<SelectedTag> {
        self.selection
            .entries()
            .iter()
            .filter(|e| !self.fetched.contains(e))
            .copied()
            .collect()
    }

    pub fn mark_fetched(&mut self, tags: &[SelectedTag]) {
        for tag in tags {
            if self.selection.contains(tag.id) {
                self.fetched.insert(*tag);
            }
        }
    }

    #[must_use]
    pub fn is_fetched(&self, tag: &SelectedTag) -> bool {
        self.fetched.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recruit_model::{Operator, Rarity};

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::new();
        let added = sel.toggle(FilterKey::TagList, 20);
        assert_eq!(
            added,
            ToggleOutcome {
                applied: true,
                selected: true
            }
        );
        assert!(sel.contains(20));

        let removed = sel.toggle(FilterKey::TagList, 20);
        assert!(removed.applied);
        assert!(!removed.selected);
        assert!(sel.is_empty());
    }

    #[test]
    fn add_at_capacity_is_rejected() {
        let mut sel = Selection::new();
        for id in 1..=5 {
            assert!(sel.toggle(FilterKey::Profession, id).applied);
        }
        assert!(sel.is_at_capacity());

        let before = sel.clone();
        let outcome = sel.toggle(FilterKey::TagList, 20);
        assert!(!outcome.applied);
        assert_eq!(sel, before);

        // removal still works at capacity
        assert!(sel.toggle(FilterKey::Profession, 3).applied);
        assert_eq!(sel.ids(), vec![1, 2, 4, 5]);
    }

    #[test]
    fn entries_are_partitioned_by_key() {
        let mut sel = Selection::new();
        sel.toggle(FilterKey::Position, 9);
        sel.toggle(FilterKey::TagList, 20);
        sel.toggle(FilterKey::TagList, 12);
        assert_eq!(sel.by_key(FilterKey::TagList), vec![20, 12]);
        assert_eq!(sel.by_key(FilterKey::Position), vec![9]);
        assert!(sel.by_key(FilterKey::Rarity).is_empty());
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(Selection::with_capacity(0).capacity(), 1);
        assert_eq!(Selection::with_capacity(99).capacity(), MAX_SELECTED_TAGS);
    }

    #[test]
    fn removing_a_tag_forgets_fetch_but_keeps_operators() {
        let mut state = SelectionState::new(MAX_SELECTED_TAGS);
        state.toggle(FilterKey::TagList, 20);
        state.mark_fetched(&[SelectedTag::new(FilterKey::TagList, 20)]);
        state.operators.merge(vec![Operator::new(
            "a",
            "A",
            Rarity::new(4).unwrap(),
            "SNIPER",
        )
        .with_tags([20u32])]);
        assert!(state.missing().is_empty());

        state.toggle(FilterKey::TagList, 20);
        state.toggle(FilterKey::TagList, 20);
        assert_eq!(state.missing(), vec![SelectedTag::new(FilterKey::TagList, 20)]);
        assert_eq!(state.operators.len(), 1);
    }

    #[test]
    fn mark_fetched_ignores_deselected_tags() {
        let mut state = SelectionState::new(MAX_SELECTED_TAGS);
        let tag = SelectedTag::new(FilterKey::TagList, 7);
        state.mark_fetched(&[tag]);
        assert!(!state.is_fetched(&tag));
    }
}
