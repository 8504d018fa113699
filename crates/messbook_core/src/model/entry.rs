//! Insertion-ordered collection of identified entries.
//!
//! # Invariants
//! - Order is insertion order; edits happen in place, removal keeps the
//!   relative order of survivors.
//! - Update and remove of an absent id are no-ops.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier shared by members and expenses.
pub type EntryId = String;

/// Generates a fresh, collision-free entry id.
pub fn new_entry_id() -> EntryId {
    Uuid::new_v4().to_string()
}

/// Record that carries a stable id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Ordered list keyed by entry id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T> {
    items: Vec<T>,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> EntryList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Appends an entry at the end of the list.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Applies `edit` to the entry with `id`.
    ///
    /// Returns `false` and leaves the list untouched when `id` is absent.
    pub fn update(&mut self, id: &str, edit: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        }
    }

    /// Removes the entry with `id`, returning it when present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a EntryList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{new_entry_id, EntryList, Identified};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, value: u32) -> Row {
        Row {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn update_edits_in_place_and_ignores_missing_ids() {
        let mut list = EntryList::new(vec![row("a", 1), row("b", 2)]);
        assert!(list.update("b", |r| r.value = 20));
        assert!(!list.update("zzz", |r| r.value = 99));
        let values: Vec<u32> = list.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1, 20]);
    }

    #[test]
    fn remove_keeps_survivor_order() {
        let mut list = EntryList::new(vec![row("a", 1), row("b", 2), row("c", 3)]);
        assert_eq!(list.remove("b"), Some(row("b", 2)));
        assert_eq!(list.remove("b"), None);
        let ids: Vec<&str> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = new_entry_id();
        let second = new_entry_id();
        assert_ne!(first, second);
        assert!(!first.is_empty());
    }
}
