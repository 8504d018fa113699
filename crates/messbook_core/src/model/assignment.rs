//! Shopper-of-the-day assignments.
//!
//! # Invariants
//! - Keys are calendar dates serialized as `YYYY-MM-DD`.
//! - Values are member *names*, never empty. Assigning an empty name deletes
//!   the key instead of storing it.
//! - The store does not validate names against the member list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse date -> shopper name mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopperAssignments {
    entries: BTreeMap<NaiveDate, String>,
}

impl ShopperAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the shopper for `date`, or clears it when `name` is empty.
    pub fn set(&mut self, date: NaiveDate, name: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            self.entries.remove(&date);
        } else {
            self.entries.insert(date, name);
        }
    }

    /// Returns the assigned shopper, or `None` when the date is unassigned.
    pub fn get(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    /// Assignments in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.entries.iter().map(|(date, name)| (*date, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
