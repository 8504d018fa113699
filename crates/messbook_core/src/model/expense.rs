//! Shared monthly bills that are not groceries.

use crate::model::entry::{new_entry_id, EntryId, Identified};
use crate::model::numeric::{deserialize_amount, sanitize_amount};
use serde::{Deserialize, Serialize};

/// A shared bill (gas, electricity, rent) split across all meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherExpense {
    pub id: EntryId,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
}

impl OtherExpense {
    /// Creates an unnamed expense with a zero amount.
    pub fn blank() -> Self {
        Self::with_id(new_entry_id(), "", 0.0)
    }

    pub fn with_id(id: impl Into<EntryId>, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount: sanitize_amount(amount),
        }
    }
}

impl Identified for OtherExpense {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Single-field edit applied to an expense in place.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseEdit {
    Name(String),
    Amount(f64),
}

impl ExpenseEdit {
    pub fn apply(self, expense: &mut OtherExpense) {
        match self {
            Self::Name(name) => expense.name = name,
            Self::Amount(amount) => expense.amount = sanitize_amount(amount),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Amount(_) => "amount",
        }
    }
}

/// Expenses present on first run.
pub fn seed_expenses() -> Vec<OtherExpense> {
    vec![
        OtherExpense::with_id("gas", "Gas Bill", 500.0),
        OtherExpense::with_id("electricity", "Electricity", 1200.0),
    ]
}
