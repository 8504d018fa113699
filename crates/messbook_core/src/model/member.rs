//! Mess member record.

use crate::model::entry::{new_entry_id, EntryId, Identified};
use crate::model::numeric::{deserialize_amount, deserialize_meals, sanitize_amount};
use serde::{Deserialize, Serialize};

/// One person sharing the mess: what they spent on groceries and how many
/// meals they ate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: EntryId,
    pub name: String,
    /// Grocery spending for the month. Never negative.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub spending: f64,
    #[serde(default, deserialize_with = "deserialize_meals")]
    pub meals: u32,
}

impl Member {
    /// Creates an unnamed member with zero spending and meals.
    pub fn blank() -> Self {
        Self::with_id(new_entry_id(), "", 0.0, 0)
    }

    pub fn with_id(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        spending: f64,
        meals: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            spending: sanitize_amount(spending),
            meals,
        }
    }

    /// Whether the member can be offered as a shopper.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Identified for Member {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Single-field edit applied to a member in place.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberEdit {
    Name(String),
    Spending(f64),
    Meals(u32),
}

impl MemberEdit {
    pub fn apply(self, member: &mut Member) {
        match self {
            Self::Name(name) => member.name = name,
            Self::Spending(spending) => member.spending = sanitize_amount(spending),
            Self::Meals(meals) => member.meals = meals,
        }
    }

    /// Field label used in diagnostics.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Spending(_) => "spending",
            Self::Meals(_) => "meals",
        }
    }
}

/// Members present on first run.
pub fn seed_members() -> Vec<Member> {
    vec![
        Member::with_id("1", "Alice", 2500.0, 75),
        Member::with_id("2", "Bob", 1500.0, 60),
        Member::with_id("3", "Charlie", 2000.0, 80),
    ]
}
