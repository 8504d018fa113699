//! Monthly settlement calculation.
//!
//! # Responsibility
//! - Reduce members and shared expenses into totals, cost per meal and
//!   per-member balances.
//!
//! # Invariants
//! - Pure and deterministic; recomputed on every read, never cached.
//! - `total_monthly_expenses == total_grocery_spending + total_other_expenses`.
//! - `cost_per_meal == 0.0` when nobody ate (no division by zero).
//! - Meal costs split `total_monthly_expenses` in proportion to meals, so the
//!   balances sum to `total_grocery_spending - total_monthly_expenses`.

use crate::model::entry::EntryId;
use crate::model::expense::OtherExpense;
use crate::model::member::Member;
use serde::Serialize;

/// Currency prefix used when rendering amounts.
pub const CURRENCY_SYMBOL: &str = "৳";

/// One row of the settlement table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBalance {
    pub id: EntryId,
    pub name: String,
    pub spending: f64,
    pub meals: u32,
    /// Share of the monthly expenses attributed to this member's meals.
    pub meal_cost: f64,
    /// `spending - meal_cost`. Positive: the group owes the member.
    pub balance: f64,
}

impl MemberBalance {
    pub fn standing(&self) -> Standing {
        Standing::of(self.balance)
    }
}

/// Which way money flows for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Receives,
    Owes,
}

impl Standing {
    /// Zero counts as receiving, matching how a settled member is shown.
    pub fn of(balance: f64) -> Self {
        if balance >= 0.0 {
            Self::Receives
        } else {
            Self::Owes
        }
    }
}

/// Derived month totals. Holds no state of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReport {
    pub total_grocery_spending: f64,
    pub total_other_expenses: f64,
    pub total_monthly_expenses: f64,
    pub total_meals: u64,
    pub cost_per_meal: f64,
    pub member_balances: Vec<MemberBalance>,
}

/// Computes the settlement report in a single pass over the inputs.
pub fn calculate_settlement(members: &[Member], expenses: &[OtherExpense]) -> SettlementReport {
    let total_grocery_spending: f64 = members.iter().map(|member| member.spending).sum();
    let total_other_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let total_monthly_expenses = total_grocery_spending + total_other_expenses;
    let total_meals: u64 = members.iter().map(|member| u64::from(member.meals)).sum();

    let cost_per_meal = if total_meals > 0 {
        total_monthly_expenses / total_meals as f64
    } else {
        0.0
    };

    let member_balances = members
        .iter()
        .map(|member| {
            let meal_cost = cost_per_meal * f64::from(member.meals);
            MemberBalance {
                id: member.id.clone(),
                name: member.name.clone(),
                spending: member.spending,
                meals: member.meals,
                meal_cost,
                balance: member.spending - meal_cost,
            }
        })
        .collect();

    SettlementReport {
        total_grocery_spending,
        total_other_expenses,
        total_monthly_expenses,
        total_meals,
        cost_per_meal,
        member_balances,
    }
}

/// Renders an amount with the currency prefix and two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

/// Renders a balance as `Receives ৳x` or `Owes ৳x`.
pub fn format_balance(balance: f64) -> String {
    match Standing::of(balance) {
        Standing::Receives => format!("Receives {}", format_money(balance)),
        Standing::Owes => format!("Owes {}", format_money(balance.abs())),
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate_settlement, format_balance, format_money, Standing};
    use crate::model::expense::OtherExpense;
    use crate::model::member::Member;

    #[test]
    fn empty_inputs_produce_zero_report() {
        let report = calculate_settlement(&[], &[]);
        assert_eq!(report.total_monthly_expenses, 0.0);
        assert_eq!(report.total_meals, 0);
        assert_eq!(report.cost_per_meal, 0.0);
        assert!(report.member_balances.is_empty());
    }

    #[test]
    fn zero_meals_guards_cost_per_meal() {
        let members = vec![Member::with_id("a", "Ana", 300.0, 0)];
        let expenses = vec![OtherExpense::with_id("w", "Water", 100.0)];
        let report = calculate_settlement(&members, &expenses);

        assert_eq!(report.cost_per_meal, 0.0);
        assert!(report.cost_per_meal.is_finite());
        assert_eq!(report.member_balances[0].meal_cost, 0.0);
        assert_eq!(report.member_balances[0].balance, 300.0);
    }

    #[test]
    fn balances_keep_member_order() {
        let members = vec![
            Member::with_id("z", "Zed", 10.0, 1),
            Member::with_id("a", "Amy", 30.0, 3),
        ];
        let report = calculate_settlement(&members, &[]);
        let ids: Vec<&str> = report.member_balances.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(report.cost_per_meal, 10.0);
        assert_eq!(report.member_balances[0].balance, 0.0);
        assert_eq!(report.member_balances[0].standing(), Standing::Receives);
    }

    #[test]
    fn formatting_rounds_to_two_decimals() {
        assert_eq!(format_money(35.813953), "৳35.81");
        assert_eq!(format_balance(12.0), "Receives ৳12.00");
        assert_eq!(format_balance(-186.046), "Owes ৳186.05");
    }
}
