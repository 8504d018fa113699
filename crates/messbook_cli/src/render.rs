//! Plain-text views for the terminal.

use messbook_core::service::settlement::format_money;
use messbook_core::{Member, MonthGrid, OtherExpense, ShopperAssignments};

const CELL_WIDTH: usize = 10;

pub fn print_members(members: &[Member]) {
    if members.is_empty() {
        println!("No members yet. Add one with `messbook member add`.");
        return;
    }
    let name_width = column_width(members.iter().map(|m| display_name(&m.name)), "Name");
    println!(
        "{:<36}  {:<name_width$}  {:>12}  {:>6}",
        "Id", "Name", "Spending", "Meals"
    );
    for member in members {
        println!(
            "{:<36}  {:<name_width$}  {:>12}  {:>6}",
            member.id,
            display_name(&member.name),
            format_money(member.spending),
            member.meals
        );
    }
}

pub fn print_expenses(expenses: &[OtherExpense]) {
    if expenses.is_empty() {
        println!("No other expenses. Add one with `messbook expense add`.");
        return;
    }
    let name_width = column_width(expenses.iter().map(|e| display_name(&e.name)), "Name");
    println!("{:<36}  {:<name_width$}  {:>12}", "Id", "Name", "Amount");
    for expense in expenses {
        println!(
            "{:<36}  {:<name_width$}  {:>12}",
            expense.id,
            display_name(&expense.name),
            format_money(expense.amount)
        );
    }
}

/// Month grid with the shopper of each in-month day underneath its number.
pub fn print_calendar(grid: &MonthGrid, assignments: &ShopperAssignments) {
    println!("{:^width$}", grid.title(), width = CELL_WIDTH * 7);
    let header: String = grid
        .week_start
        .labels()
        .iter()
        .map(|label| format!("{label:<CELL_WIDTH$}"))
        .collect();
    println!("{}", header.trim_end());

    for week in grid.weeks() {
        let numbers: String = week
            .iter()
            .map(|day| {
                let number = day.date.format("%-d").to_string();
                let cell = match (day.is_today, day.in_month) {
                    (true, _) => format!("[{number}]"),
                    (false, true) => number,
                    (false, false) => format!("({number})"),
                };
                format!("{cell:<CELL_WIDTH$}")
            })
            .collect();
        println!("{}", numbers.trim_end());

        let shoppers: String = week
            .iter()
            .map(|day| {
                let name = if day.in_month {
                    assignments.get(day.date).unwrap_or("-")
                } else {
                    ""
                };
                format!("{:<CELL_WIDTH$}", truncate(name, CELL_WIDTH - 1))
            })
            .collect();
        println!("{}", shoppers.trim_end());
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, title: &str) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(0)
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
