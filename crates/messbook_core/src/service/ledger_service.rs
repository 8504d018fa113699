//! Mess ledger use-case service.
//!
//! # Responsibility
//! - Own the application state (members, expenses, shopper assignments,
//!   theme) and the store it persists to.
//! - Provide typed editors for each collection.
//! - Produce a freshly computed settlement report on every request.
//!
//! # Invariants
//! - Every mutation persists its own record before returning; other records
//!   are not rewritten.
//! - A mutation whose write fails is rolled back, so memory never runs ahead
//!   of the store.
//! - No-op edits (unknown id) do not touch the store.
//! - Loading never fails; unreadable records start from seed values.

use crate::model::assignment::ShopperAssignments;
use crate::model::entry::{EntryId, EntryList};
use crate::model::expense::{seed_expenses, ExpenseEdit, OtherExpense};
use crate::model::member::{seed_members, Member, MemberEdit};
use crate::model::theme::Theme;
use crate::repo::kv_repo::{KeyValueStore, StoreError};
use crate::repo::record_repo::{load_record, save_record, RecordKey, RecordSource};
use crate::service::settlement::{calculate_settlement, SettlementReport};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Service error for ledger use-cases.
#[derive(Debug)]
pub enum LedgerError {
    /// Persistence-layer failure. The in-memory edit has been rolled back.
    Store(StoreError),
    /// Shopper name does not match any currently named member.
    UnknownShopper(String),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownShopper(name) => write!(f, "no named member called `{name}`"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::UnknownShopper(_) => None,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Provenance of each record after [`MessBook::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub members: RecordSource,
    pub expenses: RecordSource,
    pub calendar: RecordSource,
    pub theme: RecordSource,
}

/// Application state bound to a key-value store.
pub struct MessBook<S: KeyValueStore> {
    store: S,
    members: EntryList<Member>,
    expenses: EntryList<OtherExpense>,
    assignments: ShopperAssignments,
    theme: Theme,
    load_report: LoadReport,
}

impl<S: KeyValueStore> MessBook<S> {
    /// Loads every record from `store`, seeding whatever is missing or
    /// unreadable.
    pub fn open(store: S) -> Self {
        let members = load_record(&store, RecordKey::Members, || EntryList::new(seed_members()));
        let expenses = load_record(&store, RecordKey::OtherExpenses, || {
            EntryList::new(seed_expenses())
        });
        let assignments = load_record(&store, RecordKey::Calendar, ShopperAssignments::new);
        let theme = load_record(&store, RecordKey::Theme, Theme::default);

        let load_report = LoadReport {
            members: members.source,
            expenses: expenses.source,
            calendar: assignments.source,
            theme: theme.source,
        };
        info!(
            "event=ledger_open module=service status=ok members={} expenses={} assignments={}",
            members.value.len(),
            expenses.value.len(),
            assignments.value.len()
        );

        Self {
            store,
            members: members.value,
            expenses: expenses.value,
            assignments: assignments.value,
            theme: theme.value,
            load_report,
        }
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn members(&self) -> &[Member] {
        self.members.as_slice()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn expenses(&self) -> &[OtherExpense] {
        self.expenses.as_slice()
    }

    pub fn expense(&self, id: &str) -> Option<&OtherExpense> {
        self.expenses.get(id)
    }

    pub fn assignments(&self) -> &ShopperAssignments {
        &self.assignments
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Computes the settlement from the current state.
    pub fn report(&self) -> SettlementReport {
        calculate_settlement(self.members.as_slice(), self.expenses.as_slice())
    }

    /// Appends a blank member and returns its id.
    pub fn add_member(&mut self) -> LedgerResult<EntryId> {
        let member = Member::blank();
        let id = member.id.clone();
        let previous = self.members.clone();
        self.members.push(member);
        commit_or_restore(&self.store, RecordKey::Members, &mut self.members, previous)?;
        info!("event=member_add module=service status=ok member_id={id}");
        Ok(id)
    }

    /// Applies one field edit. Returns `false` when `id` is unknown.
    pub fn update_member(&mut self, id: &str, edit: MemberEdit) -> LedgerResult<bool> {
        let field = edit.field();
        let previous = self.members.clone();
        if !self.members.update(id, |member| edit.apply(member)) {
            return Ok(false);
        }
        commit_or_restore(&self.store, RecordKey::Members, &mut self.members, previous)?;
        info!("event=member_update module=service status=ok member_id={id} field={field}");
        Ok(true)
    }

    /// Removes a member. Returns `false` when `id` is unknown.
    ///
    /// Shopper assignments that mention the member's name are kept.
    pub fn remove_member(&mut self, id: &str) -> LedgerResult<bool> {
        let previous = self.members.clone();
        if self.members.remove(id).is_none() {
            return Ok(false);
        }
        commit_or_restore(&self.store, RecordKey::Members, &mut self.members, previous)?;
        info!("event=member_remove module=service status=ok member_id={id}");
        Ok(true)
    }

    /// Appends a blank expense and returns its id.
    pub fn add_expense(&mut self) -> LedgerResult<EntryId> {
        let expense = OtherExpense::blank();
        let id = expense.id.clone();
        let previous = self.expenses.clone();
        self.expenses.push(expense);
        commit_or_restore(&self.store, RecordKey::OtherExpenses, &mut self.expenses, previous)?;
        info!("event=expense_add module=service status=ok expense_id={id}");
        Ok(id)
    }

    pub fn update_expense(&mut self, id: &str, edit: ExpenseEdit) -> LedgerResult<bool> {
        let field = edit.field();
        let previous = self.expenses.clone();
        if !self.expenses.update(id, |expense| edit.apply(expense)) {
            return Ok(false);
        }
        commit_or_restore(&self.store, RecordKey::OtherExpenses, &mut self.expenses, previous)?;
        info!("event=expense_update module=service status=ok expense_id={id} field={field}");
        Ok(true)
    }

    pub fn remove_expense(&mut self, id: &str) -> LedgerResult<bool> {
        let previous = self.expenses.clone();
        if self.expenses.remove(id).is_none() {
            return Ok(false);
        }
        commit_or_restore(&self.store, RecordKey::OtherExpenses, &mut self.expenses, previous)?;
        info!("event=expense_remove module=service status=ok expense_id={id}");
        Ok(true)
    }

    /// Returns the shopper for `date`, or `None` when unassigned.
    pub fn assignment(&self, date: NaiveDate) -> Option<&str> {
        self.assignments.get(date)
    }

    /// Stores `name` for `date` without checking the member list.
    ///
    /// An empty name clears the date.
    pub fn set_assignment(&mut self, date: NaiveDate, name: &str) -> LedgerResult<()> {
        let previous = self.assignments.clone();
        self.assignments.set(date, name);
        commit_or_restore(&self.store, RecordKey::Calendar, &mut self.assignments, previous)?;
        info!(
            "event=assignment_set module=service status=ok date={date} cleared={}",
            name.is_empty()
        );
        Ok(())
    }

    /// Names a member may be assigned under, in member order.
    pub fn assignable_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|member| member.is_named())
            .map(|member| member.name.as_str())
            .collect()
    }

    /// Assigns a shopper the way the calendar view does: only currently named
    /// members are accepted, empty clears.
    pub fn assign_shopper(&mut self, date: NaiveDate, name: &str) -> LedgerResult<()> {
        if !name.is_empty() && !self.assignable_names().contains(&name) {
            return Err(LedgerError::UnknownShopper(name.to_string()));
        }
        self.set_assignment(date, name)
    }

    pub fn set_theme(&mut self, theme: Theme) -> LedgerResult<()> {
        let previous = self.theme;
        self.theme = theme;
        commit_or_restore(&self.store, RecordKey::Theme, &mut self.theme, previous)?;
        info!("event=theme_set module=service status=ok theme={theme}");
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> LedgerResult<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}

/// Writes `current` under `key`, putting `previous` back if the write fails.
fn commit_or_restore<S, T>(
    store: &S,
    key: RecordKey,
    current: &mut T,
    previous: T,
) -> LedgerResult<()>
where
    S: KeyValueStore,
    T: Serialize,
{
    if let Err(err) = save_record(store, key, current) {
        *current = previous;
        warn!(
            "event=record_save module=service status=rolled_back key={}",
            key.as_str()
        );
        return Err(err.into());
    }
    Ok(())
}
