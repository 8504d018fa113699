use chrono::NaiveDate;
use messbook_core::db::DbError;
use messbook_core::{
    ExpenseEdit, KeyValueStore, LedgerError, MemberEdit, MemoryKeyValueStore, MessBook,
    RecordKey, StoreError, StoreResult, Theme,
};
use std::cell::Cell;

fn fresh_book(store: &MemoryKeyValueStore) -> MessBook<&MemoryKeyValueStore> {
    MessBook::open(store)
}

#[test]
fn add_member_appends_blank_entry_and_persists() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);

    let id = book.add_member().unwrap();
    let added = book.members().last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.name, "");
    assert_eq!(added.spending, 0.0);
    assert_eq!(added.meals, 0);

    let raw = store.load(RecordKey::Members.as_str()).unwrap().unwrap();
    assert!(raw.contains(&id));
    assert_eq!(store.load(RecordKey::OtherExpenses.as_str()).unwrap(), None);
}

#[test]
fn add_then_remove_member_restores_totals() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);
    let before = book.report();

    let id = book.add_member().unwrap();
    book.update_member(&id, MemberEdit::Spending(999.0)).unwrap();
    book.update_member(&id, MemberEdit::Meals(12)).unwrap();
    assert_ne!(book.report(), before);

    assert!(book.remove_member(&id).unwrap());
    assert_eq!(book.report(), before);
}

#[test]
fn update_edits_only_the_target_field_in_place() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);

    assert!(book
        .update_member("2", MemberEdit::Name("Bobby".to_string()))
        .unwrap());

    let names: Vec<&str> = book.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bobby", "Charlie"]);
    let bob = book.member("2").unwrap();
    assert_eq!(bob.spending, 1500.0);
    assert_eq!(bob.meals, 60);
}

#[test]
fn unknown_ids_are_no_ops_and_skip_persistence() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);

    assert!(!book.update_member("nope", MemberEdit::Meals(3)).unwrap());
    assert!(!book.remove_member("nope").unwrap());
    assert!(!book
        .update_expense("nope", ExpenseEdit::Amount(3.0))
        .unwrap());
    assert!(!book.remove_expense("nope").unwrap());

    assert_eq!(store.load(RecordKey::Members.as_str()).unwrap(), None);
    assert_eq!(store.load(RecordKey::OtherExpenses.as_str()).unwrap(), None);
    assert_eq!(book.members().len(), 3);
}

#[test]
fn removal_keeps_survivor_order() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);

    assert!(book.remove_member("2").unwrap());
    let ids: Vec<&str> = book.members().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn expense_editor_round_trips_through_store() {
    let store = MemoryKeyValueStore::new();
    {
        let mut book = fresh_book(&store);
        let id = book.add_expense().unwrap();
        book.update_expense(&id, ExpenseEdit::Name("Internet".to_string()))
            .unwrap();
        book.update_expense(&id, ExpenseEdit::Amount(800.0)).unwrap();
        assert!(book.remove_expense("gas").unwrap());
    }

    let reopened = fresh_book(&store);
    let names: Vec<&str> = reopened
        .expenses()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Electricity", "Internet"]);
    assert_eq!(reopened.report().total_other_expenses, 2000.0);
}

#[test]
fn theme_toggle_persists_independently() {
    let store = MemoryKeyValueStore::new();
    let mut book = fresh_book(&store);

    assert_eq!(book.theme(), messbook_core::Theme::Light);
    assert_eq!(book.toggle_theme().unwrap(), messbook_core::Theme::Dark);
    assert_eq!(store.load(RecordKey::Members.as_str()).unwrap(), None);

    let reopened = fresh_book(&store);
    assert_eq!(reopened.theme(), messbook_core::Theme::Dark);
}

/// Memory store whose writes can be switched off to simulate a full disk.
#[derive(Default)]
struct SwitchableStore {
    inner: MemoryKeyValueStore,
    writes_fail: Cell<bool>,
}

impl KeyValueStore for SwitchableStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.writes_fail.get() {
            return Err(StoreError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        self.inner.save(key, value)
    }
}

#[test]
fn failed_writes_leave_state_as_it_was() {
    let store = SwitchableStore::default();
    let mut book = MessBook::open(&store);
    let members_before = book.members().to_vec();
    let expenses_before = book.expenses().to_vec();
    let report_before = book.report();
    let day = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
    store.writes_fail.set(true);

    assert!(matches!(book.add_member(), Err(LedgerError::Store(_))));
    assert!(book
        .update_member("1", MemberEdit::Spending(9_999.0))
        .is_err());
    assert!(book.remove_member("2").is_err());
    assert!(book.add_expense().is_err());
    assert!(book
        .update_expense("gas", ExpenseEdit::Name("Water".to_string()))
        .is_err());
    assert!(book.remove_expense("electricity").is_err());
    assert!(book.assign_shopper(day, "Charlie").is_err());
    assert!(book.toggle_theme().is_err());

    assert_eq!(book.members(), members_before.as_slice());
    assert_eq!(book.expenses(), expenses_before.as_slice());
    assert_eq!(book.report(), report_before);
    assert_eq!(book.assignment(day), None);
    assert_eq!(book.theme(), Theme::Light);

    store.writes_fail.set(false);
    assert!(book.remove_member("2").unwrap());
    assert_eq!(book.members().len(), 2);
    let reopened = MessBook::open(&store.inner);
    assert_eq!(reopened.members().len(), 2);
    assert_eq!(reopened.expenses().len(), 2);
}
