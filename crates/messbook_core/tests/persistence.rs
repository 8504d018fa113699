use messbook_core::db::open_db;
use messbook_core::repo::record_repo::encode_record;
use messbook_core::{
    KeyValueStore, MemberEdit, MemoryKeyValueStore, MessBook, RecordKey, RecordSource,
    SqliteKeyValueStore,
};
use chrono::NaiveDate;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

#[test]
fn empty_store_starts_from_seed_values() {
    let store = MemoryKeyValueStore::new();
    let book = MessBook::open(&store);

    let load = book.load_report();
    assert_eq!(load.members, RecordSource::SeedMissing);
    assert_eq!(load.expenses, RecordSource::SeedMissing);
    assert_eq!(load.calendar, RecordSource::SeedMissing);
    assert_eq!(book.members().len(), 3);
    assert_eq!(book.expenses().len(), 2);
    assert!(book.assignments().is_empty());
}

#[test]
fn malformed_record_falls_back_alone() {
    let calendar = r#"{"schema_version":1,"data":{"2026-10-05":"Bob"}}"#;
    let expenses = r#"{"schema_version":1,"data":[{"id":"rent","name":"Rent","amount":900}]}"#;
    let store = MemoryKeyValueStore::with_entries([
        (RecordKey::Members.as_str(), "[{\"id\":\"1\", \"name\":"),
        (RecordKey::OtherExpenses.as_str(), expenses),
        (RecordKey::Calendar.as_str(), calendar),
    ]);

    let book = MessBook::open(&store);
    let load = book.load_report();

    assert_eq!(load.members, RecordSource::SeedMalformed);
    assert_eq!(book.members().len(), 3);
    assert_eq!(book.members()[0].name, "Alice");

    assert_eq!(load.expenses, RecordSource::Stored);
    assert_eq!(book.expenses().len(), 1);
    assert_eq!(book.expenses()[0].id, "rent");

    assert_eq!(load.calendar, RecordSource::Stored);
    assert_eq!(book.assignment(date(5)), Some("Bob"));
}

#[test]
fn legacy_bare_payloads_are_accepted() {
    let members = r#"[{"id":"1700000000000","name":"Dana","spending":320.5,"meals":12}]"#;
    let store = MemoryKeyValueStore::with_entries([
        (RecordKey::Members.as_str(), members),
        (RecordKey::Calendar.as_str(), r#"{"2026-10-01":"Dana"}"#),
    ]);

    let book = MessBook::open(&store);

    assert_eq!(book.load_report().members, RecordSource::Legacy);
    assert_eq!(book.members()[0].spending, 320.5);
    assert_eq!(book.assignment(date(1)), Some("Dana"));
}

#[test]
fn legacy_negative_counts_clamp_without_losing_other_rows() {
    let members = r#"[{"id":"1700000000000","name":"Dana","spending":-5,"meals":-3},{"id":"1700000000001","name":"Eve","spending":300,"meals":10}]"#;
    let store = MemoryKeyValueStore::with_entries([(RecordKey::Members.as_str(), members)]);

    let book = MessBook::open(&store);

    assert_eq!(book.load_report().members, RecordSource::Legacy);
    assert_eq!(book.members().len(), 2);
    let dana = &book.members()[0];
    assert_eq!(dana.name, "Dana");
    assert_eq!(dana.spending, 0.0);
    assert_eq!(dana.meals, 0);
    let eve = &book.members()[1];
    assert_eq!(eve.name, "Eve");
    assert_eq!(eve.spending, 300.0);
    assert_eq!(eve.meals, 10);
}

#[test]
fn newer_envelope_version_is_treated_as_unreadable() {
    let store = MemoryKeyValueStore::with_entries([(
        RecordKey::OtherExpenses.as_str(),
        r#"{"schema_version":7,"data":[]}"#,
    )]);

    let book = MessBook::open(&store);

    assert_eq!(book.load_report().expenses, RecordSource::SeedMalformed);
    assert_eq!(book.expenses().len(), 2);
}

#[test]
fn writes_only_touch_the_changed_record() {
    let original_members = encode_record(&Vec::<u8>::new()).unwrap();
    let store = MemoryKeyValueStore::with_entries([(
        RecordKey::Members.as_str(),
        original_members.as_str(),
    )]);
    let mut book = MessBook::open(&store);

    book.set_assignment(date(9), "Charlie").unwrap();

    assert_eq!(
        store.load(RecordKey::Members.as_str()).unwrap(),
        Some(original_members)
    );
    assert_eq!(store.load(RecordKey::OtherExpenses.as_str()).unwrap(), None);
    assert!(store.load(RecordKey::Calendar.as_str()).unwrap().is_some());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messbook.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut book = MessBook::open(SqliteKeyValueStore::new(&conn));
        book.update_member("1", MemberEdit::Meals(90)).unwrap();
        book.set_assignment(date(19), "Alice").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let book = MessBook::open(SqliteKeyValueStore::new(&conn));

    assert_eq!(book.load_report().members, RecordSource::Stored);
    assert_eq!(book.member("1").unwrap().meals, 90);
    assert_eq!(book.report().total_meals, 230);
    assert_eq!(book.assignment(date(19)), Some("Alice"));
    assert_eq!(book.load_report().expenses, RecordSource::SeedMissing);
}
