//! Core domain logic for messbook, a shared-household expense splitter.
//! This crate is the single source of truth for settlement rules.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::{export_report, ExportError, ExportFormat, RenderedReport, ReportExport};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::assignment::ShopperAssignments;
pub use model::entry::EntryId;
pub use model::expense::{ExpenseEdit, OtherExpense};
pub use model::member::{Member, MemberEdit};
pub use model::numeric::{parse_amount, parse_meals};
pub use model::theme::Theme;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use repo::record_repo::{RecordKey, RecordSource};
pub use service::calendar::{shift_month, MonthGrid, WeekStart};
pub use service::ledger_service::{LedgerError, LedgerResult, LoadReport, MessBook};
pub use service::settlement::{calculate_settlement, MemberBalance, SettlementReport, Standing};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
