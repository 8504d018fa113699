//! Domain model for the mess ledger.
//!
//! # Responsibility
//! - Define the persisted records: members, other expenses, shopper
//!   assignments and the theme preference.
//! - Provide typed edit commands and lenient numeric input coercion.
//!
//! # Invariants
//! - Every member and expense is identified by an id that is never reused.
//! - `spending`, `amount` and `meals` are never negative and never NaN.

pub mod assignment;
pub mod entry;
pub mod expense;
pub mod member;
pub mod numeric;
pub mod theme;
