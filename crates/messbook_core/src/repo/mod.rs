//! Persistence layer.
//!
//! # Responsibility
//! - Define the minimal key-value capability records are stored behind.
//! - Encode/decode each record as an independently versioned JSON blob.
//!
//! # Invariants
//! - Each record lives under its own key; writes never span keys.
//! - Loading a record never fails: absent or unreadable data yields the
//!   record's seed value.

pub mod kv_repo;
pub mod record_repo;
