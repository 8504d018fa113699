//! Core use-case services.
//!
//! # Responsibility
//! - Hold application state and route edits through persistence.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod calendar;
pub mod ledger_service;
pub mod settlement;
