//! Ordered schema steps for the ledger database.
//!
//! Step `n` (1-based) in [`SCHEMA_STEPS`] moves a database from version
//! `n - 1` to `n`; the version reached is stored in `PRAGMA user_version`.
//! Steps are append-only.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[include_str!("0001_init.sql")];

/// Schema version a freshly migrated database ends up at.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Version currently recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`], one transaction per step.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    for (version, sql) in (1u32..).zip(SCHEMA_STEPS).skip(from as usize) {
        apply_step(conn, version, sql).map_err(|source| DbError::Migrate { version, source })?;
    }

    if from < latest {
        info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    }
    Ok(())
}

fn apply_step(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}
