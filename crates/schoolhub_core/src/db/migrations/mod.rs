//! Schema steps for the `kv_entries` table.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - Pending steps apply in one transaction; `PRAGMA user_version` is only
//!   bumped once every pending step succeeded.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, Transaction};

/// Ordered `(version, sql)` schema steps.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Returns the newest schema version this binary can read and write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the schema up to [`latest_version`].
///
/// Returns how many steps were applied; `0` when the store was current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let stored = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let pending: Vec<&(u32, &str)> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > stored)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        run_step(&tx, *version, sql)?;
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    Ok(pending.len() as u32)
}

fn run_step(tx: &Transaction<'_>, version: u32, sql: &str) -> DbResult<()> {
    tx.execute_batch(sql)
        .map_err(|source| DbError::Migration { version, source })
}
