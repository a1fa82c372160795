//! Ordered schema migrations for the task database.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - All pending migrations run inside one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_tasks.sql"),
}];

/// Latest schema version this binary can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies every migration newer than the stored schema version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = schema_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current} to_version={latest}");
    Ok(())
}
