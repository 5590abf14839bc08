//! Schema versioning for the `SQLite` record backend.
//!
//! The base tables come from [`SCHEMA_STATEMENTS`]. Later changes are listed in
//! [`MIGRATIONS`] and applied in order, each in its own transaction, with the
//! reached version recorded in the `metadata` table.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// A numbered schema change.
#[derive(Debug)]
pub struct Migration {
    /// Version the database is at after this migration.
    pub version: i32,
    /// What the migration does.
    pub description: &'static str,
    /// Statements to run.
    pub statements: &'static [&'static str],
}

/// Every migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "base records and metadata tables",
        statements: &[],
    },
];

/// The schema version a fully migrated database reports.
#[must_use]
pub fn current_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Create the base schema and apply pending migrations.
///
/// # Errors
///
/// Returns an error if a statement fails or the stored version is unreadable.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let from = schema_version(conn)?;
    if from > current_version() {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {from} is newer than supported version {}",
                current_version()
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        apply(conn, migration)?;
    }
    Ok(())
}

fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction()?;
    for statement in migration.statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;
    info!(
        version = migration.version,
        "Applied migration: {}", migration.description
    );
    Ok(())
}

/// Read the stored schema version; 0 for a fresh database.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is not a number.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(v) => v.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {v}"),
        }),
    }
}
