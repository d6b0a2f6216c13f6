//! SQLite file that backs local storage.
//!
//! The database holds a single `local_storage` table; its layout is owned by
//! [`migrations`] and versioned through `PRAGMA user_version`. Callers only
//! receive connections whose schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying the storage database.
#[derive(Debug)]
pub enum DbError {
    /// The connection itself could not be established.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Migration `version` failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build with a schema we do not know.
    SchemaTooNew { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "cannot open {mode} storage database: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "storage migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "local storage schema v{found} is newer than this build (v{supported})"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
