//! Namespaced key/value storage and its SQLite implementation.
//!
//! # Responsibility
//! - Provide get/set/remove over opaque text values keyed by a namespace.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Keys are non-empty after trimming.
//! - `set_item` is a single-statement overwrite; the previous value is never
//!   partially visible.
//! - A stored value that is not UTF-8 text surfaces as
//!   [`RepoError::UnreadableValue`], never as a SQLite type error.

use crate::db::DbError;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for key/value persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
    /// The entry exists but its value is not readable as UTF-8 text.
    UnreadableValue { key: String, reason: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
            Self::UnreadableValue { key, reason } => {
                write!(f, "stored value for `{key}` is unreadable: {reason}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::UnreadableValue { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local-storage style contract: one text value per key.
pub trait KeyValueRepository {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns `true` when an entry existed and was removed.
    fn remove_item(&self, key: &str) -> RepoResult<bool>;
    /// All stored keys in ascending order.
    fn keys(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed key/value repository over the `local_storage` table.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let stored = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [key],
                |row| Ok(decode_text(row.get_ref(0)?)),
            )
            .optional()?;
        match stored {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(reason)) => Err(RepoError::UnreadableValue {
                key: key.to_string(),
                reason,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

fn decode_text(value: ValueRef<'_>) -> Result<String, String> {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| format!("invalid utf-8: {err}")),
        other => Err(format!("expected text, found {}", other.data_type())),
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
