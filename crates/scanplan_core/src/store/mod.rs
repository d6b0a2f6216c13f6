//! Document state store.
//!
//! # Responsibility
//! - Own one JSON document per app under a fixed namespace key.
//! - Merge persisted top-level fields over typed defaults on load.
//!
//! # Invariants
//! - `load` never fails because of stored content; malformed data degrades to
//!   defaults and is only logged.
//! - `clear` removes the namespace entry; the next `load` yields defaults.

mod document_store;

pub use document_store::{merge_with_defaults, DocumentStore, LoadOutcome, LoadReport};

use crate::repo::kv_repo::RepoError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A document type that lives under one fixed local-storage key.
///
/// `Default` is the schema's default document; fields added in later schema
/// versions pick their defaults up from here.
pub trait AppDocument: Serialize + DeserializeOwned + Default {
    const STORAGE_KEY: &'static str;
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport-level store failure. Malformed stored content is not an error;
/// see [`LoadOutcome::Malformed`].
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
