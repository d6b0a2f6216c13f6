//! Namespaced document load/save/clear over a key/value repository.

use super::{AppDocument, StoreResult};
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// How a loaded document was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No entry (or a JSON `null`) was stored; the document is all defaults.
    Missing,
    /// Every stored top-level field was accepted.
    Loaded,
    /// Stored fields with the wrong shape were dropped in favor of defaults.
    Recovered { dropped_fields: Vec<String> },
    /// Stored value was unreadable or not a JSON object; the document is all
    /// defaults.
    Malformed,
}

/// Loaded document plus the outcome of decoding it.
#[derive(Debug, Clone)]
pub struct LoadReport<D> {
    pub document: D,
    pub outcome: LoadOutcome,
}

/// Store for one document type under its fixed key.
pub struct DocumentStore<R, D> {
    repo: R,
    _document: PhantomData<fn() -> D>,
}

impl<R: KeyValueRepository, D: AppDocument> DocumentStore<R, D> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _document: PhantomData,
        }
    }

    /// Loads the document, merging stored fields over defaults.
    ///
    /// # Errors
    /// - Only storage transport failures; stored content never fails a load.
    pub fn load(&self) -> StoreResult<D> {
        Ok(self.load_report()?.document)
    }

    /// Same as [`DocumentStore::load`], also reporting how the stored value
    /// was decoded.
    pub fn load_report(&self) -> StoreResult<LoadReport<D>> {
        let key = D::STORAGE_KEY;
        let raw = match self.repo.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load module=store status=missing key={key}");
                return Ok(LoadReport {
                    document: D::default(),
                    outcome: LoadOutcome::Missing,
                });
            }
            Err(RepoError::UnreadableValue { reason, .. }) => {
                warn!(
                    "event=store_load module=store status=malformed key={key} reason=\"{reason}\" fallback=defaults"
                );
                return Ok(LoadReport {
                    document: D::default(),
                    outcome: LoadOutcome::Malformed,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let (document, outcome) = merge_with_defaults::<D>(&raw);
        match &outcome {
            LoadOutcome::Malformed => warn!(
                "event=store_load module=store status=malformed key={key} bytes={} fallback=defaults",
                raw.len()
            ),
            LoadOutcome::Recovered { dropped_fields } => warn!(
                "event=store_load module=store status=recovered key={key} dropped_fields={}",
                dropped_fields.join(",")
            ),
            LoadOutcome::Loaded | LoadOutcome::Missing => debug!(
                "event=store_load module=store status=ok key={key} bytes={}",
                raw.len()
            ),
        }

        Ok(LoadReport { document, outcome })
    }

    /// Serializes and overwrites the namespace entry.
    pub fn save(&self, document: &D) -> StoreResult<()> {
        let key = D::STORAGE_KEY;
        let raw = serde_json::to_string(document)?;
        self.repo.set_item(key, &raw)?;
        debug!(
            "event=store_save module=store status=ok key={key} bytes={}",
            raw.len()
        );
        Ok(())
    }

    /// Deletes the namespace entry. Returns `true` when an entry existed.
    pub fn clear(&self) -> StoreResult<bool> {
        let key = D::STORAGE_KEY;
        let removed = self.repo.remove_item(key)?;
        info!("event=store_clear module=store status=ok key={key} removed={removed}");
        Ok(removed)
    }
}

/// Decodes stored text into a complete document.
///
/// Stored top-level fields replace the default's fields one-for-one (shallow
/// merge). A field whose stored value does not fit the typed schema is
/// dropped and its default kept; the remaining fields still apply. Nested
/// objects are not merged field-by-field beyond what their own serde defaults
/// provide.
pub fn merge_with_defaults<D: AppDocument>(raw: &str) -> (D, LoadOutcome) {
    let stored = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(stored)) => stored,
        Ok(Value::Null) => return (D::default(), LoadOutcome::Missing),
        Ok(_) | Err(_) => return (D::default(), LoadOutcome::Malformed),
    };

    let Ok(Value::Object(defaults)) = serde_json::to_value(D::default()) else {
        return (D::default(), LoadOutcome::Malformed);
    };

    let mut merged = defaults.clone();
    for (field, value) in &stored {
        if defaults.contains_key(field) {
            merged.insert(field.clone(), value.clone());
        }
    }
    if let Ok(document) = serde_json::from_value::<D>(Value::Object(merged)) {
        return (document, LoadOutcome::Loaded);
    }

    let mut accepted: Map<String, Value> = defaults.clone();
    let mut dropped_fields = Vec::new();
    for (field, value) in stored {
        if !defaults.contains_key(&field) {
            continue;
        }
        let mut candidate = accepted.clone();
        candidate.insert(field.clone(), value);
        if serde_json::from_value::<D>(Value::Object(candidate.clone())).is_ok() {
            accepted = candidate;
        } else {
            dropped_fields.push(field);
        }
    }

    match serde_json::from_value::<D>(Value::Object(accepted)) {
        Ok(document) => (document, LoadOutcome::Recovered { dropped_fields }),
        Err(_) => (D::default(), LoadOutcome::Malformed),
    }
}
