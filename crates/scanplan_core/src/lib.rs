//! Core engine for the Study Scan and Finance Planner apps.
//! Owns the persisted documents, their mutators and derived views.

pub mod config;
pub mod db;
pub mod derive;
pub mod logging;
pub mod model;
pub mod mutate;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{default_log_level, ConfigError, CoreConfig};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::finance::{ExpenseRow, FinanceDocument};
pub use model::study::{
    Answer, Link, Profile, Question, StudyDocument, StudyModule, Tone, Upload,
};
pub use mutate::finance::FinanceError;
pub use mutate::study::{AnswerAction, FileMeta, StudyError};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use service::finance_service::{FinanceService, FinanceServiceError};
pub use service::study_service::{StudyService, StudyServiceError};
pub use store::{AppDocument, DocumentStore, LoadOutcome, LoadReport, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
