//! Study Scan use-case service.
//!
//! # Responsibility
//! - Persist each Study Scan action and hand back the updated document.
//! - Expose dashboard views computed from the stored document.
//!
//! # Invariants
//! - `NoQuestions` and `IndexOutOfRange` leave the stored document untouched.

use crate::derive::study::{progress, study_overview, Progress, StudyOverview};
use crate::model::study::{Profile, StudyDocument};
use crate::mutate::study::{self, AnswerAction, FileMeta, StudyError};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::{DocumentStore, StoreError};
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StudyServiceError {
    /// User-visible domain condition; the action was aborted.
    Study(StudyError),
    Store(StoreError),
}

impl Display for StudyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Study(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Study(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StudyError> for StudyServiceError {
    fn from(value: StudyError) -> Self {
        Self::Study(value)
    }
}

impl From<StoreError> for StudyServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type StudyResult<T> = Result<T, StudyServiceError>;

/// Study Scan facade over a key/value repository.
pub struct StudyService<R: KeyValueRepository> {
    store: DocumentStore<R, StudyDocument>,
}

impl<R: KeyValueRepository> StudyService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            store: DocumentStore::new(repo),
        }
    }

    /// Current document, with defaults filled in.
    pub fn document(&self) -> StudyResult<StudyDocument> {
        Ok(self.store.load()?)
    }

    pub fn add_uploads(&self, files: Vec<FileMeta>) -> StudyResult<StudyDocument> {
        let (doc, ()) = self.apply("add_uploads", |doc| {
            study::add_uploads(doc, files);
            Ok(())
        })?;
        Ok(doc)
    }

    /// Adds a link stamped with the current time; blank urls are ignored.
    pub fn add_link(&self, url: &str) -> StudyResult<StudyDocument> {
        let (doc, added) = self.apply("add_link", |doc| Ok(study::add_link(doc, url, Utc::now())))?;
        if !added {
            debug!("event=add_link module=study status=skipped reason=blank_url");
        }
        Ok(doc)
    }

    pub fn remove_upload(&self, index: usize) -> StudyResult<StudyDocument> {
        let (doc, _) = self.apply("remove_upload", |doc| study::remove_upload(doc, index))?;
        Ok(doc)
    }

    pub fn remove_link(&self, index: usize) -> StudyResult<StudyDocument> {
        let (doc, _) = self.apply("remove_link", |doc| study::remove_link(doc, index))?;
        Ok(doc)
    }

    /// Saves profile and manual notes together, as the input form does.
    pub fn save_inputs(
        &self,
        profile: Profile,
        manual_text: Option<&str>,
    ) -> StudyResult<StudyDocument> {
        let (doc, ()) = self.apply("save_inputs", |doc| {
            study::set_profile(doc, profile);
            if let Some(text) = manual_text {
                study::set_manual_text(doc, text);
            }
            Ok(())
        })?;
        Ok(doc)
    }

    /// Runs the simulated scan. Existing answers are discarded.
    pub fn run_scan(&self) -> StudyResult<StudyDocument> {
        let (doc, ()) = self.apply("run_scan", |doc| {
            study::run_scan(doc);
            Ok(())
        })?;
        info!(
            "event=run_scan module=study status=ok modules={} questions={}",
            doc.modules.len(),
            doc.questions.len()
        );
        Ok(doc)
    }

    /// Builds answers for every question.
    ///
    /// # Errors
    /// - `StudyError::NoQuestions` when no scan has run yet.
    pub fn generate_answers(&self) -> StudyResult<StudyDocument> {
        let (doc, ()) = self.apply("generate_answers", study::generate_all_answers)?;
        Ok(doc)
    }

    pub fn clear_answers(&self) -> StudyResult<StudyDocument> {
        let (doc, ()) = self.apply("clear_answers", |doc| {
            study::clear_answers(doc);
            Ok(())
        })?;
        Ok(doc)
    }

    /// Applies a per-answer refinement; unknown ids leave the document as is.
    pub fn apply_answer_action(&self, action: AnswerAction, id: &str) -> StudyResult<StudyDocument> {
        let (doc, applied) = self.apply("answer_action", |doc| {
            Ok(study::apply_answer_action(doc, action, id))
        })?;
        if !applied {
            warn!(
                "event=answer_action module=study status=skipped action={} reason=not_found",
                action.as_str()
            );
        }
        Ok(doc)
    }

    pub fn progress(&self) -> StudyResult<Progress> {
        Ok(progress(&self.document()?))
    }

    pub fn overview(&self) -> StudyResult<StudyOverview> {
        Ok(study_overview(&self.document()?))
    }

    /// Deletes the stored document. Returns `true` when one existed.
    pub fn clear_all(&self) -> StudyResult<bool> {
        Ok(self.store.clear()?)
    }

    fn apply<T>(
        &self,
        action: &'static str,
        mutate: impl FnOnce(&mut StudyDocument) -> Result<T, StudyError>,
    ) -> StudyResult<(StudyDocument, T)> {
        let mut doc = self.store.load()?;
        match mutate(&mut doc) {
            Ok(value) => {
                self.store.save(&doc)?;
                info!("event={action} module=study status=ok");
                Ok((doc, value))
            }
            Err(err) => {
                warn!("event={action} module=study status=rejected error={err}");
                Err(err.into())
            }
        }
    }
}
