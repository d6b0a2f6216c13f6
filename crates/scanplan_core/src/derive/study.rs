//! Study Scan dashboard views.

use crate::model::study::StudyDocument;
use serde::Serialize;

/// Shown as the OCR preview when the user has not typed manual notes.
pub const SAMPLE_OCR_TEXT: &str = "Sample OCR text: The system collects requirements, applies the core concept, and evaluates outcomes with references.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// Rounded percentage; `0` when there are no questions.
    pub percent: u32,
}

/// Answered-vs-total counts for the progress bar.
pub fn progress(doc: &StudyDocument) -> Progress {
    let answered = doc.answers.len();
    let total = doc.questions.len();
    let percent = if total == 0 {
        0
    } else {
        (answered as f64 * 100.0 / total as f64).round() as u32
    };
    Progress {
        answered,
        total,
        percent,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub name: String,
    /// Upper-cased file type badge.
    pub label: String,
    pub pages: u32,
    pub size_kb: u64,
}

pub fn upload_summaries(doc: &StudyDocument) -> Vec<UploadSummary> {
    doc.uploads
        .iter()
        .map(|upload| UploadSummary {
            name: upload.name.clone(),
            label: upload.kind.to_uppercase(),
            pages: upload.pages,
            size_kb: (upload.size as f64 / 1024.0).round() as u64,
        })
        .collect()
}

/// Manual notes, or the canned sample sentence when none were entered.
pub fn ocr_sample(doc: &StudyDocument) -> &str {
    if doc.manual_text.is_empty() {
        SAMPLE_OCR_TEXT
    } else {
        doc.manual_text.as_str()
    }
}

/// Label for the offline-mode stat card.
pub fn offline_label(doc: &StudyDocument) -> &str {
    if doc.profile.offline_mode == "full" {
        "Full"
    } else {
        doc.profile.offline_mode.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyOverview {
    pub uploads: usize,
    pub links: usize,
    pub modules: usize,
    pub questions: usize,
    pub answers: usize,
    pub offline: String,
    pub progress: Progress,
}

pub fn study_overview(doc: &StudyDocument) -> StudyOverview {
    StudyOverview {
        uploads: doc.uploads.len(),
        links: doc.links.len(),
        modules: doc.modules.len(),
        questions: doc.questions.len(),
        answers: doc.answers.len(),
        offline: offline_label(doc).to_string(),
        progress: progress(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::study::{Answer, Question, Upload};

    fn question(index: usize) -> Question {
        Question {
            id: format!("q-{index}"),
            text: "text".to_string(),
            marks: 10,
            module: "Unit".to_string(),
            source: "Uploaded Content".to_string(),
            page: 2,
        }
    }

    fn answer(index: usize) -> Answer {
        Answer {
            id: format!("q-{index}"),
            question: "text".to_string(),
            content: "content".to_string(),
            citation: "Uploaded Content · Page 2".to_string(),
        }
    }

    #[test]
    fn progress_rounds_half_up() {
        let mut doc = StudyDocument::default();
        doc.questions = (1..=8).map(question).collect();
        doc.answers = (1..=5).map(answer).collect();
        assert_eq!(
            progress(&doc),
            Progress {
                answered: 5,
                total: 8,
                percent: 63
            }
        );
    }

    #[test]
    fn progress_is_zero_without_questions() {
        let mut doc = StudyDocument::default();
        doc.answers = vec![answer(1)];
        assert_eq!(progress(&doc).percent, 0);
    }

    #[test]
    fn summaries_and_labels() {
        let mut doc = StudyDocument::default();
        doc.uploads.push(Upload {
            name: "notes.pdf".to_string(),
            kind: "pdf".to_string(),
            size: 2_048_000,
            pages: 17,
        });
        let summaries = upload_summaries(&doc);
        assert_eq!(summaries[0].label, "PDF");
        assert_eq!(summaries[0].size_kb, 2000);

        assert_eq!(ocr_sample(&doc), SAMPLE_OCR_TEXT);
        doc.manual_text = "Ohm's law".to_string();
        assert_eq!(ocr_sample(&doc), "Ohm's law");

        assert_eq!(offline_label(&doc), "Full");
        doc.profile.offline_mode = "answers-only".to_string();
        assert_eq!(study_overview(&doc).offline, "answers-only");
    }
}
