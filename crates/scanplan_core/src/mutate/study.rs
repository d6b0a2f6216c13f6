//! Study Scan mutators and the canned scan/answer generators.
//!
//! Scanning and answering are deterministic template expansion. No text is
//! extracted from uploads; outputs depend only on the profile and the upload
//! list.

use crate::model::study::{Answer, Link, Profile, Question, StudyDocument, StudyModule, Upload};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Bytes per estimated page used by [`estimate_pages`].
pub const BYTES_PER_PAGE: u64 = 120_000;

/// Source recorded on questions when nothing has been uploaded.
pub const DEFAULT_SOURCE: &str = "Uploaded Content";

const MODULE_NAMES: [&str; 4] = [
    "Unit 1 · Fundamentals",
    "Unit 2 · Core Concepts",
    "Unit 3 · Applications",
    "Unit 4 · Case Studies",
];

const TOPICS_PER_MODULE: usize = 3;

const QUESTION_TEMPLATES: [&str; 8] = [
    "Define the key concept and list any two advantages.",
    "Explain the process with a neat diagram.",
    "Differentiate between primary and secondary approaches.",
    "Solve the numerical and justify each step.",
    "Describe the architecture and its applications.",
    "List the important formulas with conditions of use.",
    "Write short notes on recent advancements.",
    "Outline the algorithm and analyze complexity.",
];

const BLOCKS_2_MARKS: &[&str] = &["Definition", "2 key points"];
const BLOCKS_5_MARKS: &[&str] = &["Definition", "Explanation", "Example"];
const BLOCKS_8_MARKS: &[&str] = &["Intro", "Key steps", "Example", "Summary"];
const BLOCKS_10_MARKS: &[&str] = &[
    "Intro",
    "Structured headings",
    "Diagram",
    "Example",
    "Conclusion",
];
const BLOCKS_15_MARKS: &[&str] = &[
    "Intro",
    "Detailed headings",
    "Derivation/Steps",
    "Applications",
    "Conclusion",
];

const EXAMPLE_POINT: &str = "• Example aligned to the uploaded notes.";
const DIAGRAM_POINT: &str = "• Diagram description with labeled steps.";
const STRICT_NOTE: &str = "Strict mode: Answer grounded only in uploads.";
const HYBRID_NOTE: &str = "Hybrid mode: Includes general knowledge where helpful.";

const MORE_POINT: &str = "• Additional point from the same module.";
const SHORT_SUMMARY_POINT: &str = "• Summary kept short.";
const DIAGRAM_FLOW_POINT: &str = "• Diagram: Labeled flow from input → processing → output.";
const SHORTER_KEEP_LINES: usize = 3;

/// Failure conditions callers are expected to avoid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    /// Answer generation requested before any scan produced questions.
    NoQuestions,
    /// Removal by an index that no longer exists.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for StudyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoQuestions => write!(f, "No questions detected yet. Run a scan first."),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for {len} item(s)")
            }
        }
    }
}

impl Error for StudyError {}

/// Metadata of a file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Per-answer refinement requested from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerAction {
    Regenerate,
    More,
    Shorter,
    Diagram,
}

impl AnswerAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::More => "more",
            Self::Shorter => "shorter",
            Self::Diagram => "diagram",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnswerActionError(String);

impl Display for ParseAnswerActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown answer action `{}`; expected regenerate|more|shorter|diagram",
            self.0
        )
    }
}

impl Error for ParseAnswerActionError {}

impl FromStr for AnswerAction {
    type Err = ParseAnswerActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regenerate" => Ok(Self::Regenerate),
            "more" => Ok(Self::More),
            "shorter" => Ok(Self::Shorter),
            "diagram" => Ok(Self::Diagram),
            _ => Err(ParseAnswerActionError(value.to_string())),
        }
    }
}

/// Page estimate from byte size: `max(1, round(size / 120000))`.
///
/// A stand-in heuristic, not real pagination.
pub fn estimate_pages(size: u64) -> u32 {
    let pages = (size as f64 / BYTES_PER_PAGE as f64).round();
    (pages as u32).max(1)
}

/// Text after the last `.` in `name`, or `"file"` when there is none.
pub fn file_extension_or_default(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| !extension.is_empty())
        .unwrap_or("file")
        .to_string()
}

pub fn add_upload(doc: &mut StudyDocument, file: FileMeta) {
    let kind = file_extension_or_default(&file.name);
    let pages = estimate_pages(file.size);
    doc.uploads.push(Upload {
        name: file.name,
        kind,
        size: file.size,
        pages,
    });
}

pub fn add_uploads(doc: &mut StudyDocument, files: impl IntoIterator<Item = FileMeta>) {
    for file in files {
        add_upload(doc, file);
    }
}

/// Appends a link. Returns `false` without touching the document when the
/// trimmed url is empty.
pub fn add_link(doc: &mut StudyDocument, url: &str, added_at: DateTime<Utc>) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    doc.links.push(Link {
        url: url.to_string(),
        added_at,
    });
    true
}

pub fn remove_upload(doc: &mut StudyDocument, index: usize) -> Result<Upload, StudyError> {
    remove_at(&mut doc.uploads, index)
}

pub fn remove_link(doc: &mut StudyDocument, index: usize) -> Result<Link, StudyError> {
    remove_at(&mut doc.links, index)
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, StudyError> {
    if index >= items.len() {
        return Err(StudyError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

/// Replaces the profile; free-text fields are trimmed.
pub fn set_profile(doc: &mut StudyDocument, mut profile: Profile) {
    profile.subject = profile.subject.trim().to_string();
    profile.board = profile.board.trim().to_string();
    doc.profile = profile;
}

pub fn set_manual_text(doc: &mut StudyDocument, text: &str) {
    doc.manual_text = text.trim().to_string();
}

/// Simulated scan: fixed modules and question templates stamped with the
/// current profile and first upload. Clears existing answers.
pub fn run_scan(doc: &mut StudyDocument) {
    doc.modules = MODULE_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| StudyModule {
            name: (*name).to_string(),
            topics: (1..=TOPICS_PER_MODULE)
                .map(|topic| format!("Topic {}.{topic}", index + 1))
                .collect(),
        })
        .collect();

    let source = doc
        .uploads
        .first()
        .map_or_else(|| DEFAULT_SOURCE.to_string(), |upload| upload.name.clone());

    doc.questions = QUESTION_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, text)| Question {
            id: format!("q-{}", index + 1),
            text: (*text).to_string(),
            marks: doc.profile.marks,
            module: doc.modules[index % doc.modules.len()].name.clone(),
            source: source.clone(),
            page: index as u32 + 2,
        })
        .collect();

    doc.answers.clear();
}

/// Bullet headings for a marks value; unknown marks use the 10-mark set.
pub fn answer_blocks(marks: u32) -> &'static [&'static str] {
    match marks {
        2 => BLOCKS_2_MARKS,
        5 => BLOCKS_5_MARKS,
        8 => BLOCKS_8_MARKS,
        15 => BLOCKS_15_MARKS,
        _ => BLOCKS_10_MARKS,
    }
}

/// Expands the answer template for one question.
///
/// Content lines, in order: `({tone}) {question}`, one bullet per template
/// block, optional example and diagram bullets, then the grounding note.
pub fn build_answer(question: &Question, profile: &Profile) -> Answer {
    let mut lines = Vec::with_capacity(8);
    lines.push(format!("({}) {}", profile.tone.label(), question.text));
    lines.extend(
        answer_blocks(profile.template_marks())
            .iter()
            .map(|block| format!("• {block} from uploaded content.")),
    );
    if profile.include_examples {
        lines.push(EXAMPLE_POINT.to_string());
    }
    if profile.include_diagrams {
        lines.push(DIAGRAM_POINT.to_string());
    }
    lines.push(
        if profile.strict_mode {
            STRICT_NOTE
        } else {
            HYBRID_NOTE
        }
        .to_string(),
    );

    Answer {
        id: question.id.clone(),
        question: question.text.clone(),
        content: lines.join("\n"),
        citation: format!("{} · Page {}", question.source, question.page),
    }
}

/// Replaces all answers with freshly built ones, one per question.
pub fn generate_all_answers(doc: &mut StudyDocument) -> Result<(), StudyError> {
    if doc.questions.is_empty() {
        return Err(StudyError::NoQuestions);
    }
    doc.answers = doc
        .questions
        .iter()
        .map(|question| build_answer(question, &doc.profile))
        .collect();
    Ok(())
}

pub fn clear_answers(doc: &mut StudyDocument) {
    doc.answers.clear();
}

/// Applies `action` to the answer with `id`.
///
/// Returns `false` when the answer (or, for `Regenerate`, its question) is
/// missing; the document is then unchanged.
pub fn apply_answer_action(doc: &mut StudyDocument, action: AnswerAction, id: &str) -> bool {
    let Some(position) = doc.answers.iter().position(|answer| answer.id == id) else {
        return false;
    };

    match action {
        AnswerAction::Regenerate => {
            let Some(question) = doc.question(id) else {
                return false;
            };
            let refreshed = build_answer(question, &doc.profile);
            doc.answers[position].content = refreshed.content;
        }
        AnswerAction::More => push_line(&mut doc.answers[position].content, MORE_POINT),
        AnswerAction::Shorter => {
            let content = &mut doc.answers[position].content;
            let kept = content
                .split('\n')
                .take(SHORTER_KEEP_LINES)
                .collect::<Vec<_>>()
                .join("\n");
            *content = kept;
            push_line(content, SHORT_SUMMARY_POINT);
        }
        AnswerAction::Diagram => push_line(&mut doc.answers[position].content, DIAGRAM_FLOW_POINT),
    }
    true
}

fn push_line(content: &mut String, line: &str) {
    content.push('\n');
    content.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: "q-1".to_string(),
            text: "Define entropy.".to_string(),
            marks: 10,
            module: "Unit 1 · Fundamentals".to_string(),
            source: "thermo.pdf".to_string(),
            page: 2,
        }
    }

    #[test]
    fn page_estimate_has_floor_of_one_and_rounds() {
        assert_eq!(estimate_pages(0), 1);
        assert_eq!(estimate_pages(59_999), 1);
        assert_eq!(estimate_pages(180_000), 2);
        assert_eq!(estimate_pages(1_200_000), 10);
    }

    #[test]
    fn extension_defaults_to_file() {
        assert_eq!(file_extension_or_default("notes.pdf"), "pdf");
        assert_eq!(file_extension_or_default("archive.tar.gz"), "gz");
        assert_eq!(file_extension_or_default("trailing."), "file");
        assert_eq!(file_extension_or_default("README"), "file");
    }

    #[test]
    fn ten_marks_with_examples_only_has_six_bullets() {
        let profile = Profile {
            marks: 10,
            include_examples: true,
            include_diagrams: false,
            ..Profile::default()
        };
        let answer = build_answer(&sample_question(), &profile);
        let lines: Vec<&str> = answer.content.split('\n').collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "(Exam-style) Define entropy.");
        assert_eq!(lines.iter().filter(|line| line.starts_with('•')).count(), 6);
        assert_eq!(lines[7], STRICT_NOTE);
        assert_eq!(answer.citation, "thermo.pdf · Page 2");
    }

    #[test]
    fn bullet_count_follows_template_and_flags() {
        for marks in [2, 5, 8, 10, 15, 3] {
            for (examples, diagrams) in [(false, false), (true, false), (false, true), (true, true)]
            {
                let profile = Profile {
                    marks,
                    include_examples: examples,
                    include_diagrams: diagrams,
                    strict_mode: false,
                    ..Profile::default()
                };
                let answer = build_answer(&sample_question(), &profile);
                let bullets = answer
                    .content
                    .lines()
                    .filter(|line| line.starts_with('•'))
                    .count();
                let expected = answer_blocks(profile.template_marks()).len()
                    + usize::from(examples)
                    + usize::from(diagrams);
                assert_eq!(bullets, expected, "marks={marks}");
                assert!(answer.content.ends_with(HYBRID_NOTE));
            }
        }
    }

    #[test]
    fn answer_action_parses_case_insensitively() {
        assert_eq!("Shorter".parse::<AnswerAction>(), Ok(AnswerAction::Shorter));
        assert!("summarize".parse::<AnswerAction>().is_err());
    }
}
