//! Study Scan document model.
//!
//! # Invariants
//! - `questions` and `answers` correlate through `id`; orphaned answers are
//!   tolerated.
//! - `profile.marks` may hold any number; template lookup resolves it through
//!   [`Profile::template_marks`].
//! - List order is insertion order; uploads and links have no stable id.

use crate::store::AppDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marks values that have a dedicated answer template.
pub const TEMPLATE_MARKS: [u32; 5] = [2, 5, 8, 10, 15];

/// Template used when `marks` is not one of [`TEMPLATE_MARKS`].
pub const FALLBACK_MARKS: u32 = 10;

/// Writing register for generated answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Simple,
    #[default]
    Exam,
    Detailed,
}

impl Tone {
    /// Label shown in front of every generated answer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Exam => "Exam-style",
            Self::Detailed => "Detailed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Exam => "exam",
            Self::Detailed => "detailed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        [Self::Simple, Self::Exam, Self::Detailed]
            .into_iter()
            .find(|tone| tone.as_str() == value)
    }
}

/// Stored tones outside the known set render as detailed answers.
fn lenient_tone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tone, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(Tone::parse)
        .unwrap_or(Tone::Detailed))
}

/// Stored marks that are not a non-negative integer (`null` from a failed
/// number parse, strings, fractions) resolve to the fallback template.
fn lenient_marks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let marks = match &value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(marks
        .and_then(|marks| u32::try_from(marks).ok())
        .unwrap_or(FALLBACK_MARKS))
}

/// Study preferences that drive scanning and answer formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub class_level: String,
    pub subject: String,
    pub board: String,
    #[serde(deserialize_with = "lenient_marks")]
    pub marks: u32,
    #[serde(deserialize_with = "lenient_tone")]
    pub tone: Tone,
    pub include_examples: bool,
    pub include_diagrams: bool,
    /// `true` grounds answers only in uploads; `false` allows general
    /// knowledge.
    pub strict_mode: bool,
    pub offline_mode: String,
    pub language: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            class_level: "Degree".to_string(),
            subject: String::new(),
            board: String::new(),
            marks: FALLBACK_MARKS,
            tone: Tone::Exam,
            include_examples: true,
            include_diagrams: true,
            strict_mode: true,
            offline_mode: "full".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Profile {
    /// Resolves `marks` to a template key, falling back to the 10-mark
    /// template for unknown values.
    pub fn template_marks(&self) -> u32 {
        if TEMPLATE_MARKS.contains(&self.marks) {
            self.marks
        } else {
            FALLBACK_MARKS
        }
    }
}

/// Metadata recorded for one uploaded file. Content is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub name: String,
    /// File extension, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in bytes.
    pub size: u64,
    /// Estimated page count; see `mutate::study::estimate_pages`.
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// A detected syllabus unit with its topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyModule {
    pub name: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub marks: u32,
    pub module: String,
    pub source: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Same value as the originating question's `id`.
    pub id: String,
    /// Question text captured at generation time.
    pub question: String,
    /// Newline-joined block: intro, bullet lines, grounding note.
    pub content: String,
    pub citation: String,
}

/// Persisted state of the Study Scan app.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyDocument {
    pub profile: Profile,
    pub uploads: Vec<Upload>,
    pub links: Vec<Link>,
    pub manual_text: String,
    pub modules: Vec<StudyModule>,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

impl StudyDocument {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn answer(&self, id: &str) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id == id)
    }
}

impl AppDocument for StudyDocument {
    const STORAGE_KEY: &'static str = "studyscan_data";
}

#[cfg(test)]
mod tests {
    use super::{Profile, StudyDocument, Tone};

    #[test]
    fn unknown_marks_resolve_to_ten_mark_template() {
        let mut profile = Profile::default();
        for marks in [2, 5, 8, 10, 15] {
            profile.marks = marks;
            assert_eq!(profile.template_marks(), marks);
        }
        profile.marks = 7;
        assert_eq!(profile.template_marks(), 10);
    }

    #[test]
    fn serializes_with_browser_field_names() {
        let value = serde_json::to_value(StudyDocument::default()).unwrap();
        let profile = value.get("profile").unwrap();
        assert_eq!(profile["classLevel"], "Degree");
        assert_eq!(profile["includeExamples"], true);
        assert_eq!(profile["offlineMode"], "full");
        assert!(value.get("manualText").is_some());
    }

    #[test]
    fn partial_profile_fills_missing_fields() {
        let profile: Profile = serde_json::from_str(r#"{"subject":"Physics","tone":"simple"}"#)
            .expect("partial profile should deserialize");
        assert_eq!(profile.subject, "Physics");
        assert_eq!(profile.tone, Tone::Simple);
        assert_eq!(profile.marks, 10);
        assert!(profile.strict_mode);
    }

    #[test]
    fn bad_marks_and_tone_keep_the_rest_of_the_profile() {
        let profile: Profile = serde_json::from_str(
            r#"{"subject":"Chemistry","board":"CBSE","marks":null,"tone":"casual","strictMode":false}"#,
        )
        .expect("profile with bad marks and tone should deserialize");
        assert_eq!(profile.subject, "Chemistry");
        assert_eq!(profile.board, "CBSE");
        assert!(!profile.strict_mode);
        assert_eq!(profile.marks, 10);
        assert_eq!(profile.tone, Tone::Detailed);

        let profile: Profile = serde_json::from_str(r#"{"marks":"5","tone":7}"#).unwrap();
        assert_eq!(profile.marks, 5);
        assert_eq!(profile.tone, Tone::Detailed);

        let profile: Profile = serde_json::from_str(r#"{"marks":-3}"#).unwrap();
        assert_eq!(profile.marks, 10);
    }

    #[test]
    fn tone_labels() {
        assert_eq!(Tone::Simple.label(), "Simple");
        assert_eq!(Tone::Exam.label(), "Exam-style");
        assert_eq!(Tone::Detailed.label(), "Detailed");
        assert_eq!(Tone::parse(" DETAILED "), Some(Tone::Detailed));
        assert_eq!(Tone::parse("casual"), None);
    }
}
