use serde::{Deserialize, Serialize};

use super::errors::QuizError;

/// Number of answer options every quiz question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A generated video summary, cached per video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryArtifact {
    pub title: String,
    pub main_summary: String,
    pub language: String,
    pub key_points: Vec<KeyPoint>,
}

impl SummaryArtifact {
    /// Plain-text rendering used by "copy summary".
    pub fn to_clipboard_text(&self) -> String {
        let points: Vec<String> = self
            .key_points
            .iter()
            .map(|p| format!("- {} ({})", p.point, p.timestamp))
            .collect();
        format!(
            "{}\n\n{}\n\nKey Points:\n{}",
            self.title,
            self.main_summary,
            points.join("\n")
        )
    }
}

/// One key point of a summary with its position in the video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPoint {
    pub point: String,
    pub timestamp: String,
}

/// A generated multiple-choice quiz, cached per video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizArtifact {
    pub questions: Vec<QuizQuestion>,
    pub language: String,
}

impl QuizArtifact {
    /// Checks that the quiz is non-empty and every correct answer is in range.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        match self
            .questions
            .iter()
            .position(|q| q.correct_answer >= OPTIONS_PER_QUESTION)
        {
            Some(index) => Err(QuizError::InvalidQuestion(index)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub correct_answer: usize,
}

/// Document formats the export action accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// What the document service hands back after an export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub format: ExportFormat,
    pub download_url: String,
}

/// Requested number of quiz questions: 5 to 20 in steps of 5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct QuizCount(u32);

impl QuizCount {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 20;
    pub const STEP: u32 = 5;

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn can_increment(&self) -> bool {
        self.0 < Self::MAX
    }

    pub fn can_decrement(&self) -> bool {
        self.0 > Self::MIN
    }

    /// Next step up, saturating at the maximum.
    pub fn increment(self) -> Self {
        Self((self.0 + Self::STEP).min(Self::MAX))
    }

    /// Next step down, saturating at the minimum.
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP).max(Self::MIN))
    }
}

impl Default for QuizCount {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u32> for QuizCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) && value % Self::STEP == 0 {
            Ok(Self(value))
        } else {
            Err(format!(
                "quiz count must be a multiple of {} between {} and {}, got {}",
                Self::STEP,
                Self::MIN,
                Self::MAX,
                value
            ))
        }
    }
}

impl From<QuizCount> for u32 {
    fn from(count: QuizCount) -> Self {
        count.0
    }
}
