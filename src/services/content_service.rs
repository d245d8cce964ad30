//! External content service contract and its canned implementation.
//!
//! The coordinator is the only caller. The canned service answers every
//! request after the configured delay with fixed content; it performs no
//! summarization or document rendering.

use async_trait::async_trait;

use crate::types::artifacts::{
    ExportFormat, ExportReceipt, KeyPoint, QuizArtifact, QuizCount, QuizQuestion, SummaryArtifact,
    OPTIONS_PER_QUESTION,
};
use crate::types::config::{ExternalLinks, ResponseDelays};
use crate::types::errors::ServiceError;
use crate::types::settings::Language;
use crate::types::video::VideoId;

/// One request/response contract per coordinator action.
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn summarize(&self, video: &VideoId, language: Language) -> Result<SummaryArtifact, ServiceError>;
    async fn generate_quiz(&self, video: &VideoId, count: QuizCount) -> Result<QuizArtifact, ServiceError>;
    async fn export_notes(&self, video: &VideoId, format: ExportFormat) -> Result<ExportReceipt, ServiceError>;
    async fn generate_comments(&self, video: &VideoId, refresh: bool) -> Result<Vec<String>, ServiceError>;
}

const SUMMARY_TITLE: &str = "Understanding YouTube API Integration";
const SUMMARY_TEXT: &str = "This video explains how to integrate YouTube APIs into web applications. \
The presenter covers authentication, fetching video data, and processing transcripts. \
The content is beginner-friendly and includes practical examples of code implementation.";

const KEY_POINTS: [(&str, &str); 5] = [
    ("YouTube API Setup", "0:30"),
    ("Authentication Methods", "5:45"),
    ("Fetching Video Metadata", "10:20"),
    ("Working with Transcripts", "15:10"),
    ("Error Handling", "20:35"),
];

const FIXED_QUESTIONS: [(&str, [&str; OPTIONS_PER_QUESTION], usize); 3] = [
    (
        "What is the primary purpose of the YouTube Data API?",
        [
            "To monetize videos automatically",
            "To allow programmatic access to YouTube features",
            "To create YouTube accounts",
            "To download videos directly",
        ],
        1,
    ),
    (
        "Which authentication method is recommended for production applications?",
        ["API Key only", "OAuth 2.0", "Basic Authentication", "No authentication"],
        1,
    ),
    (
        "What is a YouTube API quota?",
        [
            "A limit on how many videos you can upload",
            "A limit on how many API requests you can make daily",
            "A payment requirement",
            "A video view counter",
        ],
        1,
    ),
];

const COMMENTS: [&str; 3] = [
    "Great explanation of the concepts! This really helped me understand.",
    "Thanks for sharing this valuable information. Looking forward to more videos!",
    "This is exactly what I was looking for. Well explained!",
];

const MORE_COMMENTS: [&str; 3] = [
    "The section on authentication cleared up a lot of confusion for me. Thank you!",
    "Really practical examples. I'm going to try this in my own project this week.",
    "Could you do a follow-up video on handling API quotas in production?",
];

/// Content service answering with fixed content after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct CannedContentService {
    delays: ResponseDelays,
    links: ExternalLinks,
}

impl CannedContentService {
    pub fn new(delays: ResponseDelays, links: ExternalLinks) -> Self {
        Self { delays, links }
    }

    pub fn summary(language: Language) -> SummaryArtifact {
        SummaryArtifact {
            title: SUMMARY_TITLE.to_string(),
            main_summary: SUMMARY_TEXT.to_string(),
            language: language.display_name().to_string(),
            key_points: KEY_POINTS
                .iter()
                .map(|(point, timestamp)| KeyPoint {
                    point: point.to_string(),
                    timestamp: timestamp.to_string(),
                })
                .collect(),
        }
    }

    /// Three fixed questions padded with sample questions up to `count`.
    ///
    /// The padding's answer key cycles through the options so the same
    /// count always yields the same quiz.
    pub fn quiz(count: QuizCount) -> QuizArtifact {
        let total = count.get() as usize;
        let mut questions: Vec<QuizQuestion> = FIXED_QUESTIONS
            .iter()
            .take(total)
            .map(|(question, options, correct)| QuizQuestion {
                question: question.to_string(),
                options: (*options).map(str::to_string),
                correct_answer: *correct,
            })
            .collect();

        for i in questions.len()..total {
            questions.push(QuizQuestion {
                question: format!("Sample Question {} about YouTube API integration?", i + 1),
                options: ["Option A", "Option B", "Option C", "Option D"].map(str::to_string),
                correct_answer: i % OPTIONS_PER_QUESTION,
            });
        }

        QuizArtifact {
            questions,
            language: Language::default().display_name().to_string(),
        }
    }

    pub fn comments(refresh: bool) -> Vec<String> {
        let set = if refresh { MORE_COMMENTS } else { COMMENTS };
        set.iter().map(|c| c.to_string()).collect()
    }
}

#[async_trait]
impl ContentService for CannedContentService {
    async fn summarize(&self, _video: &VideoId, language: Language) -> Result<SummaryArtifact, ServiceError> {
        tokio::time::sleep(self.delays.summary()).await;
        Ok(Self::summary(language))
    }

    async fn generate_quiz(&self, _video: &VideoId, count: QuizCount) -> Result<QuizArtifact, ServiceError> {
        tokio::time::sleep(self.delays.quiz()).await;
        Ok(Self::quiz(count))
    }

    async fn export_notes(&self, _video: &VideoId, format: ExportFormat) -> Result<ExportReceipt, ServiceError> {
        tokio::time::sleep(self.delays.export()).await;
        Ok(ExportReceipt {
            format,
            download_url: self.links.download_url.clone(),
        })
    }

    async fn generate_comments(&self, _video: &VideoId, refresh: bool) -> Result<Vec<String>, ServiceError> {
        tokio::time::sleep(self.delays.comments()).await;
        Ok(Self::comments(refresh))
    }
}
