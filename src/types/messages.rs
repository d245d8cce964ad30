//! Message envelopes exchanged between the popup, the coordinator and page agents.
//!
//! Requests are tagged by `action`; responses are either
//! `{"success": true, ...data}` or `{"error": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::artifacts::{ExportFormat, ExportReceipt, QuizArtifact, QuizCount, SummaryArtifact};
use super::errors::{DeliveryError, EnvelopeError};
use super::settings::Language;
use super::video::{VideoId, VideoInfo};

/// Actions the coordinator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GenerateSummary,
    GenerateQuiz,
    ExportNotes,
    GenerateComments,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::GenerateSummary,
        Action::GenerateQuiz,
        Action::ExportNotes,
        Action::GenerateComments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GenerateSummary => "generateSummary",
            Action::GenerateQuiz => "generateQuiz",
            Action::ExportNotes => "exportNotes",
            Action::GenerateComments => "generateComments",
        }
    }

    /// User-facing message sent back when the handler fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::GenerateSummary => "Failed to generate summary",
            Action::GenerateQuiz => "Failed to generate quiz",
            Action::ExportNotes => "Failed to export notes",
            Action::GenerateComments => "Failed to generate comments",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == tag)
    }
}

/// A request routed to the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CoordinatorRequest {
    #[serde(rename_all = "camelCase")]
    GenerateSummary {
        video_id: VideoId,
        #[serde(default)]
        language: Language,
    },
    #[serde(rename_all = "camelCase")]
    GenerateQuiz {
        video_id: VideoId,
        #[serde(default)]
        count: QuizCount,
    },
    #[serde(rename_all = "camelCase")]
    ExportNotes {
        video_id: VideoId,
        format: ExportFormat,
    },
    #[serde(rename_all = "camelCase")]
    GenerateComments {
        video_id: VideoId,
        #[serde(default)]
        refresh: bool,
    },
}

impl CoordinatorRequest {
    pub fn action(&self) -> Action {
        match self {
            CoordinatorRequest::GenerateSummary { .. } => Action::GenerateSummary,
            CoordinatorRequest::GenerateQuiz { .. } => Action::GenerateQuiz,
            CoordinatorRequest::ExportNotes { .. } => Action::ExportNotes,
            CoordinatorRequest::GenerateComments { .. } => Action::GenerateComments,
        }
    }

    pub fn video_id(&self) -> &VideoId {
        match self {
            CoordinatorRequest::GenerateSummary { video_id, .. }
            | CoordinatorRequest::GenerateQuiz { video_id, .. }
            | CoordinatorRequest::ExportNotes { video_id, .. }
            | CoordinatorRequest::GenerateComments { video_id, .. } => video_id,
        }
    }

    /// Decodes a request envelope, telling unknown actions apart from bad fields.
    pub fn from_envelope(message: &Value) -> Result<Self, EnvelopeError> {
        let tag = message
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EnvelopeError::Malformed("missing action".to_string()))?;
        if Action::from_tag(tag).is_none() {
            return Err(EnvelopeError::UnknownAction(tag.to_string()));
        }
        serde_json::from_value(message.clone()).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    pub fn to_envelope(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| json!({ "error": e.to_string() }))
    }
}

/// Success payload of a coordinator reply, keyed by kind on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ResponseData {
    Summary(SummaryArtifact),
    Quiz(QuizArtifact),
    Export(ExportReceipt),
    Comments(Vec<String>),
}

/// The single reply every coordinator request receives.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorResponse {
    Success(ResponseData),
    Error(String),
}

impl CoordinatorResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, CoordinatorResponse::Success(_))
    }

    pub fn to_envelope(&self) -> Value {
        match self {
            CoordinatorResponse::Success(data) => match serde_json::to_value(data) {
                Ok(Value::Object(mut map)) => {
                    map.insert("success".to_string(), Value::Bool(true));
                    Value::Object(map)
                }
                Ok(other) => json!({ "success": true, "data": other }),
                Err(e) => json!({ "error": e.to_string() }),
            },
            CoordinatorResponse::Error(message) => json!({ "error": message }),
        }
    }

    pub fn from_envelope(envelope: &Value) -> Result<Self, EnvelopeError> {
        if let Some(message) = envelope.get("error").and_then(|v| v.as_str()) {
            return Ok(CoordinatorResponse::Error(message.to_string()));
        }
        let Value::Object(map) = envelope else {
            return Err(EnvelopeError::Malformed("response is not an object".to_string()));
        };
        if map.get("success").and_then(|v| v.as_bool()) != Some(true) {
            return Err(EnvelopeError::Malformed("missing success flag".to_string()));
        }
        let data: Map<String, Value> = map
            .iter()
            .filter(|(k, _)| k.as_str() != "success")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(Value::Object(data))
            .map(CoordinatorResponse::Success)
            .map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }
}

/// A command sent to a page agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageMessage {
    GetVideoInfo,
    ToggleFocusMode { value: bool },
    ShowCommentDialog { comments: Vec<String> },
    PageReloaded,
}

impl PageMessage {
    pub fn action_name(&self) -> &'static str {
        match self {
            PageMessage::GetVideoInfo => "getVideoInfo",
            PageMessage::ToggleFocusMode { .. } => "toggleFocusMode",
            PageMessage::ShowCommentDialog { .. } => "showCommentDialog",
            PageMessage::PageReloaded => "pageReloaded",
        }
    }

    pub fn from_envelope(message: &Value) -> Result<Self, EnvelopeError> {
        let tag = message
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EnvelopeError::Malformed("missing action".to_string()))?;
        const KNOWN: [&str; 4] = ["getVideoInfo", "toggleFocusMode", "showCommentDialog", "pageReloaded"];
        if !KNOWN.contains(&tag) {
            return Err(EnvelopeError::UnknownAction(tag.to_string()));
        }
        serde_json::from_value(message.clone()).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }
}

/// A page agent's reply.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
    VideoInfo(VideoInfo),
    Success,
    Error(String),
}

impl PageResponse {
    pub fn to_envelope(&self) -> Value {
        match self {
            PageResponse::VideoInfo(info) => json!({ "title": info.title, "url": info.url }),
            PageResponse::Success => json!({ "success": true }),
            PageResponse::Error(message) => json!({ "error": message }),
        }
    }
}

/// Something a page agent asks the rest of the extension to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The overlay's "Generate More" control was pressed.
    RequestMoreComments,
}

/// Outcome of a best-effort, fire-and-forget send.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Delivered,
    /// The message was dropped; the reason is informational only.
    Ignored(DeliveryError),
}

impl Delivery {
    pub fn from_result<T>(result: Result<T, DeliveryError>) -> Self {
        match result {
            Ok(_) => Delivery::Delivered,
            Err(e) => Delivery::Ignored(e),
        }
    }
}
