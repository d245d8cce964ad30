//! Popup interface.
//!
//! One `Popup` lives for as long as the user keeps the popup open. It reads
//! the active tab once on open, owns the per-video artifact cache lookups and
//! the quiz session, and records a notice for every action it performs.
//!
//! Every action takes `&mut self`, so a popup never has two requests in
//! flight at once.

use tracing::{debug, info, warn};
use url::Url;

use crate::app::App;
use crate::database::kv_store::FOCUS_MODE_KEY;
use crate::managers::artifact_cache::{ArtifactCache, ArtifactCacheTrait};
use crate::managers::quiz_session::{QuizScore, QuizSession};
use crate::managers::tab_manager::{PageChannel, TabManagerTrait};
use crate::services::clipboard::{Clipboard, SpeechSink};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::artifacts::{ExportFormat, ExportReceipt, QuizCount, SummaryArtifact};
use crate::types::errors::{DeliveryError, PopupError};
use crate::types::messages::{
    CoordinatorRequest, CoordinatorResponse, PageMessage, PageResponse, ResponseData,
};
use crate::types::notice::Notice;
use crate::types::settings::Settings;
use crate::types::video::{VideoId, VideoInfo};

const CHAT_PROMPT_SUFFIX: &str =
    "Highlight the key topics and help me understand the concept better with examples.";

/// What the popup was opened against.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContext {
    /// Not a watch page; only "go to host site" is offered.
    NotApplicable,
    Watch {
        tab_id: String,
        video_id: VideoId,
        /// `None` when the page agent could not read the title.
        video_info: Option<VideoInfo>,
    },
}

/// Builds the chat hand-off prompt for `summary`.
pub fn chat_prompt(summary: &SummaryArtifact) -> String {
    format!("Video Summary:\n{}\n\n{}", summary.main_summary, CHAT_PROMPT_SUFFIX)
}

pub struct Popup<'a> {
    app: &'a App,
    context: PopupContext,
    focus_mode: bool,
    settings: SettingsEngine<'a>,
    summary: Option<SummaryArtifact>,
    quiz: Option<QuizSession>,
    quiz_count: QuizCount,
    notices: Vec<Notice>,
}

impl<'a> Popup<'a> {
    /// Opens the popup against the active tab.
    ///
    /// On a watch page this reads the video metadata, loads cached artifacts,
    /// and re-sends the persisted focus mode to the page.
    pub fn open(app: &'a App) -> Self {
        let mut settings = SettingsEngine::new(&app.store);
        if let Err(e) = settings.load() {
            warn!(error = %e, "settings unreadable, using defaults");
        }
        let focus_mode = app.focus_mode();

        let active = app.tabs().get_active_tab().map(|t| (t.id.clone(), t.url.clone()));
        let target = active.and_then(|(tab_id, url)| {
            VideoId::from_watch_url(&url, &app.config.host).map(|video_id| (tab_id, video_id))
        });

        let context = match target {
            None => PopupContext::NotApplicable,
            Some((tab_id, video_id)) => {
                let reply = app.tabs().send_to_tab(&tab_id, PageMessage::GetVideoInfo);
                let video_info = match reply {
                    Ok(PageResponse::VideoInfo(info)) => Some(info),
                    Ok(other) => {
                        debug!(tab_id = %tab_id, reply = ?other, "no video info");
                        None
                    }
                    Err(e) => {
                        debug!(tab_id = %tab_id, error = %e, "video info unavailable");
                        None
                    }
                };

                let reconcile = app
                    .tabs()
                    .send_to_tab(&tab_id, PageMessage::ToggleFocusMode { value: focus_mode });
                if let Err(e) = reconcile {
                    debug!(tab_id = %tab_id, error = %e, "focus mode not reconciled");
                }

                PopupContext::Watch {
                    tab_id,
                    video_id,
                    video_info,
                }
            }
        };
        info!(applicable = context != PopupContext::NotApplicable, "popup opened");

        let mut popup = Self {
            app,
            context,
            focus_mode,
            settings,
            summary: None,
            quiz: None,
            quiz_count: QuizCount::default(),
            notices: Vec::new(),
        };
        popup.load_cached();
        popup
    }

    fn load_cached(&mut self) {
        let PopupContext::Watch { video_id, .. } = &self.context else {
            return;
        };
        let cache = ArtifactCache::new(&self.app.store);
        match cache.get_summary(video_id) {
            Ok(summary) => self.summary = summary,
            Err(e) => warn!(error = %e, "cached summary unreadable"),
        }
        match cache.get_quiz(video_id) {
            Ok(Some(quiz)) => self.quiz = QuizSession::new(quiz).ok(),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cached quiz unreadable"),
        }
    }

    fn watch_target(&self) -> Result<(String, VideoId), PopupError> {
        match &self.context {
            PopupContext::Watch { tab_id, video_id, .. } => Ok((tab_id.clone(), video_id.clone())),
            PopupContext::NotApplicable => Err(PopupError::NotApplicableContext),
        }
    }

    /// Records an error notice and returns `error`.
    fn fail<T>(&mut self, title: &str, error: PopupError) -> Result<T, PopupError> {
        warn!(error = %error, "popup action failed");
        self.notices.push(Notice::error(title, error.to_string()));
        Err(error)
    }

    fn notify(&mut self, title: &str, description: impl Into<String>) {
        self.notices.push(Notice::info(title, description));
    }

    pub fn context(&self) -> &PopupContext {
        &self.context
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self.context, PopupContext::Watch { .. })
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        match &self.context {
            PopupContext::Watch { video_id, .. } => Some(video_id),
            PopupContext::NotApplicable => None,
        }
    }

    pub fn video_info(&self) -> Option<&VideoInfo> {
        match &self.context {
            PopupContext::Watch { video_info, .. } => video_info.as_ref(),
            PopupContext::NotApplicable => None,
        }
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get_settings()
    }

    pub fn summary(&self) -> Option<&SummaryArtifact> {
        self.summary.as_ref()
    }

    pub fn quiz_session(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Opens the host site's home page in a new tab. Available in every context.
    pub fn go_to_host_site(&mut self) -> String {
        let url = self.app.config.host.home_url.clone();
        self.app.open_tab(&url, true)
    }

    // --- Focus mode ---

    /// Flips focus mode, persists it and applies it to every page agent.
    ///
    /// The displayed state flips first and is not rolled back when the page
    /// cannot be reached; the next popup open re-sends the persisted value.
    pub fn toggle_focus_mode(&mut self) -> Result<bool, PopupError> {
        let (tab_id, _) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Error", e),
        };

        let enabled = !self.focus_mode;
        self.focus_mode = enabled;

        match self.apply_focus_mode(&tab_id, enabled) {
            Ok(()) => {
                if enabled {
                    self.notify("Focus Mode Activated", "Distractions have been hidden.");
                } else {
                    self.notify(
                        "Focus Mode Deactivated",
                        "YouTube's normal interface has been restored.",
                    );
                }
                Ok(enabled)
            }
            Err(e) => self.fail("Error", e),
        }
    }

    fn apply_focus_mode(&self, active_tab: &str, enabled: bool) -> Result<(), PopupError> {
        self.app.store.set(FOCUS_MODE_KEY, &enabled)?;

        let mut tabs = self.app.tabs();
        let agent_tabs = tabs.agent_tab_ids();
        let mut active_result = Err(PopupError::Delivery(DeliveryError::NoReceiver(
            active_tab.to_string(),
        )));

        for tab_id in agent_tabs {
            let outcome = match tabs.send_to_tab(&tab_id, PageMessage::ToggleFocusMode { value: enabled }) {
                Ok(PageResponse::Error(message)) => Err(PopupError::DomAssumption(message)),
                Ok(_) => Ok(()),
                Err(e) => Err(PopupError::Delivery(e)),
            };
            if tab_id == active_tab {
                active_result = outcome;
            } else if let Err(e) = outcome {
                debug!(tab_id = %tab_id, error = %e, "focus mode not applied to background tab");
            }
        }
        active_result
    }

    // --- Summary ---

    /// Returns the video's summary, from cache unless `refresh` is set.
    pub async fn generate_summary(&mut self, refresh: bool) -> Result<SummaryArtifact, PopupError> {
        let (_, video_id) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Error", e),
        };
        let app = self.app;
        let cache = ArtifactCache::new(&app.store);

        if !refresh {
            match cache.get_summary(&video_id) {
                Ok(Some(summary)) => {
                    debug!(video_id = %video_id, "summary served from cache");
                    self.summary = Some(summary.clone());
                    return Ok(summary);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "summary cache unreadable"),
            }
        }

        let request = CoordinatorRequest::GenerateSummary {
            video_id: video_id.clone(),
            language: self.settings.get_settings().preferred_language,
        };
        match app.coordinator.request(request).await {
            CoordinatorResponse::Success(ResponseData::Summary(summary)) => {
                if let Err(e) = cache.put_summary(&video_id, &summary) {
                    warn!(error = %e, "summary not cached");
                }
                self.summary = Some(summary.clone());
                self.notify("Summary Generated", "Video summary has been created successfully.");
                Ok(summary)
            }
            CoordinatorResponse::Success(other) => self.fail("Error", unexpected(other)),
            CoordinatorResponse::Error(message) => self.fail("Error", PopupError::HandlerFailure(message)),
        }
    }

    /// Copies the summary as plain text.
    pub fn copy_summary(&mut self) -> Result<(), PopupError> {
        let Some(text) = self.summary.as_ref().map(SummaryArtifact::to_clipboard_text) else {
            return self.fail("Error", no_summary());
        };
        let mut clipboard = self.app.clipboard().clone();
        match clipboard.write_text(&text) {
            Ok(()) => {
                self.notify("Copied to Clipboard", "Summary has been copied to your clipboard.");
                Ok(())
            }
            Err(e) => self.fail("Error", PopupError::Clipboard(e)),
        }
    }

    /// Reads the main summary aloud. Returns false when text-to-speech is off.
    pub fn play_summary(&mut self, speech: &mut dyn SpeechSink) -> Result<bool, PopupError> {
        let Some(text) = self.summary.as_ref().map(|s| s.main_summary.clone()) else {
            return self.fail("Error", no_summary());
        };
        if !self.settings.get_settings().use_text_to_speech {
            self.notify(
                "Text-to-Speech Disabled",
                "Enable text-to-speech in settings to play summaries.",
            );
            return Ok(false);
        }
        speech.speak(&text);
        self.notify("Playing Summary", "Text-to-speech started.");
        Ok(true)
    }

    // --- Quiz ---

    pub fn quiz_count(&self) -> QuizCount {
        self.quiz_count
    }

    pub fn increase_quiz_count(&mut self) -> QuizCount {
        self.quiz_count = self.quiz_count.increment();
        self.quiz_count
    }

    pub fn decrease_quiz_count(&mut self) -> QuizCount {
        self.quiz_count = self.quiz_count.decrement();
        self.quiz_count
    }

    /// Starts a quiz session, from the cached quiz unless `refresh` is set.
    /// Returns the number of questions.
    pub async fn generate_quiz(&mut self, refresh: bool) -> Result<usize, PopupError> {
        let (_, video_id) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Error", e),
        };
        let app = self.app;
        let cache = ArtifactCache::new(&app.store);

        if !refresh {
            match cache.get_quiz(&video_id) {
                Ok(Some(quiz)) => {
                    debug!(video_id = %video_id, "quiz served from cache");
                    return match QuizSession::new(quiz) {
                        Ok(session) => {
                            let total = session.len();
                            self.quiz = Some(session);
                            Ok(total)
                        }
                        Err(e) => self.fail("Error", e.into()),
                    };
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "quiz cache unreadable"),
            }
        }

        let request = CoordinatorRequest::GenerateQuiz {
            video_id: video_id.clone(),
            count: self.quiz_count,
        };
        let quiz = match app.coordinator.request(request).await {
            CoordinatorResponse::Success(ResponseData::Quiz(quiz)) => quiz,
            CoordinatorResponse::Success(other) => return self.fail("Error", unexpected(other)),
            CoordinatorResponse::Error(message) => {
                return self.fail("Error", PopupError::HandlerFailure(message))
            }
        };

        let session = match QuizSession::new(quiz.clone()) {
            Ok(session) => session,
            Err(e) => return self.fail("Error", e.into()),
        };
        if let Err(e) = cache.put_quiz(&video_id, &quiz) {
            warn!(error = %e, "quiz not cached");
        }
        let total = session.len();
        self.quiz = Some(session);
        self.notify(
            "Quiz Generated",
            format!("{} questions have been created based on the video content.", total),
        );
        Ok(total)
    }

    /// Replaces the current session with a freshly generated quiz.
    pub async fn new_quiz(&mut self) -> Result<usize, PopupError> {
        self.generate_quiz(true).await
    }

    pub fn select_answer(&mut self, option: usize) -> Result<(), PopupError> {
        let Some(session) = self.quiz.as_mut() else {
            return Err(no_quiz());
        };
        session.select(option).map_err(PopupError::from)
    }

    pub fn next_question(&mut self) -> bool {
        self.quiz.as_mut().is_some_and(QuizSession::next)
    }

    pub fn previous_question(&mut self) -> bool {
        self.quiz.as_mut().is_some_and(QuizSession::previous)
    }

    pub fn submit_quiz(&mut self) -> Result<QuizScore, PopupError> {
        let Some(session) = self.quiz.as_mut() else {
            return self.fail("Error", no_quiz());
        };
        match session.submit() {
            Ok(score) => {
                self.notify(
                    "Quiz Results",
                    format!(
                        "You scored {}/{} ({}%)",
                        score.correct, score.total, score.percentage
                    ),
                );
                Ok(score)
            }
            Err(e) => self.fail("Error", e.into()),
        }
    }

    // --- Export ---

    /// Exports notes and opens the returned download in a new tab.
    pub async fn export_notes(&mut self, format: ExportFormat) -> Result<ExportReceipt, PopupError> {
        let (_, video_id) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Export Failed", e),
        };

        let request = CoordinatorRequest::ExportNotes { video_id, format };
        match self.app.coordinator.request(request).await {
            CoordinatorResponse::Success(ResponseData::Export(receipt)) => {
                self.app.open_tab(&receipt.download_url, true);
                self.notify(
                    "Export Successful",
                    format!(
                        "Notes exported as {} successfully.",
                        receipt.format.as_str().to_uppercase()
                    ),
                );
                Ok(receipt)
            }
            CoordinatorResponse::Success(other) => self.fail("Export Failed", unexpected(other)),
            CoordinatorResponse::Error(message) => {
                self.fail("Export Failed", PopupError::HandlerFailure(message))
            }
        }
    }

    // --- Comments ---

    /// Requests candidate comments and shows them in the page's overlay.
    pub async fn generate_comments(&mut self) -> Result<Vec<String>, PopupError> {
        let (tab_id, video_id) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Error", e),
        };

        let request = CoordinatorRequest::GenerateComments {
            video_id,
            refresh: false,
        };
        let comments = match self.app.coordinator.request(request).await {
            CoordinatorResponse::Success(ResponseData::Comments(comments)) => comments,
            CoordinatorResponse::Success(other) => return self.fail("Error", unexpected(other)),
            CoordinatorResponse::Error(message) => {
                return self.fail("Error", PopupError::HandlerFailure(message))
            }
        };

        let shown = self.app.tabs().send_to_tab(
            &tab_id,
            PageMessage::ShowCommentDialog {
                comments: comments.clone(),
            },
        );
        match shown {
            Ok(PageResponse::Error(message)) => self.fail("Error", PopupError::DomAssumption(message)),
            Ok(_) => {
                self.notify("Comments Generated", "Choose a comment to use from the overlay.");
                Ok(comments)
            }
            Err(e) => self.fail("Error", e.into()),
        }
    }

    // --- Chat hand-off ---

    /// Opens the chat assistant with a prompt built from the cached summary.
    /// Returns the opened URL.
    pub fn open_chat_assistant(&mut self) -> Result<String, PopupError> {
        let (_, video_id) = match self.watch_target() {
            Ok(target) => target,
            Err(e) => return self.fail("Error", e),
        };

        let cached = ArtifactCache::new(&self.app.store).get_summary(&video_id);
        let summary = match cached {
            Ok(Some(summary)) => summary,
            Ok(None) => return self.fail("Error", no_summary()),
            Err(e) => return self.fail("Error", e.into()),
        };

        let base = &self.app.config.links.chat_assistant_url;
        let url = match Url::parse_with_params(base, &[("prompt", chat_prompt(&summary))]) {
            Ok(url) => url.to_string(),
            Err(e) => {
                return self.fail(
                    "Error",
                    PopupError::HandlerFailure(format!("Failed to open chat assistant: {}", e)),
                )
            }
        };

        self.app.open_tab(&url, true);
        self.notify("Redirecting to Chat Assistant", "Summary has been copied to prompt.");
        Ok(url)
    }

    // --- Settings ---

    /// Edits one setting in the popup; nothing is stored until `save_settings`.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), PopupError> {
        if let Err(e) = self.watch_target() {
            return self.fail("Error", e);
        }
        match self.settings.apply_value(key, value) {
            Ok(()) => Ok(()),
            Err(e) => self.fail("Error", e.into()),
        }
    }

    pub fn save_settings(&mut self) -> Result<(), PopupError> {
        if let Err(e) = self.watch_target() {
            return self.fail("Error", e);
        }
        match self.settings.save() {
            Ok(()) => {
                self.notify("Settings Saved", "Your preferences have been updated.");
                Ok(())
            }
            Err(e) => self.fail("Error", e.into()),
        }
    }

    pub fn reset_settings(&mut self) -> Result<Settings, PopupError> {
        if let Err(e) = self.watch_target() {
            return self.fail("Error", e);
        }
        match self.settings.reset() {
            Ok(()) => {
                self.notify(
                    "Settings Reset",
                    "Your preferences have been reset to default values.",
                );
                Ok(self.settings.get_settings().clone())
            }
            Err(e) => self.fail("Error", e.into()),
        }
    }
}

fn no_summary() -> PopupError {
    PopupError::MissingPrerequisite("Please generate a summary before using this feature.".to_string())
}

fn no_quiz() -> PopupError {
    PopupError::MissingPrerequisite("Please generate a quiz first.".to_string())
}

fn unexpected(data: ResponseData) -> PopupError {
    PopupError::HandlerFailure(format!("Unexpected response: {:?}", data))
}
