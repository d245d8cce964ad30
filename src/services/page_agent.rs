//! Page Agent for watch pages.
//!
//! Executes DOM commands inside one page: reads video metadata, installs and
//! removes the focus-mode style override, and shows the comment-choice
//! overlay. Delayed effects (indicator fade, overlay close) run on the
//! agent's own virtual clock, advanced by [`PageAgent::advance`].

use std::time::Duration;

use tracing::{debug, warn};

use crate::managers::document_manager::{DocumentManager, DocumentManagerTrait};
use crate::managers::timer_queue::TimerQueue;
use crate::services::clipboard::Clipboard;
use crate::types::dom::{ListenerId, NodeId};
use crate::types::errors::DomError;
use crate::types::messages::{PageEvent, PageMessage, PageResponse};
use crate::types::video::VideoInfo;

pub const FOCUS_STYLE_ID: &str = "youtube-learning-assistant-focus-mode";
pub const FOCUS_INDICATOR_ID: &str = "focus-mode-indicator";
pub const COMMENT_DIALOG_ID: &str = "comment-options-dialog";
pub const BASE_STYLE_ID: &str = "learning-assistant-base-style";
pub const CONFIRMATION_CLASS: &str = "learning-assistant-confirmation";
pub const COMMENT_ROW_CLASS: &str = "comment-option";

const TITLE_SELECTORS: [&str; 2] = [
    "h1.title.style-scope.ytd-video-primary-info-renderer",
    "h1.title",
];
const TITLE_SUFFIX: &str = " - YouTube";
const COMMENT_INPUT_SELECTOR: &str = "div#placeholder-area";

pub const INDICATOR_VISIBLE: Duration = Duration::from_millis(3000);
pub const INDICATOR_FADE: Duration = Duration::from_millis(500);
pub const DIALOG_CLOSE_DELAY: Duration = Duration::from_millis(500);
pub const CONFIRMATION_LINGER: Duration = Duration::from_millis(1000);

const FOCUS_MODE_CSS: &str = "\
#secondary, #related, ytd-watch-next-secondary-results-renderer { display: none !important; }
#comments, ytd-comments { display: none !important; }
.ytp-ce-element { display: none !important; }
.ytp-cards-button, .ytp-cards-teaser { display: none !important; }
#primary, #primary-inner, #player-container, #player { width: 100% !important; max-width: 100% !important; }
";

const BASE_CSS: &str = "#comment-options-dialog { font-family: 'Roboto', sans-serif; }";

const INDICATOR_STYLE: &str = "position: fixed; top: 70px; right: 20px; \
background-color: rgba(0, 0, 0, 0.7); color: white; padding: 8px 12px; border-radius: 4px; \
font-size: 14px; z-index: 9999; transition: opacity 0.3s ease;";

const DIALOG_STYLE: &str = "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); \
background-color: #212121; border-radius: 8px; padding: 16px; z-index: 9999; width: 350px; max-width: 90%;";

const CONFIRMATION_STYLE: &str = "position: fixed; bottom: 20px; left: 50%; transform: translateX(-50%); \
background-color: #4caf50; color: white; padding: 8px 16px; border-radius: 4px; z-index: 10000;";

/// Delayed work owned by a page agent.
#[derive(Debug, Clone, PartialEq)]
enum PageTask {
    FadeIndicator(NodeId),
    CloseDialog { dialog: NodeId, confirmation: NodeId },
    Detach(NodeId),
}

/// Handles of the live comment overlay.
struct CommentDialog {
    root: NodeId,
    close_button: NodeId,
    refresh_button: NodeId,
    rows: Vec<(NodeId, String)>,
    outside_watcher: ListenerId,
}

/// Command executor living inside one page.
pub struct PageAgent {
    document: DocumentManager,
    clipboard: Box<dyn Clipboard>,
    focus_mode_active: bool,
    dialog: Option<CommentDialog>,
    timers: TimerQueue<PageTask>,
    events: Vec<PageEvent>,
    watcher_invocations: usize,
}

impl PageAgent {
    /// Attaches an agent to `document`, installing the base overlay style and
    /// applying the persisted focus-mode flag.
    pub fn attach(document: DocumentManager, clipboard: Box<dyn Clipboard>, focus_mode: bool) -> Self {
        let mut agent = Self {
            document,
            clipboard,
            focus_mode_active: false,
            dialog: None,
            timers: TimerQueue::new(),
            events: Vec::new(),
            watcher_invocations: 0,
        };

        let head = agent.document.head();
        if agent.document.get_element_by_id(BASE_STYLE_ID).is_none() {
            if let Err(e) = agent.document.append_new(head, "style", Some(BASE_STYLE_ID), &[], BASE_CSS) {
                warn!(error = %e, "failed to install base style");
            }
        }

        if focus_mode {
            if let Err(e) = agent.toggle_focus_mode(true) {
                warn!(error = %e, "failed to restore focus mode on attach");
            }
        }
        agent
    }

    /// Dispatches one message and produces the reply.
    pub fn handle(&mut self, message: PageMessage) -> PageResponse {
        debug!(action = message.action_name(), url = self.document.url(), "page agent message");
        match message {
            PageMessage::GetVideoInfo => match self.get_video_info() {
                Ok(info) => PageResponse::VideoInfo(info),
                Err(e) => {
                    warn!(error = %e, "could not read video info");
                    PageResponse::Error("Could not retrieve video information".to_string())
                }
            },
            PageMessage::ToggleFocusMode { value } => match self.toggle_focus_mode(value) {
                Ok(_) => PageResponse::Success,
                Err(e) => PageResponse::Error(e.to_string()),
            },
            PageMessage::ShowCommentDialog { comments } => match self.show_comment_dialog(&comments) {
                Ok(()) => PageResponse::Success,
                Err(e) => PageResponse::Error(e.to_string()),
            },
            PageMessage::PageReloaded => {
                self.reconcile();
                PageResponse::Success
            }
        }
    }

    /// Reads the video title and URL from the page.
    ///
    /// Tries the known title elements first, then the document title.
    pub fn get_video_info(&self) -> Result<VideoInfo, DomError> {
        let from_elements = TITLE_SELECTORS.iter().find_map(|selector| {
            self.document
                .query_selector(selector)
                .and_then(|node| self.document.get_element(node))
                .map(|el| el.text.trim().to_string())
                .filter(|t| !t.is_empty())
        });

        let title = from_elements
            .or_else(|| {
                let raw = self.document.title();
                let stripped = raw.strip_suffix(TITLE_SUFFIX).unwrap_or(raw).trim();
                (!stripped.is_empty()).then(|| stripped.to_string())
            })
            .ok_or_else(|| DomError::MissingElement("video title".to_string()))?;

        Ok(VideoInfo {
            title,
            url: self.document.url().to_string(),
        })
    }

    /// Switches focus mode. Returns whether the page changed.
    ///
    /// A call with the current value is a no-op.
    pub fn toggle_focus_mode(&mut self, enable: bool) -> Result<bool, DomError> {
        if enable == self.focus_mode_active {
            return Ok(false);
        }

        if enable {
            self.install_focus_style()?;
            let body = self.document.body();
            let indicator =
                self.document
                    .append_new(body, "div", Some(FOCUS_INDICATOR_ID), &[], "Focus Mode Active")?;
            if let Some(el) = self.document.get_element_mut(indicator) {
                el.style = INDICATOR_STYLE.to_string();
            }
            self.timers.schedule(INDICATOR_VISIBLE, PageTask::FadeIndicator(indicator));
        } else {
            if let Some(style) = self.document.get_element_by_id(FOCUS_STYLE_ID) {
                self.document.remove_node(style)?;
            }
            if let Some(indicator) = self.document.get_element_by_id(FOCUS_INDICATOR_ID) {
                self.document.remove_node(indicator)?;
                self.timers.cancel_where(|t| {
                    matches!(t, PageTask::FadeIndicator(n) | PageTask::Detach(n) if *n == indicator)
                });
            }
        }

        self.focus_mode_active = enable;
        debug!(enabled = enable, "focus mode toggled");
        Ok(true)
    }

    fn install_focus_style(&mut self) -> Result<NodeId, DomError> {
        if let Some(existing) = self.document.get_element_by_id(FOCUS_STYLE_ID) {
            return Ok(existing);
        }
        let head = self.document.head();
        self.document
            .append_new(head, "style", Some(FOCUS_STYLE_ID), &[], FOCUS_MODE_CSS)
    }

    /// Shows the comment-choice overlay, replacing any previous one.
    ///
    /// An empty list leaves the page untouched.
    pub fn show_comment_dialog(&mut self, comments: &[String]) -> Result<(), DomError> {
        if comments.is_empty() {
            return Ok(());
        }

        self.close_dialog();
        if let Some(stray) = self.document.get_element_by_id(COMMENT_DIALOG_ID) {
            self.document.remove_node(stray)?;
        }

        let doc = &mut self.document;
        let root = doc.create_element("div");
        if let Some(el) = doc.get_element_mut(root) {
            el.id = Some(COMMENT_DIALOG_ID.to_string());
            el.style = DIALOG_STYLE.to_string();
        }

        let header = doc.append_new(root, "div", None, &["dialog-header"], "")?;
        doc.append_new(header, "h3", None, &[], "Choose a Comment")?;
        let close_button = doc.append_new(header, "button", None, &["dialog-close"], "\u{00d7}")?;

        let list = doc.append_new(root, "div", None, &["comment-list"], "")?;
        let mut rows = Vec::with_capacity(comments.len());
        for (index, comment) in comments.iter().enumerate() {
            let row = doc.append_new(list, "div", None, &[COMMENT_ROW_CLASS], "")?;
            doc.append_new(row, "div", None, &["comment-counter"], &format!("Option {}", index + 1))?;
            doc.append_new(row, "div", None, &["comment-text"], comment)?;
            rows.push((row, comment.clone()));
        }

        let footer = doc.append_new(root, "div", None, &["dialog-footer"], "")?;
        let refresh_button = doc.append_new(footer, "button", None, &["dialog-refresh"], "Generate More")?;

        let body = doc.body();
        doc.append_child(body, root)?;
        let outside_watcher = doc.add_click_listener();

        debug!(options = rows.len(), "comment dialog shown");
        self.dialog = Some(CommentDialog {
            root,
            close_button,
            refresh_button,
            rows,
            outside_watcher,
        });
        Ok(())
    }

    /// Delivers a user click on `target`.
    ///
    /// Element handlers run first, then the document-level outside-click watcher.
    pub fn click(&mut self, target: NodeId) {
        let mut handled = None;
        if let Some(dialog) = &self.dialog {
            let doc = &self.document;
            if let Some(index) = dialog.rows.iter().position(|(row, _)| doc.contains(*row, target)) {
                handled = Some(DialogClick::Row(index));
            } else if doc.contains(dialog.close_button, target) {
                handled = Some(DialogClick::Close);
            } else if doc.contains(dialog.refresh_button, target) {
                handled = Some(DialogClick::Refresh);
            }
        }

        match handled {
            Some(DialogClick::Row(index)) => self.select_comment(index),
            Some(DialogClick::Close) => self.close_dialog(),
            Some(DialogClick::Refresh) => {
                self.events.push(PageEvent::RequestMoreComments);
                self.close_dialog();
            }
            None => {}
        }

        let outside = self.dialog.as_ref().and_then(|dialog| {
            if !self.document.has_click_listener(dialog.outside_watcher) {
                return None;
            }
            Some(!self.document.contains(dialog.root, target) && self.document.is_attached(dialog.root))
        });
        if let Some(outside) = outside {
            self.watcher_invocations += 1;
            if outside {
                debug!("comment dialog dismissed by outside click");
                self.close_dialog();
            }
        }
    }

    fn select_comment(&mut self, index: usize) {
        let Some((text, dialog_root)) = self
            .dialog
            .as_ref()
            .and_then(|d| d.rows.get(index).map(|(_, text)| (text.clone(), d.root)))
        else {
            return;
        };

        if let Err(e) = self.clipboard.write_text(&text) {
            warn!(error = %e, "failed to copy comment");
            return;
        }

        let body = self.document.body();
        let confirmation = match self.document.append_new(
            body,
            "div",
            None,
            &[CONFIRMATION_CLASS],
            "Copied to clipboard!",
        ) {
            Ok(node) => node,
            Err(e) => {
                warn!(error = %e, "failed to show copy confirmation");
                return;
            }
        };
        if let Some(el) = self.document.get_element_mut(confirmation) {
            el.style = CONFIRMATION_STYLE.to_string();
        }

        if let Some(input) = self.document.query_selector(COMMENT_INPUT_SELECTOR) {
            let _ = self.document.activate(input);
        }

        self.timers.schedule(
            DIALOG_CLOSE_DELAY,
            PageTask::CloseDialog {
                dialog: dialog_root,
                confirmation,
            },
        );
    }

    /// Removes the overlay and its outside-click watcher, if present.
    fn close_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        self.document.remove_click_listener(dialog.outside_watcher);
        if self.document.get_element(dialog.root).is_some() {
            if let Err(e) = self.document.remove_node(dialog.root) {
                warn!(error = %e, "failed to remove comment dialog");
            }
        }
    }

    /// Re-checks page state after a navigation inside the host site.
    fn reconcile(&mut self) {
        if self.focus_mode_active && self.document.get_element_by_id(FOCUS_STYLE_ID).is_none() {
            if let Err(e) = self.install_focus_style() {
                warn!(error = %e, "failed to re-install focus style");
            }
        }
        let stale = self
            .dialog
            .as_ref()
            .is_some_and(|d| !self.document.is_attached(d.root));
        if stale {
            self.close_dialog();
        }
    }

    /// Advances the agent's clock, running every timer that comes due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(task);
        }
        self.timers.settle(until);
    }

    fn run_task(&mut self, task: PageTask) {
        match task {
            PageTask::FadeIndicator(node) => {
                if let Some(el) = self.document.get_element_mut(node) {
                    el.style.push_str(" opacity: 0;");
                    self.timers.schedule(INDICATOR_FADE, PageTask::Detach(node));
                }
            }
            PageTask::CloseDialog { dialog, confirmation } => {
                if self.dialog.as_ref().is_some_and(|d| d.root == dialog) {
                    self.close_dialog();
                }
                self.timers.schedule(CONFIRMATION_LINGER, PageTask::Detach(confirmation));
            }
            PageTask::Detach(node) => {
                if self.document.get_element(node).is_some() {
                    let _ = self.document.remove_node(node);
                }
            }
        }
    }

    /// Drains requests this page has raised for the rest of the extension.
    pub fn take_events(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_focus_mode_active(&self) -> bool {
        self.focus_mode_active
    }

    pub fn document(&self) -> &DocumentManager {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut DocumentManager {
        &mut self.document
    }

    pub fn dialog_root(&self) -> Option<NodeId> {
        self.dialog.as_ref().map(|d| d.root)
    }

    pub fn dialog_rows(&self) -> Vec<NodeId> {
        self.dialog
            .as_ref()
            .map(|d| d.rows.iter().map(|(row, _)| *row).collect())
            .unwrap_or_default()
    }

    pub fn dialog_close_button(&self) -> Option<NodeId> {
        self.dialog.as_ref().map(|d| d.close_button)
    }

    pub fn dialog_refresh_button(&self) -> Option<NodeId> {
        self.dialog.as_ref().map(|d| d.refresh_button)
    }

    /// How many times the outside-click watcher has run.
    pub fn outside_watcher_invocations(&self) -> usize {
        self.watcher_invocations
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

enum DialogClick {
    Row(usize),
    Close,
    Refresh,
}
