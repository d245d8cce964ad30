//! Coordinator: routes action requests to the content service.
//!
//! Every request runs in its own task and is answered through a one-shot
//! channel, so it gets exactly one reply. A handler that fails or panics
//! yields the action's error reply. The coordinator persists nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::managers::tab_manager::PageChannel;
use crate::services::content_service::{CannedContentService, ContentService};
use crate::types::config::{AssistantConfig, HostConfig};
use crate::types::errors::ServiceError;
use crate::types::messages::{
    Action, CoordinatorRequest, CoordinatorResponse, Delivery, PageMessage, ResponseData,
};
use crate::types::tab::{LoadStatus, TabUpdate};
use crate::types::video::is_watch_page;

/// Reply handle for one dispatched request.
///
/// Dropping it discards the eventual reply.
pub struct PendingReply {
    request_id: String,
    action: Action,
    rx: oneshot::Receiver<CoordinatorResponse>,
}

impl PendingReply {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Waits for the reply.
    pub async fn wait(self) -> CoordinatorResponse {
        match self.rx.await {
            Ok(response) => response,
            // The responder task was torn down with the runtime.
            Err(_) => CoordinatorResponse::Error(self.action.failure_message().to_string()),
        }
    }
}

pub struct Coordinator {
    service: Arc<dyn ContentService>,
    host: HostConfig,
    dispatched: AtomicU64,
}

impl Coordinator {
    pub fn new(service: Arc<dyn ContentService>, host: HostConfig) -> Self {
        Self {
            service,
            host,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Coordinator backed by the canned content service.
    pub fn canned(config: &AssistantConfig) -> Self {
        let service = CannedContentService::new(config.delays.clone(), config.links.clone());
        Self::new(Arc::new(service), config.host.clone())
    }

    /// Number of requests dispatched so far.
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Starts handling `request` and returns the handle its reply arrives on.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, request: CoordinatorRequest) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        let request_id = Uuid::new_v4().to_string();
        let action = request.action();
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        info!(
            request_id = %request_id,
            action = action.as_str(),
            video_id = %request.video_id(),
            "coordinator request"
        );

        let service = Arc::clone(&self.service);
        let handler = tokio::spawn(async move { run_handler(service.as_ref(), request).await });

        let id = request_id.clone();
        tokio::spawn(async move {
            let response = match handler.await {
                Ok(Ok(data)) => {
                    debug!(request_id = %id, action = action.as_str(), "request succeeded");
                    CoordinatorResponse::Success(data)
                }
                Ok(Err(e)) => {
                    warn!(request_id = %id, action = action.as_str(), error = %e, "request failed");
                    CoordinatorResponse::Error(action.failure_message().to_string())
                }
                Err(e) => {
                    error!(request_id = %id, action = action.as_str(), error = %e, "request handler aborted");
                    CoordinatorResponse::Error(action.failure_message().to_string())
                }
            };
            if tx.send(response).is_err() {
                debug!(request_id = %id, "reply discarded, requester went away");
            }
        });

        PendingReply {
            request_id,
            action,
            rx,
        }
    }

    /// Dispatches `request` and waits for its reply.
    pub async fn request(&self, request: CoordinatorRequest) -> CoordinatorResponse {
        self.dispatch(request).wait().await
    }

    /// Tab navigation observer.
    ///
    /// When a tab finishes loading a watch page, tells its page agent the page
    /// was reloaded. Returns `None` for updates that need no notification.
    pub fn on_tab_updated(
        &self,
        channel: &mut dyn PageChannel,
        tab_id: &str,
        update: &TabUpdate,
    ) -> Option<Delivery> {
        if update.status != LoadStatus::Complete {
            return None;
        }
        let url = update.url.as_deref()?;
        if !is_watch_page(url, &self.host) {
            return None;
        }

        debug!(tab_id, url, "watch page loaded");
        let delivery = Delivery::from_result(channel.send_to_tab(tab_id, PageMessage::PageReloaded));
        if let Delivery::Ignored(reason) = &delivery {
            debug!(tab_id, reason = %reason, "page reload notice dropped");
        }
        Some(delivery)
    }
}

async fn run_handler(
    service: &dyn ContentService,
    request: CoordinatorRequest,
) -> Result<ResponseData, ServiceError> {
    match request {
        CoordinatorRequest::GenerateSummary { video_id, language } => service
            .summarize(&video_id, language)
            .await
            .map(ResponseData::Summary),
        CoordinatorRequest::GenerateQuiz { video_id, count } => service
            .generate_quiz(&video_id, count)
            .await
            .map(ResponseData::Quiz),
        CoordinatorRequest::ExportNotes { video_id, format } => service
            .export_notes(&video_id, format)
            .await
            .map(ResponseData::Export),
        CoordinatorRequest::GenerateComments { video_id, refresh } => service
            .generate_comments(&video_id, refresh)
            .await
            .map(ResponseData::Comments),
    }
}
