//! App context for the Learning Assistant.
//!
//! Holds the process-wide state every component shares: configuration, the
//! key-value store, the coordinator, the open tabs with their page agents,
//! and the clipboard. Popups and page agents hydrate from it when they start.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::database::kv_store::FOCUS_MODE_KEY;
use crate::database::{Database, KvStore};
use crate::managers::document_manager::{DocumentManager, DocumentManagerTrait};
use crate::managers::tab_manager::{PageChannel, TabManager, TabManagerTrait};
use crate::platform;
use crate::services::clipboard::MemoryClipboard;
use crate::services::content_service::ContentService;
use crate::services::coordinator::Coordinator;
use crate::services::page_agent::PageAgent;
use crate::types::config::AssistantConfig;
use crate::types::errors::{StorageError, TabError};
use crate::types::messages::{
    CoordinatorRequest, CoordinatorResponse, Delivery, PageEvent, PageMessage, ResponseData,
};
use crate::types::video::{is_host_page, VideoId};
use crate::ui::popup::Popup;

pub const CONFIG_FILE: &str = "config.json";
pub const DATABASE_FILE: &str = "learning-assistant.db";

/// Central application context.
pub struct App {
    pub config: AssistantConfig,
    pub store: KvStore,
    pub coordinator: Coordinator,
    tabs: Mutex<TabManager>,
    clipboard: MemoryClipboard,
}

impl App {
    /// Opens the app over `data_dir`, reading `config.json` and the SQLite store there.
    pub fn new(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        fs::create_dir_all(data_dir)?;
        let config = AssistantConfig::load(data_dir.join(CONFIG_FILE))?;
        let db = Arc::new(Database::open(data_dir.join(DATABASE_FILE))?);
        let coordinator = Coordinator::canned(&config);
        info!(data_dir = %data_dir.display(), "app opened");
        Ok(Self::assemble(config, KvStore::new(db), coordinator))
    }

    /// Opens the app in the platform data directory.
    pub fn open_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::new(&platform::get_data_dir())
    }

    /// App over an in-memory store and the canned content service.
    pub fn in_memory(config: AssistantConfig) -> Result<Self, StorageError> {
        let coordinator = Coordinator::canned(&config);
        Ok(Self::assemble(config, KvStore::in_memory()?, coordinator))
    }

    /// App whose coordinator talks to `service`.
    pub fn with_service(config: AssistantConfig, store: KvStore, service: Arc<dyn ContentService>) -> Self {
        let coordinator = Coordinator::new(service, config.host.clone());
        Self::assemble(config, store, coordinator)
    }

    /// Replaces the clipboard shared by popups and page agents.
    pub fn with_clipboard(mut self, clipboard: MemoryClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    fn assemble(config: AssistantConfig, store: KvStore, coordinator: Coordinator) -> Self {
        Self {
            config,
            store,
            coordinator,
            tabs: Mutex::new(TabManager::new()),
            clipboard: MemoryClipboard::new(),
        }
    }

    /// Locks the tab table. Never hold the guard across an `.await`.
    pub fn tabs(&self) -> MutexGuard<'_, TabManager> {
        self.tabs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clipboard(&self) -> &MemoryClipboard {
        &self.clipboard
    }

    /// Persisted focus-mode flag; unreadable or missing means off.
    pub fn focus_mode(&self) -> bool {
        match self.store.get::<bool>(FOCUS_MODE_KEY) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "could not read focus mode");
                false
            }
        }
    }

    /// Opens a tab at `url` without loading a document into it.
    pub fn open_tab(&self, url: &str, active: bool) -> String {
        self.tabs().create_tab(Some(url), active)
    }

    /// Loads `document` into `tab_id`.
    ///
    /// Host-site pages get a page agent hydrated with the persisted focus mode.
    /// Once loaded, the coordinator observes the completed navigation.
    pub fn load_page(&self, tab_id: &str, document: DocumentManager) -> Result<Option<Delivery>, TabError> {
        let url = document.url().to_string();
        let title = document.title().to_string();
        let focus_mode = self.focus_mode();

        let mut tabs = self.tabs();
        tabs.navigate(tab_id, &url)?;
        if is_host_page(&url, &self.config.host) {
            let agent = PageAgent::attach(document, Box::new(self.clipboard.clone()), focus_mode);
            tabs.attach_agent(tab_id, agent)?;
            debug!(tab_id, url = %url, "page agent attached");
        }
        if !title.is_empty() {
            tabs.update_tab_title(tab_id, &title)?;
        }
        let update = tabs.complete_load(tab_id)?;
        Ok(self.coordinator.on_tab_updated(&mut *tabs, tab_id, &update))
    }

    /// Opens a new active tab and loads `document` into it.
    pub fn open_page(&self, document: DocumentManager) -> Result<String, TabError> {
        let tab_id = self.tabs().create_tab(None, true);
        self.load_page(&tab_id, document)?;
        Ok(tab_id)
    }

    /// Opens a popup against the currently active tab.
    pub fn open_popup(&self) -> Popup<'_> {
        Popup::open(self)
    }

    /// Serves requests raised by page agents. Returns how many were served.
    ///
    /// A "Generate More" press asks the coordinator for a fresh comment set
    /// for the tab's video and shows it in that tab.
    pub async fn pump_page_events(&self) -> usize {
        let events = self.tabs().take_page_events();
        let mut served = 0;

        for (tab_id, event) in events {
            match event {
                PageEvent::RequestMoreComments => {
                    let url = self.tabs().get_tab(&tab_id).map(|t| t.url.clone());
                    let Some(video_id) = url.and_then(|u| VideoId::from_watch_url(&u, &self.config.host)) else {
                        warn!(tab_id = %tab_id, "comment refresh from a page without a video");
                        continue;
                    };

                    let request = CoordinatorRequest::GenerateComments {
                        video_id,
                        refresh: true,
                    };
                    let comments = match self.coordinator.request(request).await {
                        CoordinatorResponse::Success(ResponseData::Comments(comments)) => comments,
                        other => {
                            warn!(tab_id = %tab_id, response = ?other, "comment refresh failed");
                            continue;
                        }
                    };

                    let sent = self
                        .tabs()
                        .send_to_tab(&tab_id, PageMessage::ShowCommentDialog { comments });
                    match Delivery::from_result(sent) {
                        Delivery::Delivered => served += 1,
                        Delivery::Ignored(reason) => {
                            debug!(tab_id = %tab_id, reason = %reason, "refreshed comments dropped")
                        }
                    }
                }
            }
        }
        served
    }

    /// Advances every page's clock by `by`.
    pub fn advance_time(&self, by: Duration) {
        self.tabs().advance_timers(by);
    }
}
