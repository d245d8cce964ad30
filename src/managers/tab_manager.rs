use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;
use uuid::Uuid;

use crate::services::page_agent::PageAgent;
use crate::types::errors::{DeliveryError, TabError};
use crate::types::messages::{PageEvent, PageMessage, PageResponse};
use crate::types::tab::{LoadStatus, Tab, TabUpdate};

/// Sends commands to the page agent living in a tab.
pub trait PageChannel {
    fn send_to_tab(&mut self, tab_id: &str, message: PageMessage) -> Result<PageResponse, DeliveryError>;
}

/// Trait defining the tab management interface.
pub trait TabManagerTrait {
    fn create_tab(&mut self, url: Option<&str>, active: bool) -> String;
    fn close_tab(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn switch_tab(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> Vec<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
    fn navigate(&mut self, tab_id: &str, url: &str) -> Result<TabUpdate, TabError>;
    fn complete_load(&mut self, tab_id: &str) -> Result<TabUpdate, TabError>;
    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> Result<(), TabError>;
}

/// In-memory tabs, each optionally hosting a page agent.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    agents: HashMap<String, PageAgent>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            agents: HashMap::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: &str) -> Result<&mut Tab, TabError> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// Installs `agent` as the receiver for `tab_id`, replacing any previous one.
    pub fn attach_agent(&mut self, tab_id: &str, agent: PageAgent) -> Result<(), TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }
        self.agents.insert(tab_id.to_string(), agent);
        Ok(())
    }

    pub fn agent(&self, tab_id: &str) -> Option<&PageAgent> {
        self.agents.get(tab_id)
    }

    pub fn agent_mut(&mut self, tab_id: &str) -> Option<&mut PageAgent> {
        self.agents.get_mut(tab_id)
    }

    /// Tabs with an attached page agent, in tab order.
    pub fn agent_tab_ids(&self) -> Vec<String> {
        self.tabs
            .iter()
            .filter(|t| self.agents.contains_key(&t.id))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Drains the requests raised by every page agent, tagged with their tab.
    pub fn take_page_events(&mut self) -> Vec<(String, PageEvent)> {
        let mut events = Vec::new();
        for tab_id in self.agent_tab_ids() {
            if let Some(agent) = self.agents.get_mut(&tab_id) {
                events.extend(agent.take_events().into_iter().map(|e| (tab_id.clone(), e)));
            }
        }
        events
    }

    /// Advances every page agent's clock by `by`.
    pub fn advance_timers(&mut self, by: Duration) {
        for agent in self.agents.values_mut() {
            agent.advance(by);
        }
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PageChannel for TabManager {
    fn send_to_tab(&mut self, tab_id: &str, message: PageMessage) -> Result<PageResponse, DeliveryError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(DeliveryError::TabNotFound(tab_id.to_string()));
        }
        let agent = self
            .agents
            .get_mut(tab_id)
            .ok_or_else(|| DeliveryError::NoReceiver(tab_id.to_string()))?;
        Ok(agent.handle(message))
    }
}

impl TabManagerTrait for TabManager {
    /// Create a new tab, optionally with a URL and active state.
    /// Returns the new tab's ID.
    fn create_tab(&mut self, url: Option<&str>, active: bool) -> String {
        let id = Uuid::new_v4().to_string();
        let tab = Tab {
            id: id.clone(),
            url: url.unwrap_or("about:blank").to_string(),
            title: "New Tab".to_string(),
            status: LoadStatus::Loading,
            created_at: Self::now(),
        };
        self.tabs.push(tab);
        if active || self.active_tab_id.is_none() {
            self.active_tab_id = Some(id.clone());
        }
        debug!(tab_id = %id, "tab created");
        id
    }

    /// Close a tab and drop its page agent. If it's the active tab, switch to
    /// the nearest neighbor; if it's the last tab, open an empty one.
    fn close_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        let idx = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        let need_switch = self.active_tab_id.as_deref() == Some(tab_id);
        self.tabs.remove(idx);
        self.agents.remove(tab_id);

        if self.tabs.is_empty() {
            let new_id = self.create_tab(None, true);
            self.active_tab_id = Some(new_id);
            return Ok(());
        }

        if need_switch {
            let new_idx = idx.min(self.tabs.len() - 1);
            self.active_tab_id = Some(self.tabs[new_idx].id.clone());
        }
        Ok(())
    }

    fn switch_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }
        self.active_tab_id = Some(tab_id.to_string());
        Ok(())
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> Vec<&Tab> {
        self.tabs.iter().collect()
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_ref()
            .and_then(|id| self.tabs.iter().find(|t| t.id == *id))
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Starts loading `url` in the tab. The old document and its agent go away.
    fn navigate(&mut self, tab_id: &str, url: &str) -> Result<TabUpdate, TabError> {
        let tab = self.tab_mut(tab_id)?;
        tab.url = url.to_string();
        tab.title = url.to_string();
        tab.status = LoadStatus::Loading;
        self.agents.remove(tab_id);
        Ok(TabUpdate {
            status: LoadStatus::Loading,
            url: Some(url.to_string()),
        })
    }

    /// Marks the tab's page as loaded and returns the update to broadcast.
    fn complete_load(&mut self, tab_id: &str) -> Result<TabUpdate, TabError> {
        let tab = self.tab_mut(tab_id)?;
        tab.status = LoadStatus::Complete;
        Ok(TabUpdate {
            status: LoadStatus::Complete,
            url: Some(tab.url.clone()),
        })
    }

    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> Result<(), TabError> {
        self.tab_mut(tab_id)?.title = title.to_string();
        Ok(())
    }
}
