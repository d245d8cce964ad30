//! In-memory page document the page agent reads and mutates.
//!
//! Nodes live in an arena keyed by [`NodeId`]; removing a node drops its whole
//! subtree. Only nodes reachable from the root are visible to lookups.

use std::collections::{HashMap, HashSet};

use crate::types::dom::{Element, ListenerId, NodeId, Selector};
use crate::types::errors::DomError;

/// Trait defining the page document interface.
pub trait DocumentManagerTrait {
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError>;
    fn remove_node(&mut self, node: NodeId) -> Result<(), DomError>;
    fn get_element(&self, node: NodeId) -> Option<&Element>;
    fn get_element_mut(&mut self, node: NodeId) -> Option<&mut Element>;
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;
    fn query_selector(&self, selector: &str) -> Option<NodeId>;
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId>;
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn is_attached(&self, node: NodeId) -> bool;
    fn head(&self) -> NodeId;
    fn body(&self) -> NodeId;
    fn title(&self) -> &str;
    fn url(&self) -> &str;
    fn add_click_listener(&mut self) -> ListenerId;
    fn remove_click_listener(&mut self, listener: ListenerId) -> bool;
    fn has_click_listener(&self, listener: ListenerId) -> bool;
    fn click_listener_count(&self) -> usize;
    fn activate(&mut self, node: NodeId) -> Result<(), DomError>;
    fn last_activated(&self) -> Option<NodeId>;
}

/// Arena-backed document with an `html > (head, body)` skeleton.
pub struct DocumentManager {
    nodes: HashMap<NodeId, Element>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    title: String,
    url: String,
    next_node: u64,
    next_listener: u64,
    click_listeners: HashSet<ListenerId>,
    last_activated: Option<NodeId>,
}

impl DocumentManager {
    pub fn new(url: &str, title: &str) -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            title: title.to_string(),
            url: url.to_string(),
            next_node: 0,
            next_listener: 0,
            click_listeners: HashSet::new(),
            last_activated: None,
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.link(doc.root, doc.head);
        doc.link(doc.root, doc.body);
        doc
    }

    /// Creates an element with the given id and classes and appends it to `parent`.
    pub fn append_new(
        &mut self,
        parent: NodeId,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
        text: &str,
    ) -> Result<NodeId, DomError> {
        let node = self.create_element(tag);
        if let Some(el) = self.nodes.get_mut(&node) {
            el.id = id.map(str::to_string);
            el.classes = classes.iter().map(|c| c.to_string()).collect();
            el.text = text.to_string();
        }
        self.append_child(parent, node)?;
        Ok(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = self.nodes.get_mut(&child).and_then(|c| c.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|n| *n != child);
            }
        }
    }

    /// Attached nodes in document (pre-)order.
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            order.push(node);
            if let Some(el) = self.nodes.get(&node) {
                stack.extend(el.children.iter().rev());
            }
        }
        order
    }
}

impl DocumentManagerTrait for DocumentManager {
    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            node,
            Element {
                node,
                tag: tag.to_lowercase(),
                id: None,
                classes: Vec::new(),
                text: String::new(),
                style: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        node
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.nodes.contains_key(&parent) {
            return Err(DomError::NodeNotFound(parent.0));
        }
        if !self.nodes.contains_key(&child) {
            return Err(DomError::NodeNotFound(child.0));
        }
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::HierarchyError(child.0));
        }
        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    /// Detaches `node` and drops it with its subtree.
    fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root || node == self.head || node == self.body {
            return Err(DomError::HierarchyError(node.0));
        }
        if !self.nodes.contains_key(&node) {
            return Err(DomError::NodeNotFound(node.0));
        }
        self.unlink(node);
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(el) = self.nodes.remove(&n) {
                stack.extend(el.children);
            }
            if self.last_activated == Some(n) {
                self.last_activated = None;
            }
        }
        Ok(())
    }

    fn get_element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    fn get_element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(&node)
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|n| self.nodes.get(n).and_then(|e| e.id.as_deref()) == Some(id))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.walk()
            .into_iter()
            .find(|n| self.nodes.get(n).is_some_and(|e| selector.matches(e)))
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.walk()
            .into_iter()
            .filter(|n| self.nodes.get(n).is_some_and(|e| selector.matches(e)))
            .collect()
    }

    /// True when `node` is `ancestor` or lies in its subtree.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return self.nodes.contains_key(&n);
            }
            current = self.nodes.get(&n).and_then(|e| e.parent);
        }
        false
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    fn head(&self) -> NodeId {
        self.head
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn add_click_listener(&mut self) -> ListenerId {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.click_listeners.insert(listener);
        listener
    }

    fn remove_click_listener(&mut self, listener: ListenerId) -> bool {
        self.click_listeners.remove(&listener)
    }

    fn has_click_listener(&self, listener: ListenerId) -> bool {
        self.click_listeners.contains(&listener)
    }

    fn click_listener_count(&self) -> usize {
        self.click_listeners.len()
    }

    /// Simulates a programmatic click on an attached element.
    fn activate(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.is_attached(node) {
            return Err(DomError::NodeNotFound(node.0));
        }
        self.last_activated = Some(node);
        Ok(())
    }

    fn last_activated(&self) -> Option<NodeId> {
        self.last_activated
    }
}
