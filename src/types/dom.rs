use serde::{Deserialize, Serialize};

/// Handle of a node inside one page document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Handle of a document-level click listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// An element node of a page document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub node: NodeId,
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    /// Inline style, as a CSS declaration block.
    pub style: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One compound selector: `tag`, `#id`, `.class` parts in any combination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    /// Parses selectors such as `h1.title`, `div#placeholder-area` or `#comments`.
    ///
    /// Descendant and attribute selectors are not supported.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }

        let mut selector = Selector::default();
        let mut current = String::new();
        let mut kind = ' ';
        for ch in input.chars().chain(std::iter::once('\0')) {
            if ch == '.' || ch == '#' || ch == '\0' {
                match kind {
                    ' ' if !current.is_empty() => selector.tag = Some(current.to_lowercase()),
                    '#' if !current.is_empty() => selector.id = Some(current.clone()),
                    '.' if !current.is_empty() => selector.classes.push(current.clone()),
                    ' ' => {}
                    _ => return None,
                }
                current.clear();
                kind = ch;
            } else {
                current.push(ch);
            }
        }
        Some(selector)
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
    }
}
