use std::fmt;
use std::str::FromStr;

use super::{Document, NodeId};
use crate::error::Error;

/// A `tag.class` element criterion, e.g. `pre.macro`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
}

impl Selector {
    pub fn new(tag: Option<&str>, class: Option<&str>) -> Self {
        Self {
            tag: tag.map(str::to_string),
            class: class.map(str::to_string),
        }
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if let Some(wanted) = &self.tag {
            if !tag.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        match &self.class {
            Some(class) => doc.has_class(node, class),
            None => true,
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(Some("pre"), Some("macro"))
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidSelector(s.to_string());
        let s = s.trim();
        let (tag, class) = match s.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (s, None),
        };
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        let tag = if tag.is_empty() {
            None
        } else if valid_part(tag) {
            Some(tag)
        } else {
            return Err(invalid());
        };
        if class.is_some_and(|class| !valid_part(class)) {
            return Err(invalid());
        }
        if tag.is_none() && class.is_none() {
            return Err(invalid());
        }
        Ok(Self::new(tag, class))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        if let Some(class) = &self.class {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

impl Document {
    /// Every attached element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect()
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&node| selector.matches(self, node))
    }
}
