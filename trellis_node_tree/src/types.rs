// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the node tree: node identifiers and element data.

use alloc::string::String;
use smallvec::SmallVec;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Element-style payload carried by every node: a tag name, an optional id,
/// and a class list. Selector matching works entirely off this data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name, e.g. `"ul"` or `"li"`. Matched case-sensitively.
    pub tag: String,
    /// Optional unique id, matched by `#id` selectors.
    pub id: Option<String>,
    /// Class names, matched by `.class` selectors. Order is irrelevant.
    pub classes: SmallVec<[String; 2]>,
}

impl ElementData {
    /// Create element data with the given tag and no id or classes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: SmallVec::new(),
        }
    }

    /// Set the id, replacing any previous one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append a class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_classes_and_id() {
        let data = ElementData::new("li")
            .with_id("first")
            .with_class("item")
            .with_class("selected");
        assert_eq!(data.tag, "li");
        assert_eq!(data.id.as_deref(), Some("first"));
        assert!(data.has_class("item"));
        assert!(data.has_class("selected"));
        assert!(!data.has_class("missing"));
    }
}
