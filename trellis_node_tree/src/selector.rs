// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal selector engine: compound simple selectors and comma groups.
//!
//! The grammar is intentionally small. A selector is a comma-separated list
//! of alternatives; each alternative is a compound of simple selectors with
//! no whitespace between them:
//!
//! - `*` — universal
//! - `tag` — tag name
//! - `#id` — id
//! - `.class` — class name (repeatable)
//!
//! `li.item`, `#app`, `.row.selected`, and `li, span.label` are all valid.
//! Combinators (`a b`, `a > b`, `a + b`, `a ~ b`), attribute conditions, and
//! pseudo-classes are not part of the grammar and produce
//! [`SelectorError::Unsupported`]. Callers that need richer matching supply
//! their own scan at the delegation boundary.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::types::ElementData;

/// Error produced by [`Selector::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one comma group) was empty.
    Empty,
    /// The selector uses syntax outside the supported grammar.
    Unsupported(String),
}

impl core::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::Unsupported(s) => write!(f, "unsupported selector: {s:?}"),
        }
    }
}

impl core::error::Error for SelectorError {}

/// One compound of simple selectors; every present piece must match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, data: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && data.tag != *tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && data.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| data.has_class(c))
    }
}

/// A parsed selector: one or more comma-separated alternatives.
///
/// A node matches the selector when it matches any alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use trellis_node_tree::{ElementData, Selector};
    ///
    /// let sel = Selector::parse("li.item, #app").unwrap();
    /// assert!(sel.matches(&ElementData::new("li").with_class("item")));
    /// assert!(sel.matches(&ElementData::new("div").with_id("app")));
    /// assert!(!sel.matches(&ElementData::new("li")));
    /// ```
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        for group in selector.split(',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_compound(group)?);
        }
        Ok(Self { alternatives })
    }

    /// Whether the element data matches any alternative of this selector.
    pub fn matches(&self, data: &ElementData) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(data))
    }
}

fn parse_compound(part: &str) -> Result<Compound, SelectorError> {
    let bytes = part.as_bytes();
    let mut i = 0_usize;
    let mut compound = Compound::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if compound.universal {
                    return Err(SelectorError::Unsupported(part.to_string()));
                }
                compound.universal = true;
                i += 1;
            }
            b'#' => {
                let Some((id, next)) = parse_ident(part, i + 1) else {
                    return Err(SelectorError::Unsupported(part.to_string()));
                };
                if compound.id.replace(id).is_some() {
                    return Err(SelectorError::Unsupported(part.to_string()));
                }
                i = next;
            }
            b'.' => {
                let Some((class, next)) = parse_ident(part, i + 1) else {
                    return Err(SelectorError::Unsupported(part.to_string()));
                };
                compound.classes.push(class);
                i = next;
            }
            _ => {
                // A bare ident is a tag name; it may only open the compound.
                if i != 0 {
                    return Err(SelectorError::Unsupported(part.to_string()));
                }
                let Some((tag, next)) = parse_ident(part, i) else {
                    return Err(SelectorError::Unsupported(part.to_string()));
                };
                compound.tag = Some(tag);
                i = next;
            }
        }
    }

    Ok(compound)
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
