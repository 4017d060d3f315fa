// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;

use crate::selector::{Selector, SelectorError};
use crate::types::{ElementData, NodeId};

struct Node {
    data: ElementData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Element tree with stable generational handles.
///
/// Nodes live in slots; removing a node frees its slot for reuse and bumps
/// the slot's generation, so a stale [`NodeId`] never resolves to the new
/// occupant. Structure changes take effect immediately (there is no commit
/// step — the tree carries no derived world-space state).
///
/// ## Example
///
/// ```rust
/// use trellis_node_tree::{ElementData, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, ElementData::new("ul"));
/// let item = tree.insert(Some(root), ElementData::new("li").with_class("item"));
///
/// assert_eq!(tree.parent_of(item), Some(root));
/// assert_eq!(tree.select(root, ".item").unwrap(), vec![item]);
///
/// tree.remove(item);
/// assert!(!tree.contains(item));
/// ```
#[derive(Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root when `parent` is `None` or
    /// no longer alive). Returns a stable handle.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Slot indices are intentionally 32-bit; trees this large are out of scope."
    )]
    pub fn insert(&mut self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        let parent = parent.filter(|p| self.contains(*p));
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] += 1;
            idx
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            self.nodes.len() - 1
        };
        let id = NodeId::new(idx as u32, self.generations[idx]);
        self.nodes[idx] = Some(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent
            && let Some(parent_node) = self.node_mut(p)
        {
            parent_node.children.push(id);
        }
        id
    }

    /// Remove a node and its whole subtree. Stale ids are ignored.
    pub fn remove(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        if let Some(parent) = self.parent_of(node)
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|c| *c != node);
        }
        let mut stack = alloc::vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes[id.idx()].take() {
                stack.extend(n.children);
                self.free_list.push(id.idx());
            }
        }
    }

    /// Whether `node` is alive in this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parent of a live node, `None` for roots and stale ids.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Children of a live node in insertion order; empty for stale ids.
    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| &n.children)
    }

    /// Element data of a live node.
    pub fn data(&self, node: NodeId) -> Option<&ElementData> {
        self.node(node).map(|n| &n.data)
    }

    /// Mutable element data of a live node.
    pub fn data_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        self.node_mut(node).map(|n| &mut n.data)
    }

    /// Descendants of `node` in preorder (document order), excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children_of(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children_of(id).iter().rev());
        }
        out
    }

    /// Whether a live node matches the selector. Stale ids never match.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.data(node).is_some_and(|d| selector.matches(d))
    }

    /// Matching descendants of `root` in document order, excluding `root`.
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    /// Parse `selector` and return the matching descendants of `root`.
    pub fn select(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_all(root, &selector))
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if self.generations[id.idx()] != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.generations.get(id.idx()).copied() != Some(id.1) {
            return None;
        }
        self.nodes.get_mut(id.idx())?.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> (Tree, NodeId, NodeId, NodeId, NodeId) {
        // ul > (li.item > span, li.item.selected)
        let mut tree = Tree::new();
        let list = tree.insert(None, ElementData::new("ul"));
        let first = tree.insert(Some(list), ElementData::new("li").with_class("item"));
        let label = tree.insert(Some(first), ElementData::new("span"));
        let second = tree.insert(
            Some(list),
            ElementData::new("li").with_class("item").with_class("selected"),
        );
        (tree, list, first, label, second)
    }

    #[test]
    fn insert_links_parent_and_children() {
        let (tree, list, first, label, second) = sample();
        assert_eq!(tree.parent_of(first), Some(list));
        assert_eq!(tree.parent_of(label), Some(first));
        assert_eq!(tree.parent_of(list), None);
        assert_eq!(tree.children_of(list), &[first, second]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn descendants_are_preorder_and_exclude_root() {
        let (tree, list, first, label, second) = sample();
        assert_eq!(tree.descendants(list), vec![first, label, second]);
        assert_eq!(tree.descendants(label), Vec::new());
    }

    #[test]
    fn query_excludes_root_even_when_it_matches() {
        let mut tree = Tree::new();
        let outer = tree.insert(None, ElementData::new("div").with_class("box"));
        let inner = tree.insert(Some(outer), ElementData::new("div").with_class("box"));
        assert_eq!(tree.select(outer, ".box").unwrap(), vec![inner]);
    }

    #[test]
    fn select_filters_by_selector_in_document_order() {
        let (tree, list, first, _label, second) = sample();
        assert_eq!(tree.select(list, ".item").unwrap(), vec![first, second]);
        assert_eq!(tree.select(list, "li.selected").unwrap(), vec![second]);
        assert_eq!(tree.select(list, "span").unwrap(), vec![tree.children_of(first)[0]]);
        assert_eq!(tree.select(list, "#missing").unwrap(), Vec::new());
    }

    #[test]
    fn select_surfaces_parse_errors() {
        let (tree, list, ..) = sample();
        assert!(tree.select(list, "ul li").is_err());
    }

    #[test]
    fn remove_prunes_subtree_and_unlinks_parent() {
        let (mut tree, list, first, label, second) = sample();
        tree.remove(first);
        assert!(!tree.contains(first));
        assert!(!tree.contains(label));
        assert!(tree.contains(second));
        assert_eq!(tree.children_of(list), &[second]);
        assert_eq!(tree.descendants(list), vec![second]);
    }

    #[test]
    fn stale_ids_never_resolve_after_slot_reuse() {
        let (mut tree, list, first, label, _second) = sample();
        tree.remove(first);
        let replacement = tree.insert(Some(list), ElementData::new("li"));
        assert!(!tree.contains(first));
        assert!(!tree.contains(label));
        assert!(tree.contains(replacement));
        assert_eq!(tree.data(first), None);
        assert_eq!(tree.parent_of(first), None);
        assert_eq!(tree.children_of(first), &[]);
    }

    #[test]
    fn insert_under_stale_parent_creates_a_root() {
        let (mut tree, _list, first, ..) = sample();
        tree.remove(first);
        let orphan = tree.insert(Some(first), ElementData::new("li"));
        assert_eq!(tree.parent_of(orphan), None);
    }

    #[test]
    fn data_mut_updates_matching() {
        let (mut tree, list, first, ..) = sample();
        tree.data_mut(first).unwrap().classes.push("selected".into());
        assert_eq!(tree.select(list, ".selected").unwrap().len(), 2);
    }
}
