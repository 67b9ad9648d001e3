// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, attached navigation state.

use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::{Axis, NavMode, NavProps, NodeFlags, NodeId, NodeKind};

/// The focus tree.
///
/// Nodes are held in a generational slot arena: a [`NodeId`] stays cheap to
/// copy and becomes stale (rather than dangling) when its node is removed.
/// Every accessor degrades to `None`/empty for stale identifiers; nothing in
/// this crate panics on a dead id.
///
/// The tree stores the host-provided navigation state the traversal engines
/// consume: flags, tab indices, per-axis container modes, root-space bounds,
/// per-axis active-element memory, content-host child order, and focus
/// delegation. It performs no layout and no rendering; hosts push root-space
/// rectangles into it after their own layout pass.
///
/// ## Example
///
/// ```rust
/// use keyway_tree::{NavProps, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, NavProps::default());
/// let button = tree.insert(Some(root), NavProps::default());
/// assert_eq!(tree.parent_of(button), Some(root));
/// ```
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
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) props: NavProps,
    /// Ordered input-capable items for a content host; replaces indexed
    /// child enumeration when present.
    pub(crate) content_order: Option<Vec<NodeId>>,
    /// Composite controls redirect navigation entry to this element.
    focus_delegate: Option<NodeId>,
    /// Active-element memory, one slot per linear axis (Tab, Ctrl+Tab).
    active: [Option<NodeId>; 2],
}

impl Node {
    fn new(generation: u32, props: NavProps) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            props,
            content_order: None,
            focus_delegate: None,
            active: [None, None],
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, props: NavProps) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, props));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, props)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// The removed ids become stale immediately; active-element slots and
    /// content orders referencing them invalidate lazily on access.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent` (or detach it into a new root).
    ///
    /// Returns whether the move was applied. A move that would place a node
    /// under itself or one of its own descendants creates a parent cycle and
    /// is refused, leaving the tree unchanged; so are moves of stale ids or
    /// moves under a stale parent. Parent chains therefore stay acyclic and
    /// every ancestor walk terminates.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return false;
            }
            let mut cur = Some(p);
            while let Some(ancestor) = cur {
                if ancestor == id {
                    return false;
                }
                cur = self.parent_of(ancestor);
            }
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.generation())
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_ref(id).and_then(|n| n.parent)
    }

    /// Get the indexed children of a node, or an empty slice if it is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_ref(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns the root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            cur = p;
        }
        Some(cur)
    }

    /// Full navigation properties of a live node.
    pub fn props(&self, id: NodeId) -> Option<&NavProps> {
        self.node_ref(id).map(|n| &n.props)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_ref(id).map(|n| n.props.flags)
    }

    /// Returns the structural kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_ref(id).map(|n| n.props.kind)
    }

    /// Returns the tab index of a live node.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.node_ref(id).map(|n| n.props.tab_index)
    }

    /// Returns the navigation mode of a live node for the given axis.
    pub fn nav_mode(&self, id: NodeId, axis: Axis) -> Option<NavMode> {
        self.node_ref(id).map(|n| match axis {
            Axis::Tab => n.props.tab_mode,
            Axis::CtrlTab => n.props.ctrl_tab_mode,
            Axis::Directional => n.props.directional_mode,
        })
    }

    /// Returns the root-space bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_ref(id).map(|n| n.props.bounds)
    }

    /// The rectangle used for directional scoring: the representative
    /// override if set, otherwise the plain bounds.
    pub fn representative_rect(&self, id: NodeId) -> Option<Rect> {
        self.node_ref(id)
            .map(|n| n.props.representative_bounds.unwrap_or(n.props.bounds))
    }

    /// Update node flags. No-op on stale ids.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.props.flags = flags;
        }
    }

    /// Update tab index. No-op on stale ids.
    pub fn set_tab_index(&mut self, id: NodeId, tab_index: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.props.tab_index = tab_index;
        }
    }

    /// Update root-space bounds. No-op on stale ids.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.props.bounds = bounds;
        }
    }

    /// Update the representative rectangle override. No-op on stale ids.
    pub fn set_representative_bounds(&mut self, id: NodeId, rect: Option<Rect>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.props.representative_bounds = rect;
        }
    }

    /// Set the navigation mode of a node for one axis.
    ///
    /// Returns whether the write was applied. [`NavMode::Once`] on
    /// [`Axis::Directional`] is invalid configuration and is rejected here,
    /// before it can ever reach the engines; writes to stale ids are also
    /// reported as not applied.
    pub fn set_nav_mode(&mut self, id: NodeId, axis: Axis, mode: NavMode) -> bool {
        if axis == Axis::Directional && mode == NavMode::Once {
            return false;
        }
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        match axis {
            Axis::Tab => n.props.tab_mode = mode,
            Axis::CtrlTab => n.props.ctrl_tab_mode = mode,
            Axis::Directional => n.props.directional_mode = mode,
        }
        true
    }

    /// Install the ordered content-item sequence for a content host, or clear
    /// it with `None`. Only meaningful on [`NodeKind::ContentHost`] nodes.
    pub fn set_content_order(&mut self, host: NodeId, order: Option<Vec<NodeId>>) {
        if let Some(n) = self.node_opt_mut(host) {
            n.content_order = order;
        }
    }

    /// Set or clear the focus-delegation target of a composite control.
    ///
    /// While a live delegate in the same root is set, the node reports the
    /// delegate as both its first and last navigable child, redirecting Tab
    /// entry to an internal default. The host owns this pointer and is
    /// expected to clear it when focus moves inside the composite.
    pub fn set_focus_delegate(&mut self, id: NodeId, delegate: Option<NodeId>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.focus_delegate = delegate;
        }
    }

    /// The validated focus-delegation target of `id`, if any.
    ///
    /// Returns `None` when no delegate is set, when the delegate is stale, or
    /// when the delegate no longer lives in the same root tree as `id`.
    pub fn focus_delegate(&self, id: NodeId) -> Option<NodeId> {
        let delegate = self.node_ref(id)?.focus_delegate?;
        if !self.is_alive(delegate) || self.root_of(delegate) != self.root_of(id) {
            return None;
        }
        Some(delegate)
    }

    /// Remembered last-focused descendant of a group, per linear axis.
    ///
    /// The association is weak: the read invalidates (returns `None`) when
    /// the stored element is stale or its root differs from the group's root.
    /// [`Axis::Directional`] has no memory slot and always yields `None`.
    pub fn active_element(&self, group: NodeId, axis: Axis) -> Option<NodeId> {
        let slot = axis.memory_slot()?;
        let stored = self.node_ref(group)?.active[slot]?;
        if !self.is_alive(stored) || self.root_of(stored) != self.root_of(group) {
            return None;
        }
        Some(stored)
    }

    /// Record (or clear) the active element of a group for one linear axis.
    ///
    /// Returns whether the write was applied; writes on the directional axis
    /// or to stale ids are rejected.
    pub fn set_active_element(
        &mut self,
        group: NodeId,
        axis: Axis,
        element: Option<NodeId>,
    ) -> bool {
        let Some(slot) = axis.memory_slot() else {
            return false;
        };
        let Some(n) = self.node_opt_mut(group) else {
            return false;
        };
        n.active[slot] = element;
        true
    }

    // --- internals ---

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if !self.is_alive(parent) {
            return;
        }
        self.nodes[parent.idx()]
            .as_mut()
            .expect("live parent")
            .children
            .push(id);
        self.nodes[id.idx()].as_mut().expect("live child").parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.nodes.get_mut(parent.idx()).and_then(|n| n.as_mut()) {
            p.children.retain(|c| *c != id);
        }
        self.nodes[id.idx()].as_mut().expect("live child").parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NavProps::default());
        let a = tree.insert(Some(root), NavProps::default());

        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));

        let b = tree.insert(Some(root), NavProps::default());
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn accessors_respect_liveness() {
        let mut tree = Tree::new();
        let node = tree.insert(
            None,
            NavProps {
                tab_index: 7,
                ..NavProps::default()
            },
        );
        assert_eq!(tree.tab_index(node), Some(7));
        tree.remove(node);
        assert_eq!(tree.tab_index(node), None, "stale ids must return None");
        assert_eq!(tree.flags(node), None);
        assert!(tree.children_of(node).is_empty());
        assert_eq!(tree.root_of(node), None);
    }

    #[test]
    fn parent_and_root() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NavProps::default());
        let mid = tree.insert(Some(root), NavProps::default());
        let leaf = tree.insert(Some(mid), NavProps::default());

        assert_eq!(tree.parent_of(leaf), Some(mid));
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.root_of(leaf), Some(root));

        assert!(tree.reparent(mid, None));
        assert_eq!(tree.root_of(leaf), Some(mid));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut tree = Tree::new();
        let a = tree.insert(None, NavProps::default());
        let b = tree.insert(Some(a), NavProps::default());
        let c = tree.insert(Some(b), NavProps::default());

        assert!(!tree.reparent(a, Some(a)));
        assert!(!tree.reparent(a, Some(b)));
        assert!(!tree.reparent(a, Some(c)));
        // Refused moves leave the structure untouched.
        assert_eq!(tree.parent_of(b), Some(a));
        assert_eq!(tree.root_of(c), Some(a));

        assert!(tree.reparent(c, Some(a)));
        assert_eq!(tree.parent_of(c), Some(a));

        tree.remove(c);
        assert!(!tree.reparent(b, Some(c)), "stale parent must be refused");
        assert_eq!(tree.parent_of(b), Some(a));
    }

    #[test]
    fn set_nav_mode_rejects_once_directional() {
        let mut tree = Tree::new();
        let node = tree.insert(None, NavProps::default());

        assert!(tree.set_nav_mode(node, Axis::Tab, NavMode::Once));
        assert!(tree.set_nav_mode(node, Axis::CtrlTab, NavMode::Cycle));
        assert!(!tree.set_nav_mode(node, Axis::Directional, NavMode::Once));
        assert_eq!(tree.nav_mode(node, Axis::Tab), Some(NavMode::Once));
        assert_eq!(
            tree.nav_mode(node, Axis::Directional),
            Some(NavMode::Continue),
            "rejected write must leave state unchanged"
        );

        tree.remove(node);
        assert!(!tree.set_nav_mode(node, Axis::Tab, NavMode::Cycle));
    }

    #[test]
    fn active_element_invalidates_on_removal() {
        let mut tree = Tree::new();
        let group = tree.insert(None, NavProps::default());
        let child = tree.insert(Some(group), NavProps::default());

        assert!(tree.set_active_element(group, Axis::Tab, Some(child)));
        assert_eq!(tree.active_element(group, Axis::Tab), Some(child));
        assert_eq!(tree.active_element(group, Axis::CtrlTab), None);

        tree.remove(child);
        assert_eq!(
            tree.active_element(group, Axis::Tab),
            None,
            "stale active element must read as unset"
        );
    }

    #[test]
    fn active_element_invalidates_across_roots() {
        let mut tree = Tree::new();
        let group = tree.insert(None, NavProps::default());
        let child = tree.insert(Some(group), NavProps::default());

        tree.set_active_element(group, Axis::Tab, Some(child));
        assert_eq!(tree.active_element(group, Axis::Tab), Some(child));

        // Moving the remembered element into a different root tree breaks
        // the weak association on the next read.
        assert!(tree.reparent(child, None));
        assert_eq!(tree.active_element(group, Axis::Tab), None);
    }

    #[test]
    fn directional_axis_has_no_memory() {
        let mut tree = Tree::new();
        let group = tree.insert(None, NavProps::default());
        let child = tree.insert(Some(group), NavProps::default());
        assert!(!tree.set_active_element(group, Axis::Directional, Some(child)));
        assert_eq!(tree.active_element(group, Axis::Directional), None);
    }

    #[test]
    fn focus_delegate_validation() {
        let mut tree = Tree::new();
        let composite = tree.insert(None, NavProps::default());
        let inner = tree.insert(Some(composite), NavProps::default());
        let foreign = tree.insert(None, NavProps::default());

        tree.set_focus_delegate(composite, Some(inner));
        assert_eq!(tree.focus_delegate(composite), Some(inner));

        // A delegate in a different root tree is ignored.
        tree.set_focus_delegate(composite, Some(foreign));
        assert_eq!(tree.focus_delegate(composite), None);

        tree.set_focus_delegate(composite, Some(inner));
        tree.remove(inner);
        assert_eq!(tree.focus_delegate(composite), None);
    }

    #[test]
    fn content_order_is_stored_per_host() {
        let mut tree = Tree::new();
        let host = tree.insert(
            None,
            NavProps {
                kind: NodeKind::ContentHost,
                ..NavProps::default()
            },
        );
        let a = tree.insert(Some(host), NavProps::default());
        let b = tree.insert(Some(host), NavProps::default());

        tree.set_content_order(host, Some(vec![b, a]));
        // Indexed children keep insertion order; the walker consumes the
        // content order instead (see walk.rs tests).
        assert_eq!(tree.children_of(host), &[a, b]);
    }
}
