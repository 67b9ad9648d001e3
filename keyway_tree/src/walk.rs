// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation-tree walking.
//!
//! The navigation tree is a filtered view of the structural tree: invisible
//! subtrees are pruned, [`NodeKind::Bridge`] nodes are transparent (their
//! children are spliced into the parent's child list), content hosts
//! enumerate their installed content order instead of their indexed
//! children, and composite controls with a focus delegate report the
//! delegate as their only child. The traversal engines are written entirely
//! against the five operations defined here.
//!
//! All operations return `None` for detached or stale nodes; none of them
//! panic.

use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId, NodeKind};

impl Tree {
    /// Returns whether `id` is a node of the navigation tree: alive, visible,
    /// and not an internal bridging node.
    pub fn in_nav_tree(&self, id: NodeId) -> bool {
        self.node_ref(id).is_some_and(|n| {
            n.props.flags.contains(NodeFlags::VISIBLE) && n.props.kind != NodeKind::Bridge
        })
    }

    /// Nearest ancestor of `id` that is in the navigation tree.
    pub fn nav_parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            if self.in_nav_tree(p) {
                return Some(p);
            }
            cur = self.parent_of(p);
        }
        None
    }

    /// First navigable child of `id`.
    ///
    /// A live focus delegate in the same root takes priority over child
    /// enumeration, letting composite controls redirect entry to an internal
    /// default.
    pub fn nav_first_child(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        if let Some(delegate) = self.focus_delegate(id) {
            return Some(delegate);
        }
        self.first_navigable(self.nav_child_slots(id))
    }

    /// Last navigable child of `id`. Mirror of [`Tree::nav_first_child`].
    pub fn nav_last_child(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        if let Some(delegate) = self.focus_delegate(id) {
            return Some(delegate);
        }
        self.last_navigable(self.nav_child_slots(id))
    }

    /// Next navigable sibling of `id`, crossing bridge boundaries as needed.
    pub fn nav_next_sibling(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = id;
        loop {
            let parent = self.parent_of(cur)?;
            let slots = self.nav_child_slots(parent);
            let pos = slots.iter().position(|&s| s == cur)?;
            if let Some(found) = self.first_navigable(&slots[pos + 1..]) {
                return Some(found);
            }
            // A navigable parent bounds the sibling list; a bridge parent's
            // own siblings continue it.
            if self.in_nav_tree(parent) {
                return None;
            }
            cur = parent;
        }
    }

    /// Previous navigable sibling of `id`. Mirror of
    /// [`Tree::nav_next_sibling`].
    pub fn nav_prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = id;
        loop {
            let parent = self.parent_of(cur)?;
            let slots = self.nav_child_slots(parent);
            let pos = slots.iter().position(|&s| s == cur)?;
            if let Some(found) = self.last_navigable(&slots[..pos]) {
                return Some(found);
            }
            if self.in_nav_tree(parent) {
                return None;
            }
            cur = parent;
        }
    }

    /// Child enumeration for `id`: the installed content order for a content
    /// host, the indexed children otherwise.
    fn nav_child_slots(&self, id: NodeId) -> &[NodeId] {
        match self.node_ref(id) {
            Some(n) if n.props.kind == NodeKind::ContentHost => n
                .content_order
                .as_deref()
                .unwrap_or(n.children.as_slice()),
            Some(n) => n.children.as_slice(),
            None => &[],
        }
    }

    /// Whether a child search should descend through `id` without yielding
    /// it: a visible bridging node.
    fn descends_through(&self, id: NodeId) -> bool {
        self.node_ref(id).is_some_and(|n| {
            n.props.flags.contains(NodeFlags::VISIBLE) && n.props.kind == NodeKind::Bridge
        })
    }

    fn first_navigable(&self, slots: &[NodeId]) -> Option<NodeId> {
        for &c in slots {
            if self.in_nav_tree(c) {
                return Some(c);
            }
            // Invisible subtrees are pruned; bridges are descended through.
            if self.descends_through(c)
                && let Some(found) = self.first_navigable(self.nav_child_slots(c))
            {
                return Some(found);
            }
        }
        None
    }

    fn last_navigable(&self, slots: &[NodeId]) -> Option<NodeId> {
        for &c in slots.iter().rev() {
            if self.in_nav_tree(c) {
                return Some(c);
            }
            if self.descends_through(c)
                && let Some(found) = self.last_navigable(self.nav_child_slots(c))
            {
                return Some(found);
            }
        }
        None
    }
}
