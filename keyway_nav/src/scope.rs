// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group scope resolution.
//!
//! Any node whose navigation mode on the relevant axis is not
//! [`keyway_tree::NavMode::Continue`] acts as a group boundary, partitioning
//! the tree into nested traversal scopes. The resolver finds the scope a
//! node belongs to.

use keyway_tree::{Axis, NodeId, Tree};

use crate::predicates::is_group;

/// Nearest group ancestor of `id` on `axis`.
///
/// Walks the navigation-tree parent chain from `id` (from `id` itself when
/// `include_current` is set) and returns the first group boundary found.
/// When no ancestor is a group, returns the root of the navigation tree
/// (the last node visited), so the result is always a usable container.
pub fn group_parent(tree: &Tree, id: NodeId, axis: Axis, include_current: bool) -> NodeId {
    let mut result = id;
    let mut cur = if include_current {
        Some(id)
    } else {
        tree.nav_parent(id)
    };
    while let Some(e) = cur {
        if is_group(tree, e, axis) {
            return e;
        }
        result = e;
        cur = tree.nav_parent(e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_tree::{NavMode, NavProps};

    #[test]
    fn falls_back_to_root() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NavProps::default());
        let mid = tree.insert(Some(root), NavProps::default());
        let leaf = tree.insert(Some(mid), NavProps::default());

        assert_eq!(group_parent(&tree, leaf, Axis::Tab, false), root);
        assert_eq!(group_parent(&tree, root, Axis::Tab, false), root);
    }

    #[test]
    fn finds_nearest_group_per_axis() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NavProps::default());
        let outer = tree.insert(Some(root), NavProps::default());
        let inner = tree.insert(Some(outer), NavProps::default());
        let leaf = tree.insert(Some(inner), NavProps::default());

        tree.set_nav_mode(outer, Axis::Tab, NavMode::Cycle);
        tree.set_nav_mode(inner, Axis::CtrlTab, NavMode::Contained);

        assert_eq!(group_parent(&tree, leaf, Axis::Tab, false), outer);
        assert_eq!(group_parent(&tree, leaf, Axis::CtrlTab, false), inner);
        assert_eq!(group_parent(&tree, leaf, Axis::Directional, false), root);
    }

    #[test]
    fn malformed_reparent_cannot_trap_the_walk() {
        let mut tree = Tree::new();
        let a = tree.insert(None, NavProps::default());
        let b = tree.insert(Some(a), NavProps::default());
        tree.set_nav_mode(a, Axis::Tab, NavMode::Cycle);
        tree.set_nav_mode(b, Axis::Tab, NavMode::Cycle);

        // Moving a node under its own descendant would make each group the
        // other's parent; the tree refuses it, so the ancestor walk still
        // terminates with the true scope.
        assert!(!tree.reparent(a, Some(b)));
        assert_eq!(group_parent(&tree, b, Axis::Tab, false), a);
        assert_eq!(group_parent(&tree, a, Axis::Tab, false), a);
    }

    #[test]
    fn include_current_starts_at_the_node() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NavProps::default());
        let group = tree.insert(Some(root), NavProps::default());
        tree.set_nav_mode(group, Axis::Tab, NavMode::Once);

        assert_eq!(group_parent(&tree, group, Axis::Tab, true), group);
        assert_eq!(group_parent(&tree, group, Axis::Tab, false), root);
    }
}
