// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eligibility predicates.
//!
//! Pure reads of a node's navigation state. Both engines only ever stop on
//! nodes satisfying [`is_tab_stop_or_group`]; the distinction between a stop
//! and a group decides whether a candidate is returned directly or descended
//! into.

use keyway_tree::{Axis, NavMode, NodeFlags, NodeId, Tree};

const TAB_STOP_FLAGS: NodeFlags = NodeFlags::FOCUSABLE
    .union(NodeFlags::ENABLED)
    .union(NodeFlags::VISIBLE)
    .union(NodeFlags::TAB_STOP);

const FOCUSABLE_FLAGS: NodeFlags = NodeFlags::FOCUSABLE
    .union(NodeFlags::ENABLED)
    .union(NodeFlags::VISIBLE);

/// Whether `id` can directly receive focus via linear navigation.
pub fn is_tab_stop(tree: &Tree, id: NodeId) -> bool {
    tree.flags(id).is_some_and(|f| f.contains(TAB_STOP_FLAGS))
}

/// Whether `id` can receive focus at all, ignoring the tab-stop flag.
///
/// This is the relaxed variant used for item-to-item arrow navigation in
/// list- and tree-like controls, where items are focusable without being
/// tab stops (see [`crate::CandidateFilter::Focusable`]).
pub fn is_focusable(tree: &Tree, id: NodeId) -> bool {
    tree.flags(id).is_some_and(|f| f.contains(FOCUSABLE_FLAGS))
}

/// Whether `id` is a group boundary on `axis`.
pub fn is_group(tree: &Tree, id: NodeId, axis: Axis) -> bool {
    tree.nav_mode(id, axis)
        .is_some_and(|m| m != NavMode::Continue)
}

/// Whether `id` is a tab stop or a group boundary on `axis`.
pub fn is_tab_stop_or_group(tree: &Tree, id: NodeId, axis: Axis) -> bool {
    is_tab_stop(tree, id) || is_group(tree, id, axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_tree::NavProps;

    #[test]
    fn tab_stop_requires_all_flags() {
        let mut tree = Tree::new();
        let node = tree.insert(None, NavProps::default());
        assert!(is_tab_stop(&tree, node));

        for missing in [
            NodeFlags::FOCUSABLE,
            NodeFlags::ENABLED,
            NodeFlags::VISIBLE,
            NodeFlags::TAB_STOP,
        ] {
            tree.set_flags(node, NodeFlags::default() - missing);
            assert!(!is_tab_stop(&tree, node));
        }

        // Dropping only the tab-stop flag keeps the node focusable.
        tree.set_flags(node, NodeFlags::default() - NodeFlags::TAB_STOP);
        assert!(is_focusable(&tree, node));
        tree.set_flags(node, NodeFlags::default() - NodeFlags::ENABLED);
        assert!(!is_focusable(&tree, node));
    }

    #[test]
    fn group_is_per_axis() {
        let mut tree = Tree::new();
        let node = tree.insert(None, NavProps::default());
        assert!(!is_group(&tree, node, Axis::Tab));

        tree.set_nav_mode(node, Axis::Tab, NavMode::Cycle);
        assert!(is_group(&tree, node, Axis::Tab));
        assert!(!is_group(&tree, node, Axis::CtrlTab));
        assert!(!is_group(&tree, node, Axis::Directional));
    }

    #[test]
    fn stale_ids_satisfy_nothing() {
        let mut tree = Tree::new();
        let node = tree.insert(None, NavProps::default());
        tree.remove(node);
        assert!(!is_tab_stop(&tree, node));
        assert!(!is_focusable(&tree, node));
        assert!(!is_group(&tree, node, Axis::Tab));
        assert!(!is_tab_stop_or_group(&tree, node, Axis::Tab));
    }
}
