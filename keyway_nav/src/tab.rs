// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear (Tab / Ctrl+Tab) traversal.
//!
//! Ordering inside a group is by tab index first, document order second.
//! Elements keeping the default index (`i32::MAX`) therefore follow every
//! explicitly indexed element, in document order among themselves. Nested
//! groups are opaque during a scan: the scan stops on the group node itself
//! and the engine recurses into it as a separate step.
//!
//! Both entry points return `None` when the traversal runs off the end of
//! the outermost scope. Wrap-around is a policy decision left to
//! [`crate::Navigator`].

use keyway_tree::{Axis, NavMode, NodeId, Tree};

use crate::predicates::{is_group, is_tab_stop, is_tab_stop_or_group};
use crate::scope::group_parent;

fn tab_index(tree: &Tree, id: NodeId) -> i32 {
    tree.tab_index(id).unwrap_or(i32::MAX)
}

fn container_mode(tree: &Tree, container: NodeId, axis: Axis) -> NavMode {
    tree.nav_mode(container, axis).unwrap_or(NavMode::Continue)
}

/// Depth-first successor of `e` within `container`, treating nested groups
/// as opaque leaves. Also the subtree enumeration of the directional engine.
pub(crate) fn next_in_tree(
    tree: &Tree,
    e: NodeId,
    container: NodeId,
    axis: Axis,
) -> Option<NodeId> {
    if e == container || !is_group(tree, e, axis) {
        if let Some(child) = tree.nav_first_child(e) {
            return Some(child);
        }
    }
    if e == container {
        return None;
    }
    let mut cur = e;
    loop {
        if let Some(sibling) = tree.nav_next_sibling(cur) {
            return Some(sibling);
        }
        match tree.nav_parent(cur) {
            Some(parent) if parent != container => cur = parent,
            _ => return None,
        }
    }
}

/// Depth-first predecessor of `e` within `container`, treating nested
/// groups as opaque leaves.
fn prev_in_tree(tree: &Tree, e: NodeId, container: NodeId, axis: Axis) -> Option<NodeId> {
    if e == container {
        return None;
    }
    match tree.nav_prev_sibling(e) {
        Some(sibling) if is_group(tree, sibling, axis) => Some(sibling),
        Some(sibling) => Some(last_in_tree(tree, sibling, axis)),
        None => tree.nav_parent(e),
    }
}

/// Deepest last descendant of `container`, stopping on a nested group.
fn last_in_tree(tree: &Tree, container: NodeId, axis: Axis) -> NodeId {
    let mut result = container;
    let mut cur = tree.nav_last_child(container);
    while let Some(c) = cur {
        if is_group(tree, c, axis) {
            return c;
        }
        result = c;
        cur = tree.nav_last_child(c);
    }
    result
}

/// First stop or nested group of `container`: minimum tab index, earliest
/// in document order among equals.
fn first_tab_in_group(tree: &Tree, container: NodeId, axis: Axis) -> Option<NodeId> {
    let mut first = None;
    let mut min_index = 0;
    let mut cur = next_in_tree(tree, container, container, axis);
    while let Some(c) = cur {
        if is_tab_stop_or_group(tree, c, axis) {
            let priority = tab_index(tree, c);
            if first.is_none() || priority < min_index {
                min_index = priority;
                first = Some(c);
            }
        }
        cur = next_in_tree(tree, c, container, axis);
    }
    first
}

/// Last stop or nested group of `container`: maximum tab index, latest in
/// document order among equals.
fn last_tab_in_group(tree: &Tree, container: NodeId, axis: Axis) -> Option<NodeId> {
    let mut last = None;
    let mut max_index = 0;
    let mut cur = Some(last_in_tree(tree, container, axis));
    while let Some(c) = cur {
        if c == container {
            break;
        }
        if is_tab_stop_or_group(tree, c, axis) {
            let priority = tab_index(tree, c);
            if last.is_none() || priority > max_index {
                max_index = priority;
                last = Some(c);
            }
        }
        cur = prev_in_tree(tree, c, container, axis);
    }
    last
}

/// Next stop or group after `e` in document order with the same tab index.
fn next_tab_with_same_index(
    tree: &Tree,
    e: NodeId,
    container: NodeId,
    axis: Axis,
) -> Option<NodeId> {
    let priority = tab_index(tree, e);
    let mut cur = next_in_tree(tree, e, container, axis);
    while let Some(c) = cur {
        if is_tab_stop_or_group(tree, c, axis) && tab_index(tree, c) == priority {
            return Some(c);
        }
        cur = next_in_tree(tree, c, container, axis);
    }
    None
}

/// First stop or group holding the smallest tab index strictly greater
/// than that of `e`. Under `Cycle` a miss wraps to the group's first stop.
fn next_tab_with_next_index(
    tree: &Tree,
    e: NodeId,
    container: NodeId,
    axis: Axis,
    mode: NavMode,
) -> Option<NodeId> {
    let priority = tab_index(tree, e);
    let mut next = None;
    let mut min_index = 0;
    let mut first = None;
    let mut min_index_first = 0;
    let mut cur = next_in_tree(tree, container, container, axis);
    while let Some(c) = cur {
        if is_tab_stop_or_group(tree, c, axis) {
            let p = tab_index(tree, c);
            if p > priority && (next.is_none() || p < min_index) {
                min_index = p;
                next = Some(c);
            }
            if first.is_none() || p < min_index_first {
                min_index_first = p;
                first = Some(c);
            }
        }
        cur = next_in_tree(tree, c, container, axis);
    }
    if mode == NavMode::Cycle && next.is_none() {
        next = first;
    }
    next
}

/// Last stop or group holding the largest tab index strictly less than
/// that of `e`. Under `Cycle` a miss wraps to the group's last stop.
fn prev_tab_with_prev_index(
    tree: &Tree,
    e: NodeId,
    container: NodeId,
    axis: Axis,
    mode: NavMode,
) -> Option<NodeId> {
    let priority = tab_index(tree, e);
    let mut prev = None;
    let mut max_index = 0;
    let mut last = None;
    let mut max_index_last = 0;
    let mut cur = Some(last_in_tree(tree, container, axis));
    while let Some(c) = cur {
        if c != container && is_tab_stop_or_group(tree, c, axis) {
            let p = tab_index(tree, c);
            if p < priority && (prev.is_none() || p > max_index) {
                max_index = p;
                prev = Some(c);
            }
            if last.is_none() || p > max_index_last {
                max_index_last = p;
                last = Some(c);
            }
        }
        cur = prev_in_tree(tree, c, container, axis);
    }
    if mode == NavMode::Cycle && prev.is_none() {
        prev = last;
    }
    prev
}

/// Previous stop or group before `e` in document order with the same tab
/// index.
fn prev_tab_with_same_index(
    tree: &Tree,
    e: NodeId,
    container: NodeId,
    axis: Axis,
) -> Option<NodeId> {
    let priority = tab_index(tree, e);
    let mut cur = prev_in_tree(tree, e, container, axis);
    while let Some(c) = cur {
        if c != container && is_tab_stop_or_group(tree, c, axis) && tab_index(tree, c) == priority {
            return Some(c);
        }
        cur = prev_in_tree(tree, c, container, axis);
    }
    None
}

/// One forward step inside `container`, without recursing into the result
/// when it is a nested group. `e == None` asks for the group's first stop.
fn next_tab_in_group(
    tree: &Tree,
    e: Option<NodeId>,
    container: NodeId,
    axis: Axis,
    mode: NavMode,
) -> Option<NodeId> {
    if mode == NavMode::None {
        return None;
    }
    let e = match e {
        None => return first_tab_in_group(tree, container, axis),
        Some(e) if e == container => return first_tab_in_group(tree, container, axis),
        Some(e) => e,
    };
    // Once suppresses stepping between interior elements; entry is fine.
    if mode == NavMode::Once {
        return None;
    }
    next_tab_with_same_index(tree, e, container, axis)
        .or_else(|| next_tab_with_next_index(tree, e, container, axis, mode))
}

/// One backward step inside `container`. `e == None` asks for the group's
/// last stop.
fn prev_tab_in_group(
    tree: &Tree,
    e: Option<NodeId>,
    container: NodeId,
    axis: Axis,
    mode: NavMode,
) -> Option<NodeId> {
    if mode == NavMode::None {
        return None;
    }
    let e = match e {
        None => return last_tab_in_group(tree, container, axis),
        Some(e) => e,
    };
    if mode == NavMode::Once || e == container {
        return None;
    }
    prev_tab_with_same_index(tree, e, container, axis)
        .or_else(|| prev_tab_with_prev_index(tree, e, container, axis, mode))
}

/// Next tab stop after `from` within (and possibly beyond) `container`.
///
/// `from == None` requests entry into `container`: the container itself if
/// it is a stop, then its remembered active element, then its first stop.
/// With `go_down_only` set the search never escalates above `container`.
///
/// Returns `None` when the traversal falls off the end of the outermost
/// scope, or when a `Contained`/`None` boundary blocks it.
pub fn next_tab_stop(
    tree: &Tree,
    from: Option<NodeId>,
    container: NodeId,
    axis: Axis,
    go_down_only: bool,
) -> Option<NodeId> {
    let mode = container_mode(tree, container, axis);
    match from {
        None => {
            if is_tab_stop(tree, container) {
                return Some(container);
            }
            if let Some(active) = tree.active_element(container, axis) {
                return next_tab_stop(tree, None, active, axis, true);
            }
        }
        Some(from) => {
            // Once and None only permit leaving; hand the step to the
            // enclosing scope.
            if matches!(mode, NavMode::Once | NavMode::None) && container != from {
                if go_down_only {
                    return None;
                }
                let parent = group_parent(tree, container, axis, false);
                return next_tab_stop(tree, Some(container), parent, axis, go_down_only);
            }
        }
    }

    let mut loop_start = None;
    let mut cur = from;
    let mut current_mode = mode;
    while let Some(candidate) = next_tab_in_group(tree, cur, container, axis, current_mode) {
        if is_tab_stop(tree, candidate) && !is_group(tree, candidate, axis) {
            return Some(candidate);
        }

        // A Cycle group keeps producing the same candidates forever.
        if loop_start == Some(candidate) {
            break;
        }
        if loop_start.is_none() {
            loop_start = Some(candidate);
        }

        // The candidate is a nested group; try to land inside it.
        if let Some(inside) = next_tab_stop(tree, None, candidate, axis, true) {
            return Some(inside);
        }
        if current_mode == NavMode::Once {
            current_mode = NavMode::Contained;
        }
        cur = Some(candidate);
    }

    // Escalation is gated on the container's declared mode; the demoted
    // working copy only drives the in-loop stepping.
    if !go_down_only && mode != NavMode::Contained && tree.nav_parent(container).is_some() {
        let parent = group_parent(tree, container, axis, false);
        return next_tab_stop(tree, Some(container), parent, axis, false);
    }
    None
}

/// Previous tab stop before `from`.
///
/// `container == None` resolves to the group scope of `from`. `from ==
/// None` requests entry into `container` from its far end, except for
/// `Once` groups, which are entered on their *first* stop in both
/// directions.
pub fn prev_tab_stop(
    tree: &Tree,
    from: Option<NodeId>,
    container: Option<NodeId>,
    axis: Axis,
    go_down_only: bool,
) -> Option<NodeId> {
    let container = match container {
        Some(c) => c,
        None => group_parent(tree, from?, axis, false),
    };
    let mode = container_mode(tree, container, axis);
    match from {
        None => {
            if let Some(active) = tree.active_element(container, axis) {
                return prev_tab_stop(tree, None, Some(active), axis, true);
            }
            if mode == NavMode::Once {
                // Backwards entry into a Once group still lands on its
                // first stop.
                return match next_tab_in_group(tree, None, container, axis, mode) {
                    Some(first) => Some(first),
                    None => {
                        if is_tab_stop(tree, container) {
                            return Some(container);
                        }
                        if go_down_only {
                            return None;
                        }
                        prev_tab_stop(tree, Some(container), None, axis, false)
                    }
                };
            }
        }
        Some(from_id) => {
            if matches!(mode, NavMode::Once | NavMode::None) {
                if go_down_only || container == from_id {
                    return None;
                }
                if is_tab_stop(tree, container) {
                    return Some(container);
                }
                return prev_tab_stop(tree, Some(container), None, axis, false);
            }
        }
    }

    let mut loop_start = None;
    let mut cur = from;
    while let Some(candidate) = prev_tab_in_group(tree, cur, container, axis, mode) {
        if candidate == container && mode == NavMode::Local {
            break;
        }
        if is_tab_stop(tree, candidate) && !is_group(tree, candidate, axis) {
            return Some(candidate);
        }
        if loop_start == Some(candidate) {
            break;
        }
        if loop_start.is_none() {
            loop_start = Some(candidate);
        }
        if let Some(inside) = prev_tab_stop(tree, None, Some(candidate), axis, true) {
            return Some(inside);
        }
        cur = Some(candidate);
    }

    if mode == NavMode::Contained {
        return None;
    }
    if from != Some(container) && is_tab_stop(tree, container) {
        return Some(container);
    }
    if !go_down_only && tree.nav_parent(container).is_some() {
        return prev_tab_stop(tree, Some(container), None, axis, false);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_tree::{NavProps, NodeFlags};

    fn container(tree: &mut Tree, parent: Option<NodeId>) -> NodeId {
        tree.insert(
            parent,
            NavProps {
                flags: NodeFlags::default() - NodeFlags::FOCUSABLE,
                ..NavProps::default()
            },
        )
    }

    fn group(tree: &mut Tree, parent: NodeId, mode: NavMode) -> NodeId {
        let g = container(tree, Some(parent));
        tree.set_nav_mode(g, Axis::Tab, mode);
        g
    }

    fn stop(tree: &mut Tree, parent: NodeId) -> NodeId {
        tree.insert(Some(parent), NavProps::default())
    }

    fn stop_at(tree: &mut Tree, parent: NodeId, index: i32) -> NodeId {
        tree.insert(
            Some(parent),
            NavProps {
                tab_index: index,
                ..NavProps::default()
            },
        )
    }

    fn next(tree: &Tree, e: NodeId) -> Option<NodeId> {
        next_tab_stop(
            tree,
            Some(e),
            group_parent(tree, e, Axis::Tab, false),
            Axis::Tab,
            false,
        )
    }

    fn prev(tree: &Tree, e: NodeId) -> Option<NodeId> {
        prev_tab_stop(tree, Some(e), None, Axis::Tab, false)
    }

    #[test]
    fn document_order_when_indices_tie() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let a = stop(&mut tree, root);
        let b = stop(&mut tree, root);
        let c = stop(&mut tree, root);

        assert_eq!(next(&tree, a), Some(b));
        assert_eq!(next(&tree, b), Some(c));
        assert_eq!(next(&tree, c), None);
        assert_eq!(prev(&tree, c), Some(b));
        assert_eq!(prev(&tree, b), Some(a));
        assert_eq!(prev(&tree, a), None);
    }

    #[test]
    fn explicit_indices_override_document_order() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let third = stop_at(&mut tree, root, 3);
        let first = stop_at(&mut tree, root, 1);
        let second = stop_at(&mut tree, root, 2);
        let last = stop(&mut tree, root);

        assert_eq!(
            next_tab_stop(&tree, None, root, Axis::Tab, true),
            Some(first)
        );
        assert_eq!(next(&tree, first), Some(second));
        assert_eq!(next(&tree, second), Some(third));
        // The default index is i32::MAX, so unindexed stops come last.
        assert_eq!(next(&tree, third), Some(last));
        assert_eq!(prev(&tree, last), Some(third));
        assert_eq!(prev(&tree, first), None);
    }

    #[test]
    fn continue_scope_spans_nested_containers() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let left = container(&mut tree, Some(root));
        let right = container(&mut tree, Some(root));
        let a = stop(&mut tree, left);
        let b = stop(&mut tree, left);
        let c = stop(&mut tree, right);

        assert_eq!(next(&tree, b), Some(c));
        assert_eq!(prev(&tree, c), Some(b));
        assert_eq!(next(&tree, a), Some(b));
    }

    #[test]
    fn cycle_group_wraps_both_ways() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let cycle = group(&mut tree, root, NavMode::Cycle);
        let a = stop(&mut tree, cycle);
        let b = stop(&mut tree, cycle);
        let c = stop(&mut tree, cycle);
        let _outside = stop(&mut tree, root);

        assert_eq!(next(&tree, c), Some(a));
        assert_eq!(prev(&tree, a), Some(c));
        assert_eq!(next(&tree, b), Some(c));
    }

    #[test]
    fn contained_group_blocks_at_its_edges() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let contained = group(&mut tree, root, NavMode::Contained);
        let a = stop(&mut tree, contained);
        let b = stop(&mut tree, contained);
        let _outside = stop(&mut tree, root);

        assert_eq!(next(&tree, b), None);
        assert_eq!(prev(&tree, a), None);
        assert_eq!(next(&tree, a), Some(b));
    }

    #[test]
    fn once_group_is_a_single_stop() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let before = stop(&mut tree, root);
        let once = group(&mut tree, root, NavMode::Once);
        let first = stop(&mut tree, once);
        let second = stop(&mut tree, once);
        let after = stop(&mut tree, root);

        // Entering from either side lands on the first stop.
        assert_eq!(next(&tree, before), Some(first));
        assert_eq!(prev(&tree, after), Some(first));
        // The next step leaves the group entirely.
        assert_eq!(next(&tree, first), Some(after));
        assert_eq!(next(&tree, second), Some(after));
        assert_eq!(prev(&tree, first), Some(before));
    }

    #[test]
    fn none_group_is_skipped_and_escaped() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let before = stop(&mut tree, root);
        let none = group(&mut tree, root, NavMode::None);
        let inner = stop(&mut tree, none);
        let after = stop(&mut tree, root);

        assert_eq!(next(&tree, before), Some(after));
        assert_eq!(prev(&tree, after), Some(before));
        // Focus trapped inside (e.g. set programmatically) can still leave.
        assert_eq!(next(&tree, inner), Some(after));
        assert_eq!(prev(&tree, inner), Some(before));
    }

    #[test]
    fn local_group_keeps_indices_local() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let first = stop_at(&mut tree, root, 1);
        let local = group(&mut tree, root, NavMode::Local);
        tree.set_tab_index(local, 2);
        let inner_hi = stop_at(&mut tree, local, 100);
        let inner_lo = stop_at(&mut tree, local, 5);
        let third = stop_at(&mut tree, root, 3);

        // Outer scope orders the group by its own index; inner indices do
        // not leak out.
        assert_eq!(next(&tree, first), Some(inner_lo));
        assert_eq!(next(&tree, inner_lo), Some(inner_hi));
        assert_eq!(next(&tree, inner_hi), Some(third));
        assert_eq!(prev(&tree, third), Some(inner_hi));
    }

    #[test]
    fn active_element_resumes_group_entry() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let before = stop(&mut tree, root);
        let cycle = group(&mut tree, root, NavMode::Cycle);
        let a = stop(&mut tree, cycle);
        let b = stop(&mut tree, cycle);

        assert_eq!(next(&tree, before), Some(a));
        assert!(tree.set_active_element(cycle, Axis::Tab, Some(b)));
        assert_eq!(next(&tree, before), Some(b));
    }

    #[test]
    fn focusable_group_node_is_its_own_stop() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let before = stop(&mut tree, root);
        let once = group(&mut tree, root, NavMode::Once);
        tree.set_flags(once, NodeFlags::default());
        let inner = stop(&mut tree, once);
        let after = stop(&mut tree, root);

        // A focusable container takes focus itself on entry.
        assert_eq!(next(&tree, before), Some(once));
        assert_eq!(next(&tree, inner), Some(after));
        // Backing out of the group delegates to the container stop.
        assert_eq!(prev(&tree, inner), Some(once));
    }

    #[test]
    fn empty_once_group_is_transparent() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let before = stop(&mut tree, root);
        let _once = group(&mut tree, root, NavMode::Once);
        let after = stop(&mut tree, root);

        assert_eq!(next(&tree, before), Some(after));
        assert_eq!(prev(&tree, after), Some(before));
    }

    #[test]
    fn once_entry_falls_through_an_empty_subgroup() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let once = group(&mut tree, root, NavMode::Once);
        let _empty = group(&mut tree, once, NavMode::Cycle);
        let after = stop(&mut tree, root);

        // The only candidate inside the Once group yields nothing, so entry
        // continues to the stop after the group.
        assert_eq!(next_tab_stop(&tree, None, once, Axis::Tab, false), Some(after));
    }

    #[test]
    fn disabled_and_hidden_stops_are_skipped() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let a = stop(&mut tree, root);
        let disabled = stop(&mut tree, root);
        tree.set_flags(disabled, NodeFlags::default() - NodeFlags::ENABLED);
        let hidden = stop(&mut tree, root);
        tree.set_flags(hidden, NodeFlags::default() - NodeFlags::VISIBLE);
        let b = stop(&mut tree, root);

        assert_eq!(next(&tree, a), Some(b));
        assert_eq!(prev(&tree, b), Some(a));
    }

    #[test]
    fn ctrl_tab_axis_uses_its_own_modes() {
        let mut tree = Tree::new();
        let root = container(&mut tree, None);
        let pane = group(&mut tree, root, NavMode::Contained);
        tree.set_nav_mode(pane, Axis::CtrlTab, NavMode::Continue);
        let a = stop(&mut tree, pane);
        let b = stop(&mut tree, pane);
        let outside = stop(&mut tree, root);

        // Tab is trapped; Ctrl+Tab sails through.
        assert_eq!(next(&tree, b), None);
        let ctrl_next = next_tab_stop(
            &tree,
            Some(b),
            group_parent(&tree, b, Axis::CtrlTab, false),
            Axis::CtrlTab,
            false,
        );
        assert_eq!(ctrl_next, Some(outside));
        assert_eq!(
            next_tab_stop(
                &tree,
                Some(a),
                group_parent(&tree, a, Axis::CtrlTab, false),
                Axis::CtrlTab,
                false
            ),
            Some(b)
        );
    }
}
