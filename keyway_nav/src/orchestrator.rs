// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation orchestrator.
//!
//! [`Navigator`] turns decoded key presses into traversal requests, runs
//! them against the linear and directional engines, and owns the policy
//! the engines deliberately leave out: wrap-around at the outermost scope,
//! handoff across foreign input-sink boundaries, active-element
//! bookkeeping, and baseline lifetime.

use bitflags::bitflags;
use smallvec::SmallVec;

use keyway_tree::{Axis, NodeFlags, NodeId, Tree};

use crate::directional::{CandidateFilter, Direction, DirectionalEngine};
use crate::predicates::is_group;
use crate::scope::group_parent;
use crate::tab::{next_tab_stop, prev_tab_stop};

/// A navigation key, already decoded by the host's input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Tab / Shift+Tab / Ctrl+Tab.
    Tab,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
}

bitflags! {
    /// Modifier keys held during a navigation key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Reverses linear traversal.
        const SHIFT = 1;
        /// Selects the Ctrl+Tab axis instead of the Tab axis.
        const CTRL = 2;
    }
}

/// Where a traversal request wants focus to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalDirection {
    /// Forward in tab order.
    Next,
    /// Backward in tab order.
    Previous,
    /// First stop of the whole tree.
    First,
    /// Last stop of the whole tree.
    Last,
    /// Spatially left.
    Left,
    /// Spatially right.
    Right,
    /// Spatially up.
    Up,
    /// Spatially down.
    Down,
}

impl TraversalDirection {
    const fn as_compass(self) -> Option<Direction> {
        match self {
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            _ => None,
        }
    }

    const fn is_linear(self) -> bool {
        matches!(self, Self::Next | Self::Previous | Self::First | Self::Last)
    }
}

/// A traversal request.
///
/// `wrapped` marks a request that already wrapped around the outermost
/// scope (or entered a foreign tree from its far side); such requests are
/// never handed off or wrapped again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalRequest {
    /// Requested movement.
    pub direction: TraversalDirection,
    /// Whether this request is already the result of a wrap.
    pub wrapped: bool,
}

impl TraversalRequest {
    /// A fresh, unwrapped request.
    pub const fn new(direction: TraversalDirection) -> Self {
        Self {
            direction,
            wrapped: false,
        }
    }
}

/// Outcome of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavResponse {
    /// Focus should move to this node.
    Moved(NodeId),
    /// A foreign sink accepted the request; focus left this tree.
    HandedOff,
    /// Nothing to do; the host should leave the key unhandled.
    Unchanged,
}

/// Host-side boundary to foreign keyboard input sinks.
///
/// Both methods return whether the foreign side accepted and consumed the
/// request. The default implementations decline everything.
pub trait SinkHost {
    /// Asks the sink behind `node` to take focus.
    fn tab_into(&mut self, node: NodeId, request: TraversalRequest) -> bool {
        let _ = (node, request);
        false
    }

    /// Reports that the traversal ran off the edge of the tree, offering
    /// focus to whatever surrounds it.
    fn on_no_more_tab_stops(&mut self, request: TraversalRequest) -> bool {
        let _ = request;
        false
    }
}

impl SinkHost for () {}

/// Host-side notifications raised on successful moves.
pub trait NavObserver {
    /// Focus moved via the keyboard; the host may want to show a focus
    /// cue on `node`.
    fn focus_visual(&mut self, node: NodeId) {
        let _ = node;
    }

    /// Focus left a nested group scope and landed directly in the root
    /// scope.
    fn focus_entered_root(&mut self, node: NodeId) {
        let _ = node;
    }
}

impl NavObserver for () {}

/// Per-focus-scope navigation session.
///
/// Owns the directional engine (and with it the baseline memory). Hosts
/// construct one per focus-scope root and keep it alive across key
/// presses; see [`Navigator::notify_focus_changed`] and
/// [`Navigator::notify_layout_changed`] for the state it expects to be
/// told about.
#[derive(Debug, Default)]
pub struct Navigator {
    directional: DirectionalEngine,
    filter: CandidateFilter,
}

impl Navigator {
    /// A navigator stepping between full tab stops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the directional candidate filter.
    pub fn set_candidate_filter(&mut self, filter: CandidateFilter) {
        self.filter = filter;
    }

    /// Handles a decoded navigation key press on the currently focused
    /// node.
    pub fn handle_key(
        &mut self,
        tree: &mut Tree,
        focused: NodeId,
        key: Key,
        mods: Modifiers,
        sinks: &mut impl SinkHost,
        observer: &mut impl NavObserver,
    ) -> NavResponse {
        let (direction, axis) = match key {
            Key::Tab => {
                let direction = if mods.contains(Modifiers::SHIFT) {
                    TraversalDirection::Previous
                } else {
                    TraversalDirection::Next
                };
                let axis = if mods.contains(Modifiers::CTRL) {
                    Axis::CtrlTab
                } else {
                    Axis::Tab
                };
                (direction, axis)
            }
            Key::Left => (TraversalDirection::Left, Axis::Directional),
            Key::Right => (TraversalDirection::Right, Axis::Directional),
            Key::Up => (TraversalDirection::Up, Axis::Directional),
            Key::Down => (TraversalDirection::Down, Axis::Directional),
        };
        self.navigate(
            tree,
            focused,
            TraversalRequest::new(direction),
            axis,
            sinks,
            observer,
        )
    }

    /// Runs one traversal request from `focused`.
    ///
    /// `axis` selects the linear axis for `Next`/`Previous`/`First`/`Last`
    /// requests and is ignored by the spatial directions.
    pub fn navigate(
        &mut self,
        tree: &mut Tree,
        focused: NodeId,
        request: TraversalRequest,
        axis: Axis,
        sinks: &mut impl SinkHost,
        observer: &mut impl NavObserver,
    ) -> NavResponse {
        let mut from = focused;
        let mut continuing = false;
        let mut refused: SmallVec<[NodeId; 4]> = SmallVec::new();
        loop {
            let Some(target) = self.compute(tree, from, request.direction, axis, continuing)
            else {
                if !request.wrapped
                    && !matches!(
                        request.direction,
                        TraversalDirection::First | TraversalDirection::Last
                    )
                {
                    if sinks.on_no_more_tab_stops(request) {
                        return NavResponse::HandedOff;
                    }
                    // Handoff declined: linear requests wrap around the
                    // outermost scope instead.
                    let wrap = match request.direction {
                        TraversalDirection::Next => Some(TraversalDirection::First),
                        TraversalDirection::Previous => Some(TraversalDirection::Last),
                        _ => None,
                    };
                    if let Some(direction) = wrap {
                        let wrapped = TraversalRequest {
                            direction,
                            wrapped: true,
                        };
                        return self.navigate(tree, focused, wrapped, axis, sinks, observer);
                    }
                }
                return NavResponse::Unchanged;
            };

            if tree
                .flags(target)
                .is_some_and(|f| f.contains(NodeFlags::INPUT_SINK))
            {
                let inner = TraversalRequest {
                    direction: entry_direction(request.direction),
                    wrapped: true,
                };
                if sinks.tab_into(target, inner) {
                    return NavResponse::HandedOff;
                }
                // Declined: keep scanning past the sink.
                if refused.contains(&target) {
                    return NavResponse::Unchanged;
                }
                refused.push(target);
                from = target;
                continuing = true;
                continue;
            }

            self.commit(tree, focused, target, request.direction, observer);
            return NavResponse::Moved(target);
        }
    }

    /// Tells the navigator that focus changed through some channel other
    /// than its own successful moves.
    pub fn notify_focus_changed(&mut self) {
        self.directional.reset_baselines();
    }

    /// Tells the navigator that layout ran and geometry may have moved.
    pub fn notify_layout_changed(&mut self) {
        self.directional.reset_baselines();
    }

    fn compute(
        &mut self,
        tree: &Tree,
        from: NodeId,
        direction: TraversalDirection,
        axis: Axis,
        continuing: bool,
    ) -> Option<NodeId> {
        match direction {
            TraversalDirection::Next => {
                let scope = group_parent(tree, from, axis, false);
                next_tab_stop(tree, Some(from), scope, axis, false)
            }
            TraversalDirection::Previous => prev_tab_stop(tree, Some(from), None, axis, false),
            TraversalDirection::First => {
                let root = tree.root_of(from)?;
                let entry = if continuing { Some(from) } else { None };
                next_tab_stop(tree, entry, root, axis, true)
            }
            TraversalDirection::Last => {
                let root = tree.root_of(from)?;
                let entry = if continuing { Some(from) } else { None };
                prev_tab_stop(tree, entry, Some(root), axis, true)
            }
            _ => {
                let compass = direction.as_compass()?;
                self.directional.move_focus(tree, from, compass, self.filter)
            }
        }
    }

    fn commit(
        &mut self,
        tree: &mut Tree,
        old: NodeId,
        target: NodeId,
        direction: TraversalDirection,
        observer: &mut impl NavObserver,
    ) {
        update_active_elements(tree, target);
        if direction.is_linear() {
            self.directional.reset_baselines();
        }
        observer.focus_visual(target);
        if let Some(root) = tree.root_of(target) {
            let new_scope = group_parent(tree, target, Axis::Tab, false);
            let old_scope = group_parent(tree, old, Axis::Tab, false);
            if new_scope == root && old_scope != root {
                observer.focus_entered_root(target);
            }
        }
    }
}

/// Which end of a foreign subtree an entering request should land on.
fn entry_direction(direction: TraversalDirection) -> TraversalDirection {
    match direction {
        TraversalDirection::Next | TraversalDirection::First => TraversalDirection::First,
        TraversalDirection::Previous | TraversalDirection::Last => TraversalDirection::Last,
        d => d,
    }
}

/// Records `target` as the active element of every group ancestor, so
/// later re-entry into those groups resumes where focus last was.
fn update_active_elements(tree: &mut Tree, target: NodeId) {
    let mut groups: SmallVec<[(NodeId, Axis); 8]> = SmallVec::new();
    let mut cur = tree.nav_parent(target);
    while let Some(e) = cur {
        for axis in [Axis::Tab, Axis::CtrlTab] {
            if is_group(tree, e, axis) {
                groups.push((e, axis));
            }
        }
        cur = tree.nav_parent(e);
    }
    for (g, axis) in groups {
        tree.set_active_element(g, axis, Some(target));
    }
}
