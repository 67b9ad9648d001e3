// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional (arrow-key) traversal.
//!
//! Candidates are scored geometrically against the source rectangle.
//! Candidates overlapping the source's perpendicular span ("in range")
//! compete on perpendicular offset, which keeps movement within a row or
//! column; everything else competes on the Euclidean distance between
//! direction-specific anchor corners. The precedence between the two
//! scores and the plain-distance tiebreak is deliberate and load-bearing:
//! hosts depend on the exact candidate choice, so do not "improve" it.
//!
//! The engine carries a baseline pair across consecutive same-axis moves,
//! mimicking the column memory of a text cursor: repeated Down presses
//! track the X position where the run started even when intermediate
//! targets are narrower. The orchestrator resets the baselines whenever
//! focus moves through any other channel.

use hashbrown::HashSet;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use keyway_tree::{Axis, NavMode, NodeId, Tree};

use crate::predicates::{is_focusable, is_group, is_tab_stop};
use crate::scope::group_parent;
use crate::tab::next_in_tree;
use crate::util::{are_close, definitely_greater, definitely_less, greater_or_close, less_or_close};

/// A compass direction for arrow-key navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward negative X.
    Left,
    /// Toward positive X.
    Right,
    /// Toward negative Y.
    Up,
    /// Toward positive Y.
    Down,
}

impl Direction {
    const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Which nodes the directional engine may land on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandidateFilter {
    /// Full tab stops only. Descendants of the source are excluded, so a
    /// composite control is stepped over as a unit.
    #[default]
    TabStops,
    /// Anything focusable, tab stop or not, descendants included. Used
    /// for item-to-item movement inside list- and tree-like controls.
    Focusable,
}

impl CandidateFilter {
    fn eligible(self, tree: &Tree, id: NodeId) -> bool {
        match self {
            Self::TabStops => is_tab_stop(tree, id),
            Self::Focusable => is_focusable(tree, id),
        }
    }

    fn allows_descendants(self) -> bool {
        matches!(self, Self::Focusable)
    }
}

/// Perpendicular range along which candidates count as "in range".
type Range = (f64, f64);

/// The directional navigation engine.
///
/// One instance per focus scope; the baselines are meaningful only across
/// consecutive calls for the same focused chain.
#[derive(Debug, Default)]
pub struct DirectionalEngine {
    /// Retained Y coordinate across consecutive Left/Right moves.
    vertical_baseline: Option<f64>,
    /// Retained X coordinate across consecutive Up/Down moves.
    horizontal_baseline: Option<f64>,
    /// Per-query recursion guard over `(source, container)` pairs.
    seen: HashSet<(Option<NodeId>, NodeId)>,
}

impl DirectionalEngine {
    /// Creates an engine with no retained baselines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the retained baselines.
    ///
    /// Call whenever focus changes through any channel other than this
    /// engine, or when layout changes; a stale baseline would anchor the
    /// next arrow move to a position that no longer exists.
    pub fn reset_baselines(&mut self) {
        self.vertical_baseline = None;
        self.horizontal_baseline = None;
    }

    /// Best focus target in `direction` from `source`.
    ///
    /// Returns `None` when nothing is found in any enclosing scope: the
    /// source is stale, has no geometry scope to search, or every scope up
    /// to the root is exhausted or blocked by a `Contained` or `None`
    /// boundary.
    pub fn move_focus(
        &mut self,
        tree: &Tree,
        source: NodeId,
        direction: Direction,
        filter: CandidateFilter,
    ) -> Option<NodeId> {
        let source_rect = tree.representative_rect(source)?;
        if direction.is_horizontal() {
            self.horizontal_baseline = None;
            if self.vertical_baseline.is_none() {
                self.vertical_baseline = Some(source_rect.y0);
            }
        } else {
            self.vertical_baseline = None;
            if self.horizontal_baseline.is_none() {
                self.horizontal_baseline = Some(source_rect.x0);
            }
        }
        self.seen.clear();
        let result = self.move_next(tree, Some(source), None, direction, filter, None);
        self.seen.clear();
        result
    }

    /// One scan within a single container, with mode fallout and group
    /// descent. `container == None` resolves to the source's group scope;
    /// `source == None` means entry into `container` from its near edge.
    fn move_next(
        &mut self,
        tree: &Tree,
        source: Option<NodeId>,
        container: Option<NodeId>,
        direction: Direction,
        filter: CandidateFilter,
        range: Option<Range>,
    ) -> Option<NodeId> {
        let container = match container {
            Some(c) => c,
            None => {
                let s = source?;
                let c = group_parent(tree, s, Axis::Directional, false);
                if c == s {
                    return None;
                }
                c
            }
        };
        if !self.seen.insert((source, container)) {
            return None;
        }

        let source_rect = match source {
            Some(s) => tree.representative_rect(s)?,
            None => entry_rect(tree.bounds(container)?, direction),
        };
        let range = range.unwrap_or_else(|| {
            if direction.is_horizontal() {
                (source_rect.y0, source_rect.y1)
            } else {
                (source_rect.x0, source_rect.x1)
            }
        });
        let range = self.extend_by_baseline(range, direction);

        let mode = tree
            .nav_mode(container, Axis::Directional)
            .unwrap_or(NavMode::Continue);

        let mut exclude = source;
        let mut exclude_rect = source_rect;
        loop {
            // A None container suppresses movement within itself; focus
            // already inside can still escalate out below.
            let best = if mode == NavMode::None {
                None
            } else {
                self.find_best(tree, exclude, exclude_rect, container, direction, filter, range)
            };
            let Some(candidate) = best else {
                break;
            };
            if filter.eligible(tree, candidate) {
                return Some(candidate);
            }

            // The candidate is a group: prefer its remembered active
            // element, then search inside it, then look past it.
            if let Some(active) = active_element_chain(tree, candidate, filter) {
                return Some(active);
            }
            if let Some(inside) =
                self.move_next(tree, None, Some(candidate), direction, filter, Some(range))
            {
                return Some(inside);
            }
            if !self.seen.insert((Some(candidate), container)) {
                return None;
            }
            exclude = Some(candidate);
            exclude_rect = match tree.representative_rect(candidate) {
                Some(r) => r,
                None => return None,
            };
        }

        match mode {
            NavMode::Contained => None,
            NavMode::Cycle if source.is_some() => {
                self.move_next(tree, None, Some(container), direction, filter, None)
            }
            _ if source.is_some() && tree.nav_parent(container).is_some() => {
                let outer = group_parent(tree, container, Axis::Directional, false);
                if outer == container {
                    return None;
                }
                self.move_next(tree, Some(container), Some(outer), direction, filter, Some(range))
            }
            _ => None,
        }
    }

    /// Scores every eligible node in `container`'s subtree and returns the
    /// winner, which may be a nested group.
    fn find_best(
        &self,
        tree: &Tree,
        source: Option<NodeId>,
        source_rect: Rect,
        container: NodeId,
        direction: Direction,
        filter: CandidateFilter,
        range: Range,
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64, f64)> = None;
        let mut cur = next_in_tree(tree, container, container, Axis::Directional);
        while let Some(candidate) = cur {
            cur = next_in_tree(tree, candidate, container, Axis::Directional);
            if Some(candidate) == source {
                continue;
            }
            if !filter.eligible(tree, candidate)
                && !is_group(tree, candidate, Axis::Directional)
            {
                continue;
            }
            let Some(rect) = tree.representative_rect(candidate) else {
                continue;
            };
            if rect.area() == 0.0 {
                continue;
            }
            if !filter.allows_descendants()
                && source.is_some_and(|s| is_descendant(tree, candidate, s))
            {
                continue;
            }

            let in_range = self.is_in_range(source_rect, rect, direction, range);
            if !in_range && !is_in_direction(source_rect, rect, direction) {
                continue;
            }
            let score = self.score(source_rect, rect, direction, in_range);
            let tiebreak = source_rect.center().distance(rect.center());
            let wins = match best {
                None => true,
                Some((_, best_score, best_tiebreak)) => {
                    definitely_less(score, best_score)
                        || (are_close(score, best_score)
                            && definitely_less(tiebreak, best_tiebreak))
                }
            };
            if wins {
                best = Some((candidate, score, tiebreak));
            }
        }
        best.map(|(id, _, _)| id)
    }

    fn extend_by_baseline(&self, (start, end): Range, direction: Direction) -> Range {
        let baseline = if direction.is_horizontal() {
            self.vertical_baseline
        } else {
            self.horizontal_baseline
        };
        match baseline {
            Some(b) => (start.min(b), end.max(b)),
            None => (start, end),
        }
    }

    /// Whether `target` overlaps the perpendicular range *and* makes
    /// progress along the travel axis. In-range candidates are preferred
    /// even when they are not strictly ahead of the source.
    fn is_in_range(
        &self,
        source: Rect,
        target: Rect,
        direction: Direction,
        (start, end): Range,
    ) -> bool {
        match direction {
            Direction::Right | Direction::Left => {
                let overlaps =
                    definitely_greater(target.y1, start) && definitely_less(target.y0, end);
                overlaps
                    && if direction == Direction::Right {
                        definitely_greater(target.x1, source.x1)
                    } else {
                        definitely_less(target.x0, source.x0)
                    }
            }
            Direction::Up | Direction::Down => {
                let overlaps =
                    definitely_greater(target.x1, start) && definitely_less(target.x0, end);
                overlaps
                    && if direction == Direction::Down {
                        definitely_greater(target.y1, source.y1)
                    } else {
                        definitely_less(target.y0, source.y0)
                    }
            }
        }
    }

    /// In-range candidates score by perpendicular offset from the baseline
    /// (or the source's near edge); the rest by anchor-corner distance.
    fn score(&self, source: Rect, target: Rect, direction: Direction, in_range: bool) -> f64 {
        if in_range {
            return if direction.is_horizontal() {
                (target.y0 - self.vertical_baseline.unwrap_or(source.y0)).abs()
            } else {
                (target.x0 - self.horizontal_baseline.unwrap_or(source.x0)).abs()
            };
        }
        let (source_anchor, target_anchor) = match direction {
            Direction::Right | Direction::Down => {
                let y = if direction == Direction::Right {
                    self.vertical_baseline.unwrap_or(source.y0)
                } else {
                    source.y0
                };
                let x = if direction == Direction::Down {
                    self.horizontal_baseline.unwrap_or(source.x0)
                } else {
                    source.x0
                };
                (Point::new(x, y), Point::new(target.x0, target.y0))
            }
            Direction::Left => {
                let y = self.vertical_baseline.unwrap_or(source.y0);
                (Point::new(source.x1, y), Point::new(target.x1, target.y0))
            }
            Direction::Up => {
                let x = self.horizontal_baseline.unwrap_or(source.x0);
                (Point::new(x, source.y1), Point::new(target.x0, target.y1))
            }
        };
        source_anchor.distance(target_anchor)
    }
}

/// Whether the whole of `target` lies ahead of `source` in `direction`.
fn is_in_direction(source: Rect, target: Rect, direction: Direction) -> bool {
    match direction {
        Direction::Right => greater_or_close(target.x0, source.x1),
        Direction::Left => less_or_close(target.x1, source.x0),
        Direction::Down => greater_or_close(target.y0, source.y1),
        Direction::Up => less_or_close(target.y1, source.y0),
    }
}

/// Degenerate rectangle just outside `container`'s near edge for
/// `direction`, spanning its full perpendicular extent. Stands in for the
/// source when entering a container from outside.
fn entry_rect(container: Rect, direction: Direction) -> Rect {
    let Rect { x0, y0, x1, y1 } = container;
    match direction {
        Direction::Right => Rect::new(x0 - 1.0, y0, x0 - 1.0, y1),
        Direction::Left => Rect::new(x1 + 1.0, y0, x1 + 1.0, y1),
        Direction::Down => Rect::new(x0, y0 - 1.0, x1, y0 - 1.0),
        Direction::Up => Rect::new(x0, y1 + 1.0, x1, y1 + 1.0),
    }
}

/// Whether `id` is a strict descendant of `ancestor` in the navigation
/// tree.
fn is_descendant(tree: &Tree, id: NodeId, ancestor: NodeId) -> bool {
    let mut cur = tree.nav_parent(id);
    while let Some(e) = cur {
        if e == ancestor {
            return true;
        }
        cur = tree.nav_parent(e);
    }
    false
}

/// Deepest usable node in `group`'s remembered active-element chain.
fn active_element_chain(tree: &Tree, group: NodeId, filter: CandidateFilter) -> Option<NodeId> {
    let mut visited: SmallVec<[NodeId; 8]> = SmallVec::new();
    let mut cur = tree.active_element(group, Axis::Tab)?;
    while let Some(next) = tree.active_element(cur, Axis::Tab) {
        if visited.contains(&next) {
            break;
        }
        visited.push(next);
        cur = next;
    }
    filter.eligible(tree, cur).then_some(cur)
}
