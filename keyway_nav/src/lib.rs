// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyway Nav: keyboard focus traversal over a [`keyway_tree::Tree`].
//!
//! Three layers, each usable on its own:
//!
//! - [`next_tab_stop`] / [`prev_tab_stop`]: the linear engine. Walks tab
//!   order (tab index first, document order second) through nested
//!   navigation groups, honoring each group's per-axis
//!   [`keyway_tree::NavMode`].
//! - [`DirectionalEngine`]: the spatial engine for arrow keys. Scores
//!   candidate rectangles in a compass direction, with baseline memory
//!   that keeps repeated same-axis moves tracking a stable row or column.
//! - [`Navigator`]: the orchestrator. Decodes key presses, applies
//!   wrap-around at the outermost scope, hands focus across foreign
//!   input-sink boundaries ([`SinkHost`]), and maintains the
//!   active-element memory groups use to resume where focus last was.
//!
//! All engines report "nothing found" as `None` (or
//! [`NavResponse::Unchanged`]); there are no panics on stale ids or
//! malformed group configurations.
//!
//! ## Example
//!
//! ```rust
//! use keyway_nav::{NavResponse, Navigator, TraversalDirection, TraversalRequest};
//! use keyway_tree::{Axis, NavProps, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, NavProps::default());
//! let first = tree.insert(Some(root), NavProps::default());
//! let second = tree.insert(Some(root), NavProps::default());
//!
//! let mut nav = Navigator::new();
//! let request = TraversalRequest::new(TraversalDirection::Next);
//! let response = nav.navigate(&mut tree, first, request, Axis::Tab, &mut (), &mut ());
//! assert_eq!(response, NavResponse::Moved(second));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod directional;
mod orchestrator;
mod predicates;
mod scope;
mod tab;
mod util;

pub use directional::{CandidateFilter, Direction, DirectionalEngine};
pub use orchestrator::{
    Key, Modifiers, NavObserver, NavResponse, Navigator, SinkHost, TraversalDirection,
    TraversalRequest,
};
pub use predicates::{is_focusable, is_group, is_tab_stop, is_tab_stop_or_group};
pub use scope::group_parent;
pub use tab::{next_tab_stop, prev_tab_stop};
