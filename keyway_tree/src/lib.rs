// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyway Tree: the focus tree consumed by the Keyway navigation engines.
//!
//! This crate models the logical containment tree keyboard navigation walks:
//! a hierarchy mixing ordinary visual elements, hosted content items, 3D
//! elements, and internal bridging nodes, with per-node navigation state
//! attached (flags, tab indices, per-axis container modes, root-space
//! bounds, active-element memory, focus delegation).
//!
//! - [`Tree`]: generational arena holding the nodes and their attached state.
//! - [`NavProps`]: per-node navigation data provided by the host.
//! - [`NodeFlags`]: focusability, enablement, visibility, tab-stop, and
//!   input-sink controls.
//! - [`NavMode`] / [`Axis`]: per-axis container navigation policies.
//! - Navigation-tree walking: [`Tree::nav_parent`], [`Tree::nav_first_child`],
//!   [`Tree::nav_last_child`], [`Tree::nav_next_sibling`],
//!   [`Tree::nav_prev_sibling`] — a filtered, uniform view over the mixed
//!   node kinds that the traversal engines are written against.
//!
//! ## Not a layout engine
//!
//! This crate does not measure, arrange, or transform anything. Hosts run
//! their own layout and push finished root-space rectangles into the tree;
//! a zero-area rectangle marks geometry as unavailable, which silently
//! excludes the node from directional scoring.
//!
//! ## Example
//!
//! ```rust
//! use keyway_tree::{NavProps, NodeKind, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, NavProps::default());
//! let toolbar = tree.insert(Some(root), NavProps::default());
//! let chrome = tree.insert(
//!     Some(root),
//!     NavProps {
//!         kind: NodeKind::Bridge,
//!         ..NavProps::default()
//!     },
//! );
//! let button = tree.insert(Some(chrome), NavProps::default());
//!
//! // The bridge is transparent: its child is the toolbar's next sibling.
//! assert_eq!(tree.nav_next_sibling(toolbar), Some(button));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;
mod walk;

pub use tree::Tree;
pub use types::{Axis, NavMode, NavProps, NodeFlags, NodeId, NodeKind};
