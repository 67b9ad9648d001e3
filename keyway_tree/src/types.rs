// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the focus tree: node identifiers, flags, and navigation properties.

use kurbo::Rect;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling focus eligibility.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node can receive keyboard focus at all.
        const FOCUSABLE  = 0b0000_0001;
        /// Node is enabled for interaction.
        const ENABLED    = 0b0000_0010;
        /// Node is visible.
        const VISIBLE    = 0b0000_0100;
        /// Node participates in linear (Tab) navigation.
        const TAB_STOP   = 0b0000_1000;
        /// Node is a boundary into an embedded foreign input sink
        /// (for example a hosted native child window).
        const INPUT_SINK = 0b0001_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::FOCUSABLE | Self::ENABLED | Self::VISIBLE | Self::TAB_STOP
    }
}

/// Structural kind of a node in the mixed navigation tree.
///
/// The walker only ever branches on this kind; traversal code never inspects
/// concrete widget types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Ordinary visual element with indexed children.
    #[default]
    Visual,
    /// Node whose navigable children are an ordered sequence of hosted
    /// content items (installed via [`crate::Tree::set_content_order`])
    /// rather than its indexed children.
    ContentHost,
    /// Visible 3D element participating in navigation like a visual.
    Volume3D,
    /// Internal bridging node: never part of the navigation tree itself, but
    /// its subtree is descended through when searching for navigable children.
    Bridge,
}

/// Container navigation policy for one axis.
///
/// Any mode other than [`NavMode::Continue`] turns the node into a group
/// boundary: a traversal scope with its own tab-index numbering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavMode {
    /// Navigation moves through this container transparently.
    #[default]
    Continue,
    /// Entering the container lands on its remembered active element; the
    /// container's other children are not enumerated. Invalid for the
    /// directional axis and rejected by [`crate::Tree::set_nav_mode`].
    Once,
    /// Navigation wraps around inside the container instead of leaving it.
    Cycle,
    /// Navigation never enters the container's interior.
    None,
    /// Navigation cannot leave the container outward.
    Contained,
    /// Like [`NavMode::Continue`], but tab indices are considered local to
    /// this container's subtree.
    Local,
}

/// Navigation axis.
///
/// Container modes are stored separately per axis, and active-element memory
/// is tracked per linear axis ([`Axis::Tab`] and [`Axis::CtrlTab`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Tab / Shift+Tab traversal.
    Tab,
    /// Ctrl+Tab / Ctrl+Shift+Tab traversal.
    CtrlTab,
    /// Arrow-key (spatial) traversal.
    Directional,
}

impl Axis {
    /// Index of the active-element memory slot for this axis, if it has one.
    pub(crate) const fn memory_slot(self) -> Option<usize> {
        match self {
            Self::Tab => Some(0),
            Self::CtrlTab => Some(1),
            Self::Directional => None,
        }
    }
}

/// Per-node navigation data.
#[derive(Clone, Debug)]
pub struct NavProps {
    /// Explicit tab order key. Lower values are visited first; ties are
    /// broken by tree discovery order. Defaults to `i32::MAX`.
    pub tab_index: i32,
    /// Structural kind.
    pub kind: NodeKind,
    /// Eligibility flags.
    pub flags: NodeFlags,
    /// Container policy for the Tab axis.
    pub tab_mode: NavMode,
    /// Container policy for the Ctrl+Tab axis.
    pub ctrl_tab_mode: NavMode,
    /// Container policy for directional (arrow key) navigation.
    ///
    /// [`NavMode::Once`] is not valid here; [`crate::Tree::set_nav_mode`]
    /// rejects it at the write boundary.
    pub directional_mode: NavMode,
    /// Bounding rectangle in root coordinates, provided by the host.
    ///
    /// A zero-area rectangle is the "no geometry" sentinel; such nodes are
    /// silently excluded from directional scoring.
    pub bounds: Rect,
    /// Optional adjusted rectangle used for directional scoring of composite
    /// expandable items (for example a tree item whose expanded children
    /// panel should not count toward its own extent). `None` uses `bounds`.
    pub representative_bounds: Option<Rect>,
}

impl Default for NavProps {
    fn default() -> Self {
        Self {
            tab_index: i32::MAX,
            kind: NodeKind::default(),
            flags: NodeFlags::default(),
            tab_mode: NavMode::Continue,
            ctrl_tab_mode: NavMode::Continue,
            directional_mode: NavMode::Continue,
            bounds: Rect::ZERO,
            representative_bounds: None,
        }
    }
}
