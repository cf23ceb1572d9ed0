//! Document node vocabulary
//!
//! Nodes are addressed by a stable numeric identifier rather than by reference, so
//! nothing in the engine keeps a detached node alive. A detached node simply stops
//! producing notifications and its bookkeeping is reclaimed lazily.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a document node.
///
/// # Examples
/// ```
/// use contracts::NodeId;
///
/// let id = NodeId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "#7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Target of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global window object
    Window,
    /// The document object itself
    Document,
    /// Any node in the tree
    Node(NodeId),
}

impl From<NodeId> for EventTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Structural kind of a node, as far as surface resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Document node
    Document,
    /// Text node (never scrollable, resolves through its parent)
    Text,
    /// Top-level structural container (html/body equivalent)
    StructuralRoot,
    /// Ordinary element
    Element,
}

impl NodeKind {
    /// Whether nodes of this kind can be a record target
    pub fn is_element(self) -> bool {
        matches!(self, Self::Element | Self::StructuralRoot)
    }
}

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];
}

/// Computed overflow mode for one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowMode {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
    Overlay,
}

impl OverflowMode {
    /// Modes that let the user scroll the axis
    pub fn allows_user_scroll(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll | Self::Overlay)
    }
}

/// Content vs. visible extent on one axis, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisExtent {
    pub content: f64,
    pub visible: f64,
}

impl AxisExtent {
    /// Amount by which content exceeds the viewport
    pub fn overflow(&self) -> f64 {
        self.content - self.visible
    }
}

/// Current scroll position of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}
