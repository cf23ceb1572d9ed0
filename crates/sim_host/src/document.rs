//! In-memory document tree

use std::collections::HashMap;

use contracts::{
    Axis, AxisExtent, EventTarget, NodeId, NodeKind, OverflowMode, Scenario, ScrollOffset,
    SurfaceConfig, ViewportConfig, ROOT_SURFACE,
};
use tracing::debug;

use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
struct SimNode {
    label: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    overflow: [OverflowMode; 2],
    extent: [AxisExtent; 2],
    offset: ScrollOffset,
    attached: bool,
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
    }
}

/// Node tree with per-node overflow modes, extents and scroll offsets.
///
/// Always contains the structural root (`html`, the root scroller) and `body`
/// beneath it. Node ids are assigned densely from 1.
#[derive(Debug, Clone)]
pub struct SimDocument {
    nodes: Vec<SimNode>,
    labels: HashMap<String, NodeId>,
    body: NodeId,
}

impl SimDocument {
    pub fn new(viewport: ViewportConfig) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            labels: HashMap::new(),
            body: NodeId::new(2),
        };
        let root = doc.push(SimNode {
            label: ROOT_SURFACE.to_string(),
            kind: NodeKind::StructuralRoot,
            parent: None,
            overflow: [OverflowMode::Auto, OverflowMode::Auto],
            extent: [
                AxisExtent {
                    content: viewport.content_width,
                    visible: viewport.width,
                },
                AxisExtent {
                    content: viewport.content_height,
                    visible: viewport.height,
                },
            ],
            offset: ScrollOffset::default(),
            attached: true,
        });
        doc.body = doc.push(SimNode {
            label: "body".to_string(),
            kind: NodeKind::StructuralRoot,
            parent: Some(root),
            overflow: [OverflowMode::Visible, OverflowMode::Visible],
            extent: [AxisExtent::default(), AxisExtent::default()],
            offset: ScrollOffset::default(),
            attached: true,
        });
        doc
    }

    /// Build the document described by a scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut doc = Self::new(scenario.viewport);
        for surface in &scenario.surfaces {
            doc.add_surface(surface)?;
        }
        debug!(nodes = doc.nodes.len(), "document built");
        Ok(doc)
    }

    fn push(&mut self, node: SimNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u64 + 1);
        self.labels.insert(node.label.clone(), id);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Option<&SimNode> {
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.nodes.get(index).filter(|node| node.attached)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.nodes.get_mut(index).filter(|node| node.attached)
    }

    /// Add a surface; its parent must already exist.
    pub fn add_surface(&mut self, surface: &SurfaceConfig) -> Result<NodeId> {
        if self.labels.contains_key(&surface.id) {
            return Err(SimError::DuplicateSurface(surface.id.clone()));
        }
        let parent = match surface.parent.as_deref() {
            None => self.body,
            Some(label) => self
                .lookup(label)
                .ok_or_else(|| SimError::UnknownParent {
                    surface: surface.id.clone(),
                    parent: label.to_string(),
                })?,
        };
        Ok(self.push(SimNode {
            label: surface.id.clone(),
            kind: surface.kind,
            parent: Some(parent),
            overflow: [surface.overflow_x, surface.overflow_y],
            extent: [
                AxisExtent {
                    content: surface.content_width,
                    visible: surface.visible_width,
                },
                AxisExtent {
                    content: surface.content_height,
                    visible: surface.visible_height,
                },
            ],
            offset: ScrollOffset::default(),
            attached: true,
        }))
    }

    pub fn add_text(&mut self, label: impl Into<String>, parent: NodeId) -> NodeId {
        self.add_leaf(label.into(), NodeKind::Text, parent)
    }

    fn add_leaf(&mut self, label: String, kind: NodeKind, parent: NodeId) -> NodeId {
        self.push(SimNode {
            label,
            kind,
            parent: Some(parent),
            overflow: [OverflowMode::Visible, OverflowMode::Visible],
            extent: [AxisExtent::default(), AxisExtent::default()],
            offset: ScrollOffset::default(),
            attached: true,
        })
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(1)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Node id for a label; `root` names the root scroller.
    pub fn lookup(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// Remove `node` from the tree; later lookups treat it as unknown.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.attached = false;
        }
    }

    /// Move a node's scroll offset, clamped to its scrollable range.
    ///
    /// Returns the offset actually applied.
    pub fn scroll_by(&mut self, node: NodeId, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let n = self.node_mut(node)?;
        let before = n.offset;
        n.offset.x = clamp_offset(before.x + dx, n.extent[0]);
        n.offset.y = clamp_offset(before.y + dy, n.extent[1]);
        Some((n.offset.x - before.x, n.offset.y - before.y))
    }

    /// Target a movement notification on `node` is reported with.
    pub fn scroll_target(&self, node: NodeId) -> EventTarget {
        if node == self.root() {
            EventTarget::Document
        } else {
            EventTarget::Node(node)
        }
    }

    /// Propagation path from `node` outwards, ending at document and window.
    pub fn composed_path(&self, node: NodeId) -> Vec<EventTarget> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(EventTarget::Node(id));
            current = self.node(id).and_then(|n| n.parent);
        }
        path.push(EventTarget::Document);
        path.push(EventTarget::Window);
        path
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn overflow_of(&self, node: NodeId, axis: Axis) -> OverflowMode {
        self.node(node)
            .map(|n| n.overflow[axis_index(axis)])
            .unwrap_or_default()
    }

    pub fn extent_of(&self, node: NodeId, axis: Axis) -> AxisExtent {
        self.node(node)
            .map(|n| n.extent[axis_index(axis)])
            .unwrap_or_default()
    }

    pub fn offset_of(&self, node: NodeId) -> ScrollOffset {
        self.node(node).map(|n| n.offset).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn clamp_offset(value: f64, extent: AxisExtent) -> f64 {
    value.clamp(0.0, extent.overflow().max(0.0))
}
