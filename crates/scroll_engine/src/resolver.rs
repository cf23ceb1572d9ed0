//! Event target → canonical scrolling surface.

use contracts::{Axis, DocumentView, EventTarget, InputEvent, NodeId, NodeKind};

/// Upper bound on parent hops, guards against malformed host trees.
const MAX_ANCESTRY_DEPTH: usize = 4096;

/// Normalizes targets and judges scrollability.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceResolver {
    tolerance_px: f64,
}

impl SurfaceResolver {
    pub fn new(tolerance_px: f64) -> Self {
        Self { tolerance_px }
    }

    /// Map an arbitrary target onto a trackable surface.
    ///
    /// Window, document, structural roots and unknown nodes map to the root
    /// scroller; text nodes resolve through their parent; other elements are
    /// returned unchanged.
    pub fn normalize<D: DocumentView + ?Sized>(
        &self,
        doc: &D,
        target: Option<EventTarget>,
    ) -> NodeId {
        let root = doc.root_scroller();
        let mut current = target;

        for _ in 0..MAX_ANCESTRY_DEPTH {
            let node = match current {
                None | Some(EventTarget::Window) | Some(EventTarget::Document) => return root,
                Some(EventTarget::Node(node)) => node,
            };
            match doc.node_kind(node) {
                Some(NodeKind::Element) => return node,
                Some(NodeKind::Text) => current = doc.parent(node).map(EventTarget::Node),
                Some(NodeKind::StructuralRoot) | Some(NodeKind::Document) | None => return root,
            }
        }
        root
    }

    /// Whether `node` can be scrolled by the user.
    pub fn can_scroll<D: DocumentView + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        if self.is_root_candidate(doc, node) {
            return true;
        }
        if doc.node_kind(node) != Some(NodeKind::Element) {
            return false;
        }
        Axis::BOTH.into_iter().any(|axis| {
            doc.overflow(node, axis).allows_user_scroll()
                && doc.extent(node, axis).overflow() > self.tolerance_px
        })
    }

    fn is_root_candidate<D: DocumentView + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        node == doc.root_scroller()
            || matches!(
                doc.node_kind(node),
                Some(NodeKind::StructuralRoot) | Some(NodeKind::Document)
            )
    }

    fn target_can_scroll<D: DocumentView + ?Sized>(&self, doc: &D, target: EventTarget) -> bool {
        match target {
            EventTarget::Window | EventTarget::Document => true,
            EventTarget::Node(node) => self.can_scroll(doc, node),
        }
    }

    /// Nearest scrollable surface along the event's propagation path.
    ///
    /// Uses the composed path when the host supplied one, otherwise walks parents
    /// from the direct target. Falls back to the root scroller.
    pub fn resolve_from_event<D: DocumentView + ?Sized>(
        &self,
        doc: &D,
        event: &InputEvent,
    ) -> NodeId {
        match event.composed_path.as_deref() {
            Some(path) if !path.is_empty() => path
                .iter()
                .copied()
                .find(|target| self.target_can_scroll(doc, *target))
                .map(|target| self.normalize(doc, Some(target)))
                .unwrap_or_else(|| doc.root_scroller()),
            _ => self.resolve_by_parent_walk(doc, event.target),
        }
    }

    fn resolve_by_parent_walk<D: DocumentView + ?Sized>(
        &self,
        doc: &D,
        target: Option<EventTarget>,
    ) -> NodeId {
        let mut current = match target {
            Some(EventTarget::Node(node)) => Some(node),
            _ => return doc.root_scroller(),
        };
        let mut depth = 0;
        while let Some(node) = current {
            if depth >= MAX_ANCESTRY_DEPTH {
                break;
            }
            if self.can_scroll(doc, node) {
                return self.normalize(doc, Some(EventTarget::Node(node)));
            }
            current = doc.parent(node);
            depth += 1;
        }
        doc.root_scroller()
    }
}
