//! render::recording
//!
//! A headless [`Surface`] that keeps every shape in memory.
//!
//! Tests assert on the emitted geometry instead of pixels. Text is
//! measured with a fixed advance per character.

use crate::core::types::CommitHash;

use super::surface::{Point, Shape, ShapeId, Stroke, Surface};

/// Per-character advance used when none is given.
pub const DEFAULT_GLYPH_WIDTH: f64 = 7.0;

/// A recorded shape and what was attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub shape: Shape,
    pub parent: Option<ShapeId>,
    pub children: Vec<ShapeId>,
    pub hover: Option<CommitHash>,
    pub tooltip: Option<String>,
}

/// A reference label as seen on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLabel {
    pub offset: Point,
    pub text: String,
    pub fill: String,
    pub box_width: f64,
    /// Whether the box precedes the text in paint order.
    pub box_behind_text: bool,
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    nodes: Vec<Node>,
    roots: Vec<ShapeId>,
    glyph_width: f64,
    size: (f64, f64),
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_glyph_width(DEFAULT_GLYPH_WIDTH)
    }

    pub fn with_glyph_width(glyph_width: f64) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            glyph_width,
            size: (0.0, 0.0),
        }
    }

    pub fn node(&self, id: ShapeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.node(id).map(|n| &n.shape)
    }

    /// Children of `parent` (or the root) in paint order.
    pub fn children(&self, parent: Option<ShapeId>) -> &[ShapeId] {
        match parent {
            None => &self.roots,
            Some(id) => self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[]),
        }
    }

    /// Every recorded shape, in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Last size passed to [`Surface::resize`].
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Points and stroke of every polyline, in creation order.
    pub fn polylines(&self) -> Vec<(&[Point], &Stroke)> {
        self.nodes
            .iter()
            .filter_map(|n| match &n.shape {
                Shape::Polyline { points, stroke } => Some((points.as_slice(), stroke)),
                _ => None,
            })
            .collect()
    }

    /// `(radius, stroke width)` of circles directly inside `group`.
    pub fn circles_in(&self, group: ShapeId) -> Vec<(f64, f64)> {
        self.children(Some(group))
            .iter()
            .filter_map(|&id| match self.shape(id) {
                Some(Shape::Circle { radius, stroke, .. }) => Some((*radius, stroke.width)),
                _ => None,
            })
            .collect()
    }

    /// `(start, end, color)` of arcs directly inside `group`.
    pub fn arcs_in(&self, group: ShapeId) -> Vec<(f64, f64, String)> {
        self.children(Some(group))
            .iter()
            .filter_map(|&id| match self.shape(id) {
                Some(Shape::Arc {
                    start, end, stroke, ..
                }) => Some((*start, *end, stroke.color.clone())),
                _ => None,
            })
            .collect()
    }

    /// Rect shapes directly inside `parent`.
    pub fn rects_in(&self, parent: Option<ShapeId>) -> Vec<&Shape> {
        self.children(parent)
            .iter()
            .filter_map(|&id| self.shape(id))
            .filter(|s| matches!(s, Shape::Rect { .. }))
            .collect()
    }

    /// Groups holding a hover target for `commit`.
    pub fn hover_targets(&self, commit: &CommitHash) -> Vec<ShapeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.hover.as_ref() == Some(commit))
            .map(|(i, _)| ShapeId(i))
            .collect()
    }

    /// Every group containing both a text and a rect, read as a label.
    pub fn labels(&self) -> Vec<RecordedLabel> {
        self.nodes
            .iter()
            .filter_map(|node| {
                let Shape::Group { offset } = node.shape else {
                    return None;
                };
                let mut text = None;
                let mut rect = None;
                for (pos, &child) in node.children.iter().enumerate() {
                    match self.shape(child) {
                        Some(Shape::Text { content, .. }) => text = Some((pos, content.clone())),
                        Some(Shape::Rect { width, fill, .. }) => {
                            rect = Some((pos, *width, fill.clone()))
                        }
                        _ => {}
                    }
                }
                let (text_pos, text) = text?;
                let (rect_pos, box_width, fill) = rect?;
                Some(RecordedLabel {
                    offset,
                    text,
                    fill,
                    box_width,
                    box_behind_text: rect_pos < text_pos,
                })
            })
            .collect()
    }

    fn push(&mut self, parent: Option<ShapeId>, shape: Shape) -> ShapeId {
        let id = ShapeId(self.nodes.len());
        self.nodes.push(Node {
            shape,
            parent,
            children: Vec::new(),
            hover: None,
            tooltip: None,
        });
        id
    }

    fn siblings_mut(&mut self, parent: Option<ShapeId>) -> Option<&mut Vec<ShapeId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.nodes.get_mut(id.0).map(|n| &mut n.children),
        }
    }
}

impl Surface for RecordingSurface {
    fn append(&mut self, parent: Option<ShapeId>, shape: Shape) -> ShapeId {
        let id = self.push(parent, shape);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.push(id);
        }
        id
    }

    fn insert_before(&mut self, parent: ShapeId, sibling: ShapeId, shape: Shape) -> ShapeId {
        let id = self.push(Some(parent), shape);
        if let Some(siblings) = self.siblings_mut(Some(parent)) {
            match siblings.iter().position(|&s| s == sibling) {
                Some(pos) => siblings.insert(pos, id),
                None => siblings.push(id),
            }
        }
        id
    }

    fn text_width(&self, text: ShapeId) -> f64 {
        match self.shape(text) {
            Some(Shape::Text { content, .. }) => content.chars().count() as f64 * self.glyph_width,
            _ => 0.0,
        }
    }

    fn attach_hover(&mut self, target: ShapeId, commit: &CommitHash) {
        if let Some(node) = self.nodes.get_mut(target.0) {
            node.hover = Some(commit.clone());
        }
    }

    fn set_tooltip(&mut self, target: ShapeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(target.0) {
            node.tooltip = Some(text.to_string());
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
    }
}
