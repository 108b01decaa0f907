//! render::surface
//!
//! The drawing capability the layout core needs from a backend.
//!
//! # Design
//!
//! A backend owns a tree of primitive shapes. The core only ever appends
//! shapes (or inserts one before an existing sibling), measures text it has
//! already inserted, and attaches hover targets. Nothing is ever removed, so
//! a backend can stream shapes straight into its output.
//!
//! Text width is only known after insertion: label boxes are sized with a
//! render-then-measure-then-box sequence.

use crate::core::types::CommitHash;

/// Handle to a shape owned by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// A point in surface (pixel) coordinates. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke settings for outlined shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// Primitive shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A container translated by `offset`; children use local coordinates.
    Group { offset: Point },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: String,
        stroke: Stroke,
    },
    /// Open polyline, no fill.
    Polyline { points: Vec<Point>, stroke: Stroke },
    /// Circular arc. Angles are in radians measured clockwise from the
    /// upward vertical, swept clockwise from `start` to `end`.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    },
    Text {
        /// Baseline origin.
        origin: Point,
        content: String,
        font_size: f64,
        font_family: String,
    },
}

/// A rendering backend.
pub trait Surface {
    /// Append `shape` as the last child of `parent` (or of the root).
    fn append(&mut self, parent: Option<ShapeId>, shape: Shape) -> ShapeId;

    /// Insert `shape` into `parent` directly before `sibling`.
    fn insert_before(&mut self, parent: ShapeId, sibling: ShapeId, shape: Shape) -> ShapeId;

    /// Rendered width of an inserted text shape. Zero for anything else.
    fn text_width(&self, text: ShapeId) -> f64;

    /// Make `target` a hover target for `commit`.
    fn attach_hover(&mut self, target: ShapeId, commit: &CommitHash);

    /// Attach tooltip text to `target`.
    fn set_tooltip(&mut self, target: ShapeId, text: &str);

    /// Set the canvas size.
    fn resize(&mut self, width: f64, height: f64);
}
