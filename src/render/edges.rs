//! render::edges
//!
//! Child-to-parent edge routing and coloring.
//!
//! # Geometry
//!
//! - Same lane: a straight vertical segment, stopping [`MARKER_GAP`] short
//!   of both marker centers.
//! - Different lanes: three points. The line leaves the child marker, reaches
//!   the parent's lane [`BEND_OFFSET`] further down, and runs straight down
//!   that lane onto the parent marker. The parent's lane stays reserved until
//!   the parent is placed, so no other marker sits on the vertical run.
//!
//! # Color
//!
//! One counter over [`EDGE_PALETTE`] lives for the whole session. Every
//! drawn edge takes the current color, then advances the counter, except a
//! first-parent edge that stays in the child's lane: linear runs keep one
//! color and every branch or merge starts a new one. Unresolved parents draw
//! nothing and leave the counter alone.

use tracing::warn;

use crate::core::store::{Commit, CommitStore, Placement};
use crate::core::types::CommitHash;

use super::geometry::Geometry;
use super::surface::{Point, Shape, ShapeId, Stroke, Surface};

/// Edge colors, cycled by [`ColorCounter`].
pub const EDGE_PALETTE: [&str; 7] = [
    "#7f0000", "#007f00", "#0000af", "#000000", "#7f7f00", "#7f007f", "#007f7f",
];

/// Distance between a marker center and the end of a line touching it.
pub const MARKER_GAP: f64 = 7.0;

/// Drop below the child marker at which lane-changing lines reach the
/// parent's lane.
pub const BEND_OFFSET: f64 = 12.0;

pub const EDGE_WIDTH: f64 = 2.0;

/// Rotating palette index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounter {
    index: usize,
}

impl ColorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index the next edge will use.
    pub fn current(&self) -> usize {
        self.index
    }

    /// Color for the next edge, advancing unless `continues_run`.
    pub fn next_color(&mut self, continues_run: bool) -> usize {
        let color = self.index;
        if !continues_run {
            self.index = (self.index + 1) % EDGE_PALETTE.len();
        }
        color
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// A drawn edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub child: CommitHash,
    pub parent: CommitHash,
    /// Index into [`EDGE_PALETTE`].
    pub color: usize,
    pub points: Vec<Point>,
}

impl Edge {
    pub fn color_str(&self) -> &'static str {
        EDGE_PALETTE[self.color]
    }

    /// Rightmost x reached by the path.
    pub fn extent(&self) -> f64 {
        self.points.iter().map(|p| p.x).fold(f64::MIN, f64::max)
    }
}

/// Edges drawn for one child plus the horizontal extent they reached.
#[derive(Debug, Clone, Default)]
pub struct RoutedEdges {
    pub edges: Vec<Edge>,
    pub extent: f64,
}

/// Computes and draws edge paths.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    geometry: Geometry,
}

impl EdgeRouter {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Path from a child at `child` to a parent at `parent`.
    pub fn path(&self, child: Placement, parent: Placement) -> Vec<Point> {
        let from = self.geometry.center(child.lane, child.row);
        let to = self.geometry.center(parent.lane, parent.row);

        if child.lane == parent.lane {
            vec![
                Point::new(from.x, from.y + MARKER_GAP),
                Point::new(to.x, to.y - MARKER_GAP),
            ]
        } else {
            let arrive = to.y - MARKER_GAP;
            let bend = (from.y + MARKER_GAP + BEND_OFFSET).min(arrive);
            vec![
                Point::new(from.x, from.y + MARKER_GAP),
                Point::new(to.x, bend),
                Point::new(to.x, arrive),
            ]
        }
    }

    /// Draw edges from `child` to every parent already placed.
    ///
    /// Parents missing from the store, or not yet placed, are skipped. The
    /// extent starts at the right edge of the child's marker.
    pub fn route_parents(
        &self,
        store: &CommitStore,
        child: &Commit,
        colors: &mut ColorCounter,
        surface: &mut dyn Surface,
        layer: Option<ShapeId>,
    ) -> RoutedEdges {
        let mut routed = RoutedEdges::default();
        let Some(placement) = child.placement() else {
            return routed;
        };
        routed.extent = self.geometry.lane_x(placement.lane) + MARKER_GAP;

        for (index, parent_hash) in child.parents.iter().enumerate() {
            let Some(parent) = store.lookup(parent_hash) else {
                continue;
            };
            if let Some(edge) = self.route_edge(child, index, parent, colors, surface, layer) {
                routed.extent = routed.extent.max(edge.extent());
                routed.edges.push(edge);
            }
        }
        routed
    }

    /// Draw the edge from `child` to its `index`-th parent.
    ///
    /// Returns `None` when either end is not placed.
    pub fn route_edge(
        &self,
        child: &Commit,
        index: usize,
        parent: &Commit,
        colors: &mut ColorCounter,
        surface: &mut dyn Surface,
        layer: Option<ShapeId>,
    ) -> Option<Edge> {
        let from = child.placement()?;
        let to = parent.placement()?;

        if to.row <= from.row {
            warn!(
                child = %child.hash,
                parent = %parent.hash,
                "commit's parent is newer than the commit itself"
            );
        }

        let continues_run = index == 0 && from.lane == to.lane;
        let color = colors.next_color(continues_run);
        let points = self.path(from, to);

        surface.append(
            layer,
            Shape::Polyline {
                points: points.clone(),
                stroke: Stroke::new(EDGE_PALETTE[color], EDGE_WIDTH),
            },
        );

        Some(Edge {
            child: child.hash.clone(),
            parent: parent.hash.clone(),
            color,
            points,
        })
    }
}
