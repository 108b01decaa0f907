//! render::halo
//!
//! Commit markers and the diff halo drawn around them.
//!
//! A marker is a group translated to the commit's center holding a circle.
//! Once a [`DiffStat`] is known the circle is redrawn smaller with a heavy
//! outline and two arcs are added: insertions clockwise from the top,
//! deletions counter-clockwise from the top. Arc length grows with the
//! logarithm of the line count and is capped at half a circle, so the two
//! arcs never overlap.

use std::f64::consts::PI;

use crate::core::types::DiffStat;

use super::surface::{Point, Shape, ShapeId, Stroke, Surface};
use super::theme::Theme;

pub const PENDING_RADIUS: f64 = 7.0;
pub const PENDING_STROKE: f64 = 1.0;
pub const LOADED_RADIUS: f64 = 6.0;
pub const LOADED_STROKE: f64 = 5.0;
pub const ARC_WIDTH: f64 = 4.0;

/// Sweep in radians for `count` changed lines: `min(π, log10(count + 1) * π / 5)`.
///
/// ```
/// use std::f64::consts::PI;
/// use lanegraph::render::halo::halo_angle;
///
/// assert!((halo_angle(9) - PI / 5.0).abs() < 1e-12);
/// assert_eq!(halo_angle(99_999), PI);
/// assert_eq!(halo_angle(0), 0.0);
/// ```
pub fn halo_angle(count: usize) -> f64 {
    ((count as f64 + 1.0).log10() * PI / 5.0).min(PI)
}

/// Draws markers and halos with the theme's colors.
#[derive(Debug, Clone)]
pub struct HaloRenderer {
    fill: String,
    outline: String,
    added: String,
    removed: String,
}

impl HaloRenderer {
    pub fn new(theme: &Theme) -> Self {
        Self {
            fill: theme.marker_fill.clone(),
            outline: theme.marker_stroke.clone(),
            added: theme.added.clone(),
            removed: theme.removed.clone(),
        }
    }

    /// Draw the marker group for a commit centered at `center`.
    ///
    /// With a known `stat` the marker is drawn in its loaded state straight
    /// away. Returns the group so a halo can be added later.
    pub fn draw_marker(
        &self,
        surface: &mut dyn Surface,
        layer: Option<ShapeId>,
        center: Point,
        stat: Option<DiffStat>,
    ) -> ShapeId {
        let group = surface.append(layer, Shape::Group { offset: center });
        match stat {
            Some(stat) => self.draw_halo(surface, group, stat),
            None => {
                surface.append(Some(group), self.circle(PENDING_RADIUS, PENDING_STROKE));
            }
        }
        group
    }

    /// Add the loaded circle and both arcs to an existing marker group.
    pub fn draw_halo(&self, surface: &mut dyn Surface, group: ShapeId, stat: DiffStat) {
        surface.append(Some(group), self.circle(LOADED_RADIUS, LOADED_STROKE));

        let added = halo_angle(stat.insertions);
        if added > 0.0 {
            surface.append(Some(group), self.arc(0.0, added, &self.added));
        }

        let removed = halo_angle(stat.deletions);
        if removed > 0.0 {
            surface.append(Some(group), self.arc(-removed, 0.0, &self.removed));
        }
    }

    fn circle(&self, radius: f64, width: f64) -> Shape {
        Shape::Circle {
            center: Point::new(0.0, 0.0),
            radius,
            fill: self.fill.clone(),
            stroke: Stroke::new(self.outline.clone(), width),
        }
    }

    fn arc(&self, start: f64, end: f64, color: &str) -> Shape {
        Shape::Arc {
            center: Point::new(0.0, 0.0),
            radius: LOADED_RADIUS,
            start,
            end,
            stroke: Stroke::new(color, ARC_WIDTH),
        }
    }
}
