//! render
//!
//! Geometry and drawing for the laid-out graph.
//!
//! # Modules
//!
//! - [`surface`] - The backend capability the layout draws through
//! - [`geometry`] - Lane/row to pixel mapping
//! - [`theme`] - Colors and fonts
//! - [`edges`] - Edge routing and coloring
//! - [`halo`] - Commit markers and diff halos
//! - [`refs`] - Reference label boxes
//! - [`svg`] - SVG document backend
//! - [`recording`] - Headless backend for tests
//!
//! Every renderer draws through [`Surface`]; none of them keeps layout
//! state. State lives in [`crate::session::GraphSession`].

pub mod edges;
pub mod geometry;
pub mod halo;
pub mod recording;
pub mod refs;
pub mod surface;
pub mod svg;
pub mod theme;

pub use edges::{ColorCounter, Edge, EdgeRouter, EDGE_PALETTE};
pub use geometry::Geometry;
pub use halo::{halo_angle, HaloRenderer};
pub use recording::RecordingSurface;
pub use refs::RefAnnotator;
pub use surface::{Point, Shape, ShapeId, Stroke, Surface};
pub use svg::SvgSurface;
pub use theme::Theme;
