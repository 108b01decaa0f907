//! render::refs
//!
//! Reference label boxes to the right of the graph.
//!
//! Each label is a group translated to the row's top edge. The text goes in
//! first; its measured width then sizes a colored box that is inserted
//! behind it.

use crate::core::types::RefName;

use super::geometry::Geometry;
use super::surface::{Point, Shape, ShapeId, Surface};
use super::theme::Theme;

/// Horizontal padding added to the text width to size a box.
pub const LABEL_PADDING: f64 = 10.0;
/// Cursor advance beyond the text width.
pub const LABEL_ADVANCE: f64 = 15.0;
/// Text origin inside a label group.
pub const TEXT_INSET: Point = Point { x: 5.0, y: 15.0 };

/// Places label boxes and advances a horizontal cursor.
#[derive(Debug, Clone)]
pub struct RefAnnotator {
    geometry: Geometry,
    theme: Theme,
}

impl RefAnnotator {
    pub fn new(geometry: Geometry, theme: Theme) -> Self {
        Self { geometry, theme }
    }

    /// Where the first label of a row goes, given the row's edge extent.
    pub fn start(&self, extent: f64) -> f64 {
        extent + self.geometry.column_width
    }

    /// Draw one label per ref on `row`, starting at `cursor`.
    ///
    /// Returns the cursor after the last label.
    pub fn annotate(
        &self,
        surface: &mut dyn Surface,
        layer: Option<ShapeId>,
        row: usize,
        mut cursor: f64,
        refs: &[RefName],
    ) -> f64 {
        let top = self.geometry.row_top(row);
        for name in refs {
            let group = surface.append(
                layer,
                Shape::Group {
                    offset: Point::new(cursor, top),
                },
            );
            let text = surface.append(
                Some(group),
                Shape::Text {
                    origin: TEXT_INSET,
                    content: name.label().to_string(),
                    font_size: self.theme.font_size,
                    font_family: self.theme.font_family.clone(),
                },
            );

            let width = surface.text_width(text);
            surface.insert_before(
                group,
                text,
                Shape::Rect {
                    origin: Point::new(0.0, 0.0),
                    width: width + LABEL_PADDING,
                    height: self.geometry.row_height,
                    fill: self.theme.ref_color(name.category()).to_string(),
                    stroke: None,
                },
            );

            cursor += width + LABEL_ADVANCE;
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingSurface;

    fn r(s: &str) -> RefName {
        RefName::new(s).unwrap()
    }

    #[test]
    fn branch_and_tag_labels_strip_prefix_and_use_category_color() {
        let theme = Theme::default();
        let annotator = RefAnnotator::new(Geometry::default(), theme.clone());
        let mut surface = RecordingSurface::with_glyph_width(6.0);

        annotator.annotate(
            &mut surface,
            None,
            0,
            40.0,
            &[r("refs/heads/main"), r("refs/tags/v1")],
        );

        let labels = surface.labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "main");
        assert_eq!(labels[0].fill, theme.branch);
        assert_eq!(labels[1].text, "v1");
        assert_eq!(labels[1].fill, theme.tag);
    }

    #[test]
    fn boxes_sized_from_measured_text_and_drawn_behind_it() {
        let annotator = RefAnnotator::new(Geometry::default(), Theme::default());
        let mut surface = RecordingSurface::with_glyph_width(6.0);

        let end = annotator.annotate(&mut surface, None, 2, 40.0, &[r("refs/heads/main")]);

        let label = &surface.labels()[0];
        // "main" is 4 glyphs of 6px
        assert_eq!(label.box_width, 34.0);
        assert!(label.box_behind_text);
        assert_eq!(label.offset, Point::new(40.0, 40.0));
        assert_eq!(end, 40.0 + 24.0 + LABEL_ADVANCE);
    }

    #[test]
    fn cursor_advances_across_labels() {
        let annotator = RefAnnotator::new(Geometry::default(), Theme::default());
        let mut surface = RecordingSurface::with_glyph_width(5.0);

        let end = annotator.annotate(
            &mut surface,
            None,
            0,
            0.0,
            &[r("refs/remotes/origin/x"), r("HEAD")],
        );

        let labels = surface.labels();
        assert_eq!(labels[0].text, "origin/x");
        assert_eq!(labels[1].offset.x, 40.0 + LABEL_ADVANCE);
        assert_eq!(labels[1].text, "HEAD");
        assert_eq!(end, 40.0 + LABEL_ADVANCE + 20.0 + LABEL_ADVANCE);
    }

    #[test]
    fn no_refs_leaves_cursor() {
        let annotator = RefAnnotator::new(Geometry::default(), Theme::default());
        let mut surface = RecordingSurface::new();
        assert_eq!(annotator.start(27.0), 42.0);
        assert_eq!(annotator.annotate(&mut surface, None, 0, 42.0, &[]), 42.0);
    }
}
