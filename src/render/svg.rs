//! render::svg
//!
//! A [`Surface`] that produces a standalone SVG document.
//!
//! Shapes are kept in a [`RecordingSurface`] tree and serialized on demand.
//! There is no font engine here, so text is measured as a fixed fraction
//! of the font size per character. That is close to the average advance of
//! common sans-serif faces and keeps label boxes from clipping their text.

use std::fmt::Write as _;

use crate::core::types::CommitHash;

use super::recording::RecordingSurface;
use super::surface::{Point, Shape, ShapeId, Stroke, Surface};

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    tree: RecordingSurface,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the current tree.
    pub fn to_document(&self) -> String {
        let (width, height) = self.tree.size();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(width.ceil()),
            h = num(height.ceil()),
        );
        for &id in self.tree.children(None) {
            self.write_node(&mut out, id, 1);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_node(&self, out: &mut String, id: ShapeId, depth: usize) {
        let Some(node) = self.tree.node(id) else {
            return;
        };
        let indent = "  ".repeat(depth);

        match &node.shape {
            Shape::Group { offset } => {
                let _ = write!(
                    out,
                    r#"{indent}<g transform="translate({} {})""#,
                    num(offset.x),
                    num(offset.y)
                );
                if let Some(commit) = &node.hover {
                    let _ = write!(out, r#" data-commit="{}""#, commit);
                }
                out.push_str(">\n");
                if let Some(tooltip) = &node.tooltip {
                    let _ = writeln!(out, "{indent}  <title>{}</title>", escape(tooltip));
                }
                for &child in &node.children {
                    self.write_node(out, child, depth + 1);
                }
                let _ = writeln!(out, "{indent}</g>");
            }
            Shape::Rect {
                origin,
                width,
                height,
                fill,
                stroke,
            } => {
                let _ = write!(
                    out,
                    r#"{indent}<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    num(origin.x),
                    num(origin.y),
                    num(*width),
                    num(*height),
                    escape(fill)
                );
                if let Some(stroke) = stroke {
                    write_stroke(out, stroke);
                }
                out.push_str("/>\n");
            }
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let _ = write!(
                    out,
                    r#"{indent}<circle cx="{}" cy="{}" r="{}" fill="{}""#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    escape(fill)
                );
                write_stroke(out, stroke);
                out.push_str("/>\n");
            }
            Shape::Polyline { points, stroke } => {
                let points: Vec<String> = points
                    .iter()
                    .map(|p| format!("{},{}", num(p.x), num(p.y)))
                    .collect();
                let _ = write!(
                    out,
                    r#"{indent}<polyline points="{}" fill="none""#,
                    points.join(" ")
                );
                write_stroke(out, stroke);
                out.push_str("/>\n");
            }
            Shape::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => {
                let from = arc_point(*center, *radius, *start);
                let to = arc_point(*center, *radius, *end);
                let large = if end - start > std::f64::consts::PI { 1 } else { 0 };
                let _ = write!(
                    out,
                    r#"{indent}<path d="M{} {}A{r} {r} 0 {large} 1 {} {}" fill="none""#,
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y),
                    r = num(*radius),
                );
                write_stroke(out, stroke);
                out.push_str("/>\n");
            }
            Shape::Text {
                origin,
                content,
                font_size,
                font_family,
            } => {
                let _ = writeln!(
                    out,
                    r#"{indent}<text x="{}" y="{}" font-size="{}px" font-family="{}">{}</text>"#,
                    num(origin.x),
                    num(origin.y),
                    num(*font_size),
                    escape(font_family),
                    escape(content)
                );
            }
        }
    }
}

impl Surface for SvgSurface {
    fn append(&mut self, parent: Option<ShapeId>, shape: Shape) -> ShapeId {
        self.tree.append(parent, shape)
    }

    fn insert_before(&mut self, parent: ShapeId, sibling: ShapeId, shape: Shape) -> ShapeId {
        self.tree.insert_before(parent, sibling, shape)
    }

    fn text_width(&self, text: ShapeId) -> f64 {
        match self.tree.shape(text) {
            Some(Shape::Text {
                content, font_size, ..
            }) => content.chars().count() as f64 * font_size * GLYPH_RATIO,
            _ => 0.0,
        }
    }

    fn attach_hover(&mut self, target: ShapeId, commit: &CommitHash) {
        self.tree.attach_hover(target, commit);
    }

    fn set_tooltip(&mut self, target: ShapeId, text: &str) {
        self.tree.set_tooltip(target, text);
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.tree.resize(width, height);
    }
}

/// Point on a circle at `angle` radians clockwise from the top.
fn arc_point(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.sin(),
        center.y - radius * angle.cos(),
    )
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        escape(&stroke.color),
        num(stroke.width)
    );
}

/// Format a coordinate with at most three decimals.
fn num(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(20.0), "20");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(1.0 / 3.0), "0.333");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn text_is_measured_from_font_size() {
        let mut surface = SvgSurface::new();
        let t = surface.append(
            None,
            Shape::Text {
                origin: Point::new(5.0, 15.0),
                content: "main".into(),
                font_size: 10.0,
                font_family: "sans-serif".into(),
            },
        );
        assert_eq!(surface.text_width(t), 24.0);
    }

    #[test]
    fn document_contains_shapes_and_hover_metadata() {
        let mut surface = SvgSurface::new();
        let group = surface.append(None, Shape::Group { offset: Point::new(20.0, 10.0) });
        surface.append(
            Some(group),
            Shape::Circle {
                center: Point::new(0.0, 0.0),
                radius: 7.0,
                fill: "#afafaf".into(),
                stroke: Stroke::new("#000000", 1.0),
            },
        );
        surface.attach_hover(group, &CommitHash::new("abcd").unwrap());
        surface.set_tooltip(group, "abcd <init> & more");
        surface.append(
            None,
            Shape::Polyline {
                points: vec![Point::new(20.0, 17.0), Point::new(20.0, 23.0)],
                stroke: Stroke::new("#7f0000", 2.0),
            },
        );
        surface.resize(120.4, 30.0);

        let doc = surface.to_document();
        assert!(doc.starts_with("<svg "));
        assert!(doc.contains(r#"width="121" height="30""#));
        assert!(doc.contains(r#"<g transform="translate(20 10)" data-commit="abcd">"#));
        assert!(doc.contains("<title>abcd &lt;init&gt; &amp; more</title>"));
        assert!(doc.contains(
            r##"<circle cx="0" cy="0" r="7" fill="#afafaf" stroke="#000000" stroke-width="1"/>"##
        ));
        assert!(doc.contains(r#"points="20,17 20,23""#));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn arc_path_starts_at_top_and_sweeps_clockwise() {
        let mut surface = SvgSurface::new();
        surface.append(
            None,
            Shape::Arc {
                center: Point::new(0.0, 0.0),
                radius: 6.0,
                start: 0.0,
                end: std::f64::consts::FRAC_PI_2,
                stroke: Stroke::new("green", 4.0),
            },
        );
        let doc = surface.to_document();
        assert!(doc.contains(r#"d="M0 -6A6 6 0 0 1 6 0""#));
    }
}
