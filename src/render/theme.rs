//! render::theme
//!
//! Colors and fonts used by the renderers.

use crate::core::config::ColorConfig;
use crate::core::types::RefCategory;

/// Visual settings shared by the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub branch: String,
    pub remote: String,
    pub tag: String,
    pub other: String,
    /// Insertion halo
    pub added: String,
    /// Deletion halo
    pub removed: String,
    pub marker_fill: String,
    pub marker_stroke: String,
    /// Row background bands, alternating from row 0
    pub band_light: String,
    pub band_dark: String,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            branch: "#00ff00".into(),
            remote: "#ffaf7f".into(),
            tag: "#ffff00".into(),
            other: "#7f7f7f".into(),
            added: "green".into(),
            removed: "red".into(),
            marker_fill: "#afafaf".into(),
            marker_stroke: "#000000".into(),
            band_light: "#ffffff".into(),
            band_dark: "#efefef".into(),
            font_size: 12.0,
            font_family: "sans-serif".into(),
        }
    }
}

impl Theme {
    /// Box color for a reference category.
    pub fn ref_color(&self, category: RefCategory) -> &str {
        match category {
            RefCategory::Branch => &self.branch,
            RefCategory::Remote => &self.remote,
            RefCategory::Tag => &self.tag,
            RefCategory::Other => &self.other,
        }
    }

    pub fn band(&self, row: usize) -> &str {
        if row % 2 == 0 {
            &self.band_light
        } else {
            &self.band_dark
        }
    }

    /// Override colors that are set in `colors`.
    pub fn apply_colors(&mut self, colors: &ColorConfig) {
        let slots = [
            (&mut self.branch, &colors.branch),
            (&mut self.remote, &colors.remote),
            (&mut self.tag, &colors.tag),
            (&mut self.other, &colors.other),
            (&mut self.added, &colors.added),
            (&mut self.removed, &colors.removed),
        ];
        for (slot, value) in slots {
            if let Some(color) = value {
                *slot = color.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_colors_by_category() {
        let theme = Theme::default();
        assert_eq!(theme.ref_color(RefCategory::Branch), "#00ff00");
        assert_eq!(theme.ref_color(RefCategory::Tag), "#ffff00");
        assert_eq!(theme.ref_color(RefCategory::Other), "#7f7f7f");
    }

    #[test]
    fn apply_colors_only_touches_set_fields() {
        let mut theme = Theme::default();
        theme.apply_colors(&ColorConfig {
            added: Some("#00aa00".into()),
            ..Default::default()
        });
        assert_eq!(theme.added, "#00aa00");
        assert_eq!(theme.removed, "red");
    }

    #[test]
    fn bands_alternate() {
        let theme = Theme::default();
        assert_eq!(theme.band(0), theme.band(2));
        assert_ne!(theme.band(0), theme.band(1));
    }
}
