//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$LANEGRAPH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/lanegraph/config.toml`
//! 3. `~/.lanegraph/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/lanegraph/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing: sizes must be positive and
//! colors must look like CSS colors.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// page_size = 100
///
/// [layout]
/// column_width = 15.0
/// row_height = 20.0
///
/// [labels]
/// font_size = 12.0
/// font_family = "sans-serif"
///
/// [colors]
/// branch = "#00ff00"
/// tag = "#ffff00"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Commits per history page
    pub page_size: Option<usize>,

    /// Lane and row geometry
    pub layout: Option<LayoutConfig>,

    /// Reference label text
    pub labels: Option<LabelConfig>,

    /// Label and halo colors
    pub colors: Option<ColorConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_page_size(self.page_size)?;
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }
        if let Some(labels) = &self.labels {
            labels.validate()?;
        }
        if let Some(colors) = &self.colors {
            colors.validate()?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// branch = "main"
/// all = false
/// page_size = 200
///
/// [colors]
/// remote = "#ff8800"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Branch to start the walk from (default: HEAD)
    pub branch: Option<String>,

    /// Walk from every reference
    pub all: Option<bool>,

    /// Commits per history page
    pub page_size: Option<usize>,

    /// Label and halo colors
    pub colors: Option<ColorConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(branch) = &self.branch {
            if branch.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "branch cannot be empty".to_string(),
                ));
            }
        }
        validate_page_size(self.page_size)?;
        if let Some(colors) = &self.colors {
            colors.validate()?;
        }
        Ok(())
    }
}

fn validate_page_size(page_size: Option<usize>) -> Result<(), ConfigError> {
    if page_size == Some(0) {
        return Err(ConfigError::InvalidValue(
            "page_size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Lane and row geometry, in pixels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub column_width: Option<f64>,
    pub column_offset: Option<f64>,
    pub row_height: Option<f64>,
    pub row_offset: Option<f64>,
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("column_width", self.column_width),
            ("column_offset", self.column_offset),
            ("row_height", self.row_height),
            ("row_offset", self.row_offset),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "layout.{name} must be a positive number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Reference label text settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

impl LabelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.font_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "labels.font_size must be a positive number, got {size}"
                )));
            }
        }
        if let Some(family) = &self.font_family {
            if family.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "labels.font_family cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Colors for reference categories and diff halos.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub branch: Option<String>,
    pub remote: Option<String>,
    pub tag: Option<String>,
    pub other: Option<String>,
    pub added: Option<String>,
    pub removed: Option<String>,
}

impl ColorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("branch", &self.branch),
            ("remote", &self.remote),
            ("tag", &self.tag),
            ("other", &self.other),
            ("added", &self.added),
            ("removed", &self.removed),
        ];
        for (name, value) in fields {
            if let Some(color) = value {
                if !is_css_color(color) {
                    return Err(ConfigError::InvalidValue(format!(
                        "colors.{name}: '{color}' is not a color (use #rgb, #rrggbb or a name)"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fill unset fields from `fallback`.
    pub fn or(&self, fallback: &ColorConfig) -> ColorConfig {
        ColorConfig {
            branch: self.branch.clone().or_else(|| fallback.branch.clone()),
            remote: self.remote.clone().or_else(|| fallback.remote.clone()),
            tag: self.tag.clone().or_else(|| fallback.tag.clone()),
            other: self.other.clone().or_else(|| fallback.other.clone()),
            added: self.added.clone().or_else(|| fallback.added.clone()),
            removed: self.removed.clone().or_else(|| fallback.removed.clone()),
        }
    }
}

fn is_css_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
    }
}
