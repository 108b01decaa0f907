//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! lanegraph has two configuration scopes:
//! - **Global**: User-level settings (geometry, fonts, colors, page size)
//! - **Repo**: Repository-level overrides (start branch, colors, page size)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$LANEGRAPH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/lanegraph/config.toml`
//! 3. `~/.lanegraph/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/lanegraph/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use lanegraph::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("page size: {}", config.page_size());
//! println!("column width: {}", config.geometry().column_width);
//! ```

pub mod schema;

pub use schema::{ColorConfig, GlobalConfig, LabelConfig, LayoutConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::render::{Geometry, Theme};

/// Commits per page when nothing is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Repo config overrides
/// global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_path` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(repo_path: Option<&Path>) -> Result<Config, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path_found) = match repo_path {
            Some(path) => Self::load_repo(path)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path: repo_path_found,
        })
    }

    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("LANEGRAPH_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("lanegraph/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".lanegraph/config.toml"));
        }

        for path in candidates {
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    fn load_repo(repo_path: &Path) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        let path = Self::repo_config_path(repo_path);
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_config(&path)?;
        Ok((Some(config), Some(path)))
    }

    fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path of the repo config file for the repository at `repo_path`.
    pub fn repo_config_path(repo_path: &Path) -> PathBuf {
        repo_path.join(".git/lanegraph/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Commits per history page.
    ///
    /// Defaults to [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> usize {
        self.repo
            .as_ref()
            .and_then(|r| r.page_size)
            .or(self.global.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Configured start branch, if any.
    pub fn branch(&self) -> Option<&str> {
        self.repo.as_ref().and_then(|r| r.branch.as_deref())
    }

    /// Whether to walk from every reference.
    ///
    /// Defaults to `false`.
    pub fn all_refs(&self) -> bool {
        self.repo.as_ref().and_then(|r| r.all).unwrap_or(false)
    }

    /// Lane and row geometry.
    pub fn geometry(&self) -> Geometry {
        let mut geometry = Geometry::default();
        if let Some(layout) = &self.global.layout {
            if let Some(v) = layout.column_width {
                geometry.column_width = v;
            }
            if let Some(v) = layout.column_offset {
                geometry.column_offset = v;
            }
            if let Some(v) = layout.row_height {
                geometry.row_height = v;
            }
            if let Some(v) = layout.row_offset {
                geometry.row_offset = v;
            }
        }
        geometry
    }

    /// Colors and label font, repo colors taking precedence.
    pub fn theme(&self) -> Theme {
        let mut theme = Theme::default();

        if let Some(labels) = &self.global.labels {
            if let Some(size) = labels.font_size {
                theme.font_size = size;
            }
            if let Some(family) = &labels.font_family {
                theme.font_family = family.clone();
            }
        }

        let global_colors = self.global.colors.clone().unwrap_or_default();
        let colors = match self.repo.as_ref().and_then(|r| r.colors.as_ref()) {
            Some(repo_colors) => repo_colors.or(&global_colors),
            None => global_colors,
        };
        theme.apply_colors(&colors);
        theme
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_repo_config(dir: &Path, contents: &str) {
        let path = Config::repo_config_path(dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn defaults_without_files() {
        let config = Config::default();

        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert!(config.branch().is_none());
        assert!(!config.all_refs());
        assert_eq!(config.geometry(), Geometry::default());
        assert_eq!(config.theme(), Theme::default());
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        write_repo_config(
            temp.path(),
            r#"
            branch = "main"
            page_size = 7
            "#,
        );

        let config = Config::load(Some(temp.path())).unwrap();
        assert_eq!(config.branch(), Some("main"));
        assert_eq!(config.page_size(), 7);
        assert!(config.repo_config_loaded_from().is_some());
    }

    #[test]
    fn missing_repo_config_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(temp.path())).unwrap();
        assert!(config.repo.is_none());
    }

    #[test]
    fn invalid_repo_config_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(temp.path(), "page_size = 0");

        assert!(matches!(
            Config::load(Some(temp.path())),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unparseable_repo_config_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(temp.path(), "trunk = \"main\"");

        assert!(matches!(
            Config::load(Some(temp.path())),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: GlobalConfig {
                page_size: Some(10),
                colors: Some(ColorConfig {
                    tag: Some("#111111".into()),
                    branch: Some("#222222".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            repo: Some(RepoConfig {
                page_size: Some(20),
                colors: Some(ColorConfig {
                    tag: Some("#333333".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            global_path: None,
            repo_path: None,
        };

        assert_eq!(config.page_size(), 20);
        let theme = config.theme();
        assert_eq!(theme.tag, "#333333");
        assert_eq!(theme.branch, "#222222");
    }

    #[test]
    fn geometry_overrides_apply() {
        let config = Config {
            global: GlobalConfig {
                layout: Some(LayoutConfig {
                    column_width: Some(30.0),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let geometry = config.geometry();
        assert_eq!(geometry.column_width, 30.0);
        assert_eq!(geometry.row_height, Geometry::default().row_height);
    }
}
