//! config command - Print the effective configuration

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::config::{ColorConfig, Config, LabelConfig, LayoutConfig};
use crate::git::Git;
use crate::ui::output;

/// Resolved values, shaped like a config file.
#[derive(Debug, Serialize)]
struct Effective {
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    all: bool,
    layout: LayoutConfig,
    labels: LabelConfig,
    colors: ColorConfig,
}

impl Effective {
    fn resolve(config: &Config) -> Self {
        let geometry = config.geometry();
        let theme = config.theme();
        Self {
            page_size: config.page_size(),
            branch: config.branch().map(str::to_string),
            all: config.all_refs(),
            layout: LayoutConfig {
                column_width: Some(geometry.column_width),
                column_offset: Some(geometry.column_offset),
                row_height: Some(geometry.row_height),
                row_offset: Some(geometry.row_offset),
            },
            labels: LabelConfig {
                font_size: Some(theme.font_size),
                font_family: Some(theme.font_family),
            },
            colors: ColorConfig {
                branch: Some(theme.branch),
                remote: Some(theme.remote),
                tag: Some(theme.tag),
                other: Some(theme.other),
                added: Some(theme.added),
                removed: Some(theme.removed),
            },
        }
    }
}

/// Print the merged configuration as TOML.
///
/// Outside a repository only global config applies.
pub fn config(ctx: &Context) -> Result<()> {
    let cwd = ctx.cwd()?;
    let git = Git::open(&cwd).ok();
    let config =
        Config::load(git.as_ref().map(|g| g.root())).context("Failed to load config")?;

    let verbosity = ctx.verbosity();
    output::print(
        format!("# global: {}", describe(config.global_config_loaded_from())),
        verbosity,
    );
    output::print(
        format!("# repo: {}", describe(config.repo_config_loaded_from())),
        verbosity,
    );

    let rendered =
        toml::to_string(&Effective::resolve(&config)).context("Failed to format config")?;
    print!("{}", rendered);
    Ok(())
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RepoConfig;

    #[test]
    fn defaults_render_every_key() {
        let rendered = toml::to_string(&Effective::resolve(&Config::default())).unwrap();
        assert!(rendered.contains("page_size = 50"));
        assert!(rendered.contains("all = false"));
        let table: toml::Table = toml::from_str(&rendered).unwrap();
        assert!(table.get("branch").is_none());
        assert!(rendered.contains("[layout]"));
        assert!(rendered.contains("column_width = 15.0"));
        assert!(rendered.contains("font_family = \"sans-serif\""));
        assert!(rendered.contains("added = \"green\""));
    }

    #[test]
    fn configured_branch_is_listed_at_top_level() {
        let mut config = Config::default();
        config.repo = Some(RepoConfig {
            branch: Some("trunk".to_string()),
            ..RepoConfig::default()
        });
        let rendered = toml::to_string(&Effective::resolve(&config)).unwrap();
        let table: toml::Table = toml::from_str(&rendered).unwrap();
        assert_eq!(table["branch"].as_str(), Some("trunk"));
        assert!(table["colors"].get("branch").is_some());
    }

    #[test]
    fn output_parses_back_as_config() {
        let rendered = toml::to_string(&Effective::resolve(&Config::default())).unwrap();
        let table: toml::Table = toml::from_str(&rendered).unwrap();
        assert_eq!(table["colors"]["removed"].as_str(), Some("red"));
    }
}
