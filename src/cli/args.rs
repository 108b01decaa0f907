//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lanegraph - lane layout and SVG rendering for commit history
#[derive(Parser, Debug)]
#[command(name = "lanegraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if lanegraph was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render commit history to an SVG document
    #[command(
        name = "render",
        long_about = "Render commit history to an SVG document.\n\n\
            History is fetched page by page. After each page the graph is \
            treated as scrolled to the bottom, so the next page is appended \
            while lanes still wait for parents, up to --pages pages or \
            --depth commits.",
        after_help = "\
EXAMPLES:
    # Current branch, first page only
    lanegraph render -o graph.svg

    # Every reference, up to 400 commits
    lanegraph render --all --depth 400 -o graph.svg

    # Offline rendering from a history document
    lanegraph render --input history.json --pages 3"
    )]
    Render(RenderArgs),

    /// Print the lane and row of the first commit matching a hash prefix
    #[command(name = "find")]
    Find {
        /// Hash prefix (at least 4 characters)
        prefix: String,

        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Print the effective configuration as TOML
    #[command(name = "config")]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    lanegraph completion bash > ~/.local/share/bash-completion/completions/lanegraph

    # Zsh
    lanegraph completion zsh > ~/.zfunc/_lanegraph

    # Fish
    lanegraph completion fish > ~/.config/fish/completions/lanegraph.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where history comes from and how far to read it.
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Walk from this branch instead of HEAD
    #[arg(long, conflicts_with = "all")]
    pub branch: Option<String>,

    /// Walk from every reference
    #[arg(long)]
    pub all: bool,

    /// Commits per page (overrides config)
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    pub pages: Option<usize>,

    /// Stop extending once this many commits are laid out
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Read history from a JSON document instead of a repository
    #[arg(long, value_name = "FILE", conflicts_with_all = ["branch", "all"])]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub history: HistoryArgs,

    /// Do not fetch diff stats
    #[arg(long)]
    pub no_stats: bool,

    /// Attach hash and message tooltips to markers
    #[arg(long)]
    pub tooltips: bool,

    /// Write the SVG here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
