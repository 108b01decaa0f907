//! cli
//!
//! Command-line interface layer for lanegraph.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and pick a history source
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Layout and drawing live in [`crate::session`];
//! handlers only wire a [`HistorySource`](crate::session::HistorySource)
//! to a session and a surface, then write the result.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, HistoryArgs, RenderArgs, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::ui::output::Verbosity;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub cwd: Option<PathBuf>,
    pub debug: bool,
    pub quiet: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            cwd: cli.cwd.clone(),
            debug: cli.debug,
            quiet: cli.quiet,
        }
    }

    /// The directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application with already parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli);
    commands::dispatch(cli.command, &ctx)
}
