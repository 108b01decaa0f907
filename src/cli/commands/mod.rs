//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves configuration and the history source
//! 2. Drives a [`GraphSession`](crate::session::GraphSession)
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! History sources are async. Handlers that read history build a tokio
//! runtime and `block_on` their async body, keeping `dispatch` synchronous.

mod completion;
mod config_cmd;
mod find;
mod render;

pub use completion::completion;
pub use config_cmd::config;
pub use find::find;
pub use render::render;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, HistoryArgs};
use crate::cli::Context;
use crate::core::config::Config;
use crate::git::{Git, HistoryPager, StartPoints};
use crate::ingest::JsonHistory;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Render(args) => render::render(ctx, &args),
        Command::Find { prefix, history } => find::find(ctx, &prefix, &history),
        Command::Config => config_cmd::config(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// A resolved history source.
pub(crate) enum Source {
    Git(HistoryPager),
    Json(JsonHistory),
}

/// How far to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Limits {
    pub pages: Option<usize>,
    pub depth: Option<usize>,
}

impl Limits {
    /// Limits for a command. With neither flag set, `default_pages` applies.
    pub fn from_args(args: &HistoryArgs, default_pages: Option<usize>) -> Self {
        let pages = match (args.pages, args.depth) {
            (None, None) => default_pages,
            (pages, _) => pages,
        };
        Self {
            pages,
            depth: args.depth,
        }
    }

    pub fn reached(&self, pages: usize, commits: usize) -> bool {
        self.pages.is_some_and(|max| pages >= max) || self.depth.is_some_and(|max| commits >= max)
    }
}

/// Load configuration and open the history source selected by `args`.
///
/// A history document is read with global config only. Otherwise the
/// repository containing the working directory is opened and its config
/// applies too. Flags win over both.
pub(crate) fn open_history(ctx: &Context, args: &HistoryArgs) -> Result<(Source, Config)> {
    if let Some(input) = &args.input {
        let config = Config::load(None).context("Failed to load config")?;
        let page_size = args.page_size.unwrap_or_else(|| config.page_size());
        let history = JsonHistory::from_path(input)
            .with_context(|| format!("Failed to load history from {}", input.display()))?
            .with_page_size(page_size);
        return Ok((Source::Json(history), config));
    }

    let cwd = ctx.cwd()?;
    let git = Git::open(&cwd).context("Failed to open repository")?;
    let config = Config::load(Some(git.root())).context("Failed to load config")?;

    let start = if args.all {
        StartPoints::All
    } else if let Some(branch) = args.branch.as_deref().or(config.branch()) {
        StartPoints::Branch(branch.to_string())
    } else if config.all_refs() {
        StartPoints::All
    } else {
        StartPoints::Head
    };
    let page_size = args.page_size.unwrap_or_else(|| config.page_size());

    let pager = HistoryPager::new(git.root().to_path_buf())
        .with_start(start)
        .with_page_size(page_size);
    Ok((Source::Git(pager), config))
}
