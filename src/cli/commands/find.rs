//! find command - Locate a commit in the layout by hash prefix

use anyhow::{bail, Context as _, Result};

use super::{open_history, Limits, Source};
use crate::cli::args::HistoryArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::render::RecordingSurface;
use crate::session::{Extender, GraphSession, HistorySource, SessionOptions, Viewport};
use crate::ui::output;

/// Lay out history until a commit matching `prefix` appears, then print
/// its hash, lane and row.
///
/// Reading stops at the first match, when history runs out, or at the
/// `--pages`/`--depth` limit.
pub fn find(ctx: &Context, prefix: &str, args: &HistoryArgs) -> Result<()> {
    let (source, config) = open_history(ctx, args)?;
    let limits = Limits::from_args(args, None);

    let rt = tokio::runtime::Runtime::new()?;
    let found = match source {
        Source::Git(pager) => rt.block_on(search(&pager, &config, prefix, limits)),
        Source::Json(history) => rt.block_on(search(&history, &config, prefix, limits)),
    }?;

    match found {
        Some(line) => {
            output::print(line, ctx.verbosity());
            Ok(())
        }
        None => bail!("No commit matching '{}'", prefix),
    }
}

async fn search(
    source: &dyn HistorySource,
    config: &Config,
    prefix: &str,
    limits: Limits,
) -> Result<Option<String>> {
    let mut surface = RecordingSurface::new();
    let mut session = GraphSession::new(SessionOptions {
        geometry: config.geometry(),
        theme: config.theme(),
        tooltips: false,
    });

    let first = source
        .first_page()
        .await
        .context("Failed to read history")?;
    let mut extender = Extender::new(first.token);
    session.append(first.commits, &mut surface);

    let mut pages = 1;
    loop {
        if let Some(commit) = session.find_commit(prefix)? {
            let (lane, row) = commit
                .placement()
                .map_or((0, 0), |p| (p.lane, p.row));
            return Ok(Some(format!("{} lane {} row {}", commit.hash, lane, row)));
        }
        if limits.reached(pages, session.len()) {
            return Ok(None);
        }

        let content = session.geometry().canvas_height(session.len());
        let viewport = Viewport::bottom_of(content, content);
        let extended = extender
            .extend(&viewport, &mut session, source, &mut surface)
            .await
            .context("Failed to read history")?;
        if extended.is_none() {
            return Ok(None);
        }
        pages += 1;
    }
}
