//! render command - Lay out history and write it as SVG

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use super::{open_history, Limits, Source};
use crate::cli::args::RenderArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::{CommitHash, DiffStat};
use crate::render::SvgSurface;
use crate::session::{
    Extender, GraphSession, HistoryError, HistorySource, SessionOptions, StatRequest, StatSource,
    Viewport,
};
use crate::ui::output::{self, Verbosity};

/// Height of the simulated viewport the graph is scrolled in.
const CLIENT_HEIGHT: f64 = 600.0;

type StatOutcome = (CommitHash, Result<DiffStat, HistoryError>);

/// Render history to SVG.
pub fn render(ctx: &Context, args: &RenderArgs) -> Result<()> {
    let (source, config) = open_history(ctx, &args.history)?;
    let limits = Limits::from_args(&args.history, Some(1));
    let verbosity = ctx.verbosity();

    let rt = tokio::runtime::Runtime::new()?;
    let (document, commits) = match source {
        Source::Git(pager) => rt.block_on(render_async(pager, &config, args, limits, verbosity)),
        Source::Json(history) => {
            rt.block_on(render_async(history, &config, args, limits, verbosity))
        }
    }?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success(
                format!("Rendered {} commits to {}", commits, path.display()),
                verbosity,
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write SVG to stdout")?;
        }
    }
    Ok(())
}

async fn render_async<S>(
    source: S,
    config: &Config,
    args: &RenderArgs,
    limits: Limits,
    verbosity: Verbosity,
) -> Result<(String, usize)>
where
    S: HistorySource + StatSource + 'static,
{
    let source = Arc::new(source);
    let mut surface = SvgSurface::new();
    let mut session = GraphSession::new(SessionOptions {
        geometry: config.geometry(),
        theme: config.theme(),
        tooltips: args.tooltips,
    });

    let refs = source.refs().await.context("Failed to read references")?;
    let first = source
        .first_page()
        .await
        .context("Failed to read history")?;

    session.merge_refs(refs, &mut surface);
    let mut extender = Extender::new(first.token);
    let summary = session.append(first.commits, &mut surface);

    let mut stats = JoinSet::new();
    if !args.no_stats {
        spawn_stats(&mut stats, &source, session.stat_requests(summary.rows));
    }

    let mut pages = 1;
    while !limits.reached(pages, session.len()) {
        while let Some(outcome) = stats.try_join_next() {
            apply_outcome(&mut session, &mut surface, outcome);
        }

        let content = session.geometry().canvas_height(session.len());
        let viewport = Viewport::bottom_of(content, CLIENT_HEIGHT);
        match extender
            .extend(&viewport, &mut session, &*source, &mut surface)
            .await
        {
            Ok(Some(summary)) => {
                pages += 1;
                if !args.no_stats {
                    spawn_stats(&mut stats, &source, session.stat_requests(summary.rows));
                }
            }
            Ok(None) => break,
            Err(err) => {
                output::warn(format!("stopped after {pages} page(s): {err}"), verbosity);
                break;
            }
        }
    }

    while let Some(outcome) = stats.join_next().await {
        apply_outcome(&mut session, &mut surface, outcome);
    }

    debug!(pages, commits = session.len(), width = session.width(), "render finished");
    Ok((surface.to_document(), session.len()))
}

fn spawn_stats<S>(stats: &mut JoinSet<StatOutcome>, source: &Arc<S>, requests: Vec<StatRequest>)
where
    S: StatSource + 'static,
{
    for StatRequest { parent, commit } in requests {
        let source = Arc::clone(source);
        stats.spawn(async move {
            let stat = source.diff_stat(&parent, &commit).await;
            (commit, stat)
        });
    }
}

fn apply_outcome(
    session: &mut GraphSession,
    surface: &mut SvgSurface,
    outcome: Result<StatOutcome, JoinError>,
) {
    match outcome {
        Ok((commit, Ok(stat))) => {
            session.apply_stat(&commit, stat, surface);
        }
        Ok((commit, Err(err))) => warn!(%commit, %err, "diff stat unavailable"),
        Err(err) => warn!(%err, "diff stat task failed"),
    }
}
