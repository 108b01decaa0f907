//! session
//!
//! The owned layout session: commit store, lane pool, and color counter
//! behind one append-only API.
//!
//! # Passes
//!
//! [`GraphSession::append`] lays out one batch in three steps:
//!
//! 1. Every commit of the batch is placed (lane from the pool, row from
//!    arrival order) and receives refs from the retained snapshot.
//! 2. Row by row: edges from children placed in earlier batches, edges to
//!    the commit's own placed parents, the marker, then ref labels.
//! 3. Background bands for the new rows and a canvas resize.
//!
//! Enrichment ([`GraphSession::apply_stat`]) only touches the target
//! commit's stat and marker, so it may run between any two passes.
//!
//! # Surfaces
//!
//! A session draws into layer groups it creates on the first pass. Every
//! call after that must receive the same surface, until [`GraphSession::reset`].

pub mod extender;
pub mod source;

use std::collections::HashMap;
use std::ops::Range;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::lanes::LanePool;
use crate::core::store::{Commit, CommitRecord, CommitStore, Placement, StoreError};
use crate::core::types::{CommitHash, DiffStat, RefName};
use crate::render::edges::{ColorCounter, EdgeRouter, MARKER_GAP};
use crate::render::geometry::Geometry;
use crate::render::halo::HaloRenderer;
use crate::render::refs::RefAnnotator;
use crate::render::surface::{Point, Shape, ShapeId, Surface};
use crate::render::theme::Theme;

pub use extender::{ExtensionTicket, Extender, Skip, Viewport};
pub use source::{
    HistoryError, HistoryPage, HistorySource, RefSnapshot, SessionToken, StatSource,
};

/// Name, email and time of an author or committer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub time: DateTime<FixedOffset>,
}

/// Metadata handed to a [`DetailsHandler`] on hover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub hash: CommitHash,
    pub author: Signature,
    pub committer: Signature,
    /// Full message, not just the summary.
    pub message: String,
    /// Per-file change summary; only for single-parent commits.
    pub diff_summary: Option<String>,
    /// Line counts, if they have resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<DiffStat>,
}

/// Caller-supplied hover callback.
pub trait DetailsHandler {
    fn show_details(&mut self, details: &CommitDetails);
}

impl<F: FnMut(&CommitDetails)> DetailsHandler for F {
    fn show_details(&mut self, details: &CommitDetails) {
        self(details)
    }
}

/// A parent/child pair whose diff stat should be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRequest {
    pub parent: CommitHash,
    pub commit: CommitHash,
}

/// Horizontal positions recorded for a rendered row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    /// Rightmost x of the lines on this row.
    pub extent: f64,
    /// Where the next ref label on this row goes.
    pub label_cursor: f64,
}

/// Result of one [`GraphSession::append`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendSummary {
    /// Rows (and store indexes) the batch occupies.
    pub rows: Range<usize>,
    pub edges: usize,
    pub labels: usize,
}

#[derive(Debug, Clone, Copy)]
struct Layers {
    background: ShapeId,
    edges: ShapeId,
    markers: ShapeId,
    labels: ShapeId,
}

impl Layers {
    fn create(surface: &mut dyn Surface) -> Self {
        let mut layer = || {
            surface.append(
                None,
                Shape::Group {
                    offset: Point::new(0.0, 0.0),
                },
            )
        };
        Self {
            background: layer(),
            edges: layer(),
            markers: layer(),
            labels: layer(),
        }
    }
}

/// Session-level options.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub geometry: Geometry,
    pub theme: Theme,
    /// Attach a hash and message tooltip to every marker.
    pub tooltips: bool,
}

/// One incrementally built graph.
#[derive(Debug)]
pub struct GraphSession {
    store: CommitStore,
    lanes: LanePool,
    colors: ColorCounter,
    geometry: Geometry,
    theme: Theme,
    router: EdgeRouter,
    halo: HaloRenderer,
    annotator: RefAnnotator,
    tooltips: bool,
    layers: Option<Layers>,
    markers: HashMap<CommitHash, ShapeId>,
    rows: Vec<RowLayout>,
    width: f64,
    snapshot: RefSnapshot,
    refs_by_commit: HashMap<CommitHash, Vec<RefName>>,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl GraphSession {
    pub fn new(options: SessionOptions) -> Self {
        let SessionOptions {
            geometry,
            theme,
            tooltips,
        } = options;
        Self {
            store: CommitStore::new(),
            lanes: LanePool::new(),
            colors: ColorCounter::new(),
            router: EdgeRouter::new(geometry),
            halo: HaloRenderer::new(&theme),
            annotator: RefAnnotator::new(geometry, theme.clone()),
            geometry,
            theme,
            tooltips,
            layers: None,
            markers: HashMap::new(),
            rows: Vec::new(),
            width: 0.0,
            snapshot: RefSnapshot::new(),
            refs_by_commit: HashMap::new(),
        }
    }

    /// Lay out and draw a newest-first batch below the existing rows.
    ///
    /// Commits placed by earlier calls are never moved or redrawn.
    pub fn append(
        &mut self,
        batch: impl IntoIterator<Item = CommitRecord>,
        surface: &mut dyn Surface,
    ) -> AppendSummary {
        let layers = self.layers(surface);
        let range = self.store.append(batch);
        let mut summary = AppendSummary {
            rows: range.clone(),
            ..Default::default()
        };

        let mut spans = Vec::with_capacity(range.len());
        for index in range.clone() {
            spans.push(self.place(index));
        }

        for (index, span) in range.clone().zip(spans) {
            summary.edges += self.route_earlier_children(index, range.start, surface, layers);

            let Some(commit) = self.store.get(index) else {
                continue;
            };
            let routed = self.router.route_parents(
                &self.store,
                commit,
                &mut self.colors,
                surface,
                Some(layers.edges),
            );
            summary.edges += routed.edges.len();

            let through = self.geometry.lane_x(span.saturating_sub(1)) + MARKER_GAP;
            let extent = routed.extent.max(through);

            self.draw_marker(index, surface, layers);

            let start = self.annotator.start(extent);
            let cursor = match self.store.get(index) {
                Some(commit) => {
                    summary.labels += commit.refs.len();
                    let row = commit.row().unwrap_or(index);
                    self.annotator
                        .annotate(surface, Some(layers.labels), row, start, &commit.refs)
                }
                None => start,
            };
            self.width = self.width.max(cursor);
            self.rows.push(RowLayout {
                extent,
                label_cursor: cursor,
            });
        }

        for row in range.clone() {
            surface.append(
                Some(layers.background),
                Shape::Rect {
                    origin: Point::new(0.0, self.geometry.row_top(row)),
                    width: self.width.ceil(),
                    height: self.geometry.row_height,
                    fill: self.theme.band(row).to_string(),
                    stroke: None,
                },
            );
        }
        self.resize(surface);

        debug!(
            rows = ?summary.rows,
            edges = summary.edges,
            labels = summary.labels,
            lanes = self.lanes.len(),
            "laid out batch"
        );
        summary
    }

    /// Place the commit at `index` and attach snapshot refs. Returns the
    /// lane span of its row.
    fn place(&mut self, index: usize) -> usize {
        let Some(commit) = self.store.get(index) else {
            return 0;
        };
        let hash = commit.hash.clone();
        let assignment = self.lanes.assign(&hash, &commit.parents);
        let refs = self.refs_by_commit.get(&hash).cloned().unwrap_or_default();

        if let Some(commit) = self.store.get_mut(index) {
            commit.place(Placement {
                lane: assignment.lane,
                row: index,
            });
            commit.refs.extend(refs);
        }
        assignment.span
    }

    /// Draw edges into the commit at `index` from children that were laid
    /// out before this batch.
    fn route_earlier_children(
        &mut self,
        index: usize,
        batch_start: usize,
        surface: &mut dyn Surface,
        layers: Layers,
    ) -> usize {
        let Some(parent) = self.store.get(index) else {
            return 0;
        };
        let mut drawn = 0;
        for child_hash in self.store.children(&parent.hash) {
            let Some(child_index) = self.store.index_of(child_hash) else {
                continue;
            };
            if child_index >= batch_start {
                continue;
            }
            let child = &self.store.commits()[child_index];
            for (position, hash) in child.parents.iter().enumerate() {
                if hash != &parent.hash {
                    continue;
                }
                if self
                    .router
                    .route_edge(
                        child,
                        position,
                        parent,
                        &mut self.colors,
                        surface,
                        Some(layers.edges),
                    )
                    .is_some()
                {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_marker(&mut self, index: usize, surface: &mut dyn Surface, layers: Layers) {
        let Some(commit) = self.store.get(index) else {
            return;
        };
        let Some(Placement { lane, row }) = commit.placement() else {
            return;
        };
        let group = self.halo.draw_marker(
            surface,
            Some(layers.markers),
            self.geometry.center(lane, row),
            commit.stat,
        );
        surface.attach_hover(group, &commit.hash);
        if self.tooltips {
            surface.set_tooltip(group, &format!("{}\n{}", commit.hash, commit.message));
        }
        self.markers.insert(commit.hash.clone(), group);
    }

    /// Merge a reference snapshot.
    ///
    /// Refs pointing at rendered commits are labelled right away; the
    /// snapshot is retained and applied to commits appended later. Refs are
    /// not de-duplicated against earlier merges.
    pub fn merge_refs(&mut self, snapshot: RefSnapshot, surface: &mut dyn Surface) -> usize {
        self.refs_by_commit.clear();
        for (name, hash) in &snapshot {
            self.refs_by_commit
                .entry(hash.clone())
                .or_default()
                .push(name.clone());
        }
        self.snapshot = snapshot;

        if self.store.is_empty() {
            return 0;
        }

        let layers = self.layers(surface);
        let mut targets: Vec<_> = self
            .refs_by_commit
            .iter()
            .filter_map(|(hash, names)| self.store.index_of(hash).map(|i| (i, names)))
            .collect();
        targets.sort_by_key(|(index, _)| *index);

        let mut labelled = 0;
        for (index, names) in targets {
            let Some(row) = self.rows.get_mut(index) else {
                continue;
            };
            row.label_cursor =
                self.annotator
                    .annotate(surface, Some(layers.labels), index, row.label_cursor, names);
            self.width = self.width.max(row.label_cursor);
            labelled += names.len();

            if let Some(commit) = self.store.get_mut(index) {
                commit.refs.extend(names.iter().cloned());
            }
        }
        self.resize(surface);
        debug!(labelled, refs = self.snapshot.len(), "merged refs");
        labelled
    }

    /// Record a resolved diff stat and draw its halo.
    ///
    /// Returns `false` for unknown commits and for a stat equal to the one
    /// already recorded. A commit that is not yet drawn keeps the stat and
    /// gets a loaded marker when it is.
    pub fn apply_stat(
        &mut self,
        hash: &CommitHash,
        stat: DiffStat,
        surface: &mut dyn Surface,
    ) -> bool {
        let Some(commit) = self.store.lookup_mut(hash) else {
            debug!(commit = %hash, "stat for unknown commit");
            return false;
        };
        if commit.stat == Some(stat) {
            return false;
        }
        commit.stat = Some(stat);
        if let Some(&group) = self.markers.get(hash) {
            self.halo.draw_halo(surface, group, stat);
        }
        true
    }

    /// Fetch details for a hovered commit and pass them to `handler`.
    ///
    /// Returns `Ok(false)` if the commit is not part of this session.
    pub async fn hover(
        &self,
        hash: &CommitHash,
        source: &dyn StatSource,
        handler: &mut dyn DetailsHandler,
    ) -> Result<bool, HistoryError> {
        let Some(commit) = self.store.lookup(hash) else {
            return Ok(false);
        };
        let mut details = source.details(hash).await?;
        details.stat = commit.stat;
        handler.show_details(&details);
        Ok(true)
    }

    /// Stats worth fetching for `rows`: single-parent commits only.
    pub fn stat_requests(&self, rows: Range<usize>) -> Vec<StatRequest> {
        rows.filter_map(|i| self.store.get(i))
            .filter(|c| c.stat.is_none())
            .filter_map(|c| match c.parents.as_slice() {
                [parent] => Some(StatRequest {
                    parent: parent.clone(),
                    commit: c.hash.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// First commit whose hash starts with `prefix`.
    pub fn find_commit(&self, prefix: &str) -> Result<Option<&Commit>, StoreError> {
        self.store.find_by_prefix(prefix)
    }

    /// Drop all layout state, refs and layers.
    pub fn reset(&mut self) {
        self.store.reset();
        self.lanes.reset();
        self.colors.reset();
        self.layers = None;
        self.markers.clear();
        self.rows.clear();
        self.width = 0.0;
        self.snapshot.clear();
        self.refs_by_commit.clear();
    }

    fn layers(&mut self, surface: &mut dyn Surface) -> Layers {
        *self.layers.get_or_insert_with(|| Layers::create(surface))
    }

    fn resize(&self, surface: &mut dyn Surface) {
        surface.resize(
            self.width.ceil(),
            self.geometry.canvas_height(self.store.len()),
        );
    }

    pub fn store(&self) -> &CommitStore {
        &self.store
    }

    pub fn lanes(&self) -> &LanePool {
        &self.lanes
    }

    pub fn colors(&self) -> ColorCounter {
        self.colors
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Canvas width reached so far. Never shrinks until reset.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn row_layout(&self, row: usize) -> Option<RowLayout> {
        self.rows.get(row).copied()
    }

    pub fn marker(&self, hash: &CommitHash) -> Option<ShapeId> {
        self.markers.get(hash).copied()
    }

    pub fn snapshot(&self) -> &RefSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingSurface;

    fn h(s: &str) -> CommitHash {
        CommitHash::new(s).unwrap()
    }

    fn rec(hash: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord::new(h(hash), parents.iter().map(|p| h(p)).collect(), hash)
    }

    fn snapshot(entries: &[(&str, &str)]) -> RefSnapshot {
        entries
            .iter()
            .map(|(name, hash)| (RefName::new(*name).unwrap(), h(hash)))
            .collect()
    }

    fn lane_of(session: &GraphSession, hash: &str) -> usize {
        session.store().lookup(&h(hash)).unwrap().lane().unwrap()
    }

    #[test]
    fn linear_history_lays_out_in_one_lane() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        let summary = session.append(
            [rec("cccc", &["bbbb"]), rec("bbbb", &["aaaa"]), rec("aaaa", &[])],
            &mut surface,
        );

        assert_eq!(summary.rows, 0..3);
        assert_eq!(summary.edges, 2);
        for hash in ["cccc", "bbbb", "aaaa"] {
            assert_eq!(lane_of(&session, hash), 0);
        }
        assert_eq!(session.colors().current(), 0);
        assert_eq!(surface.polylines().len(), 2);
    }

    #[test]
    fn lane_changing_edges_avoid_unrelated_markers() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.append(
            [
                rec("1111", &["aaaa"]),
                rec("2222", &["aaaa"]),
                rec("3333", &["bbbb"]),
                rec("aaaa", &[]),
                rec("bbbb", &[]),
            ],
            &mut surface,
        );
        assert_eq!(lane_of(&session, "2222"), 1);
        assert_eq!(lane_of(&session, "3333"), 1);

        let centers: Vec<_> = session
            .store()
            .commits()
            .iter()
            .filter_map(|c| c.placement())
            .map(|p| session.geometry().center(p.lane, p.row))
            .collect();

        for (points, _) in surface.polylines() {
            for segment in points.windows(2) {
                let (a, b) = (segment[0], segment[1]);
                for center in &centers {
                    let cross = (b.x - a.x) * (center.y - a.y) - (b.y - a.y) * (center.x - a.x);
                    let within = center.x >= a.x.min(b.x)
                        && center.x <= a.x.max(b.x)
                        && center.y >= a.y.min(b.y)
                        && center.y <= a.y.max(b.y);
                    assert!(
                        !(cross.abs() < 1e-9 && within),
                        "segment {a:?}-{b:?} crosses marker at {center:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn rows_follow_arrival_across_batches() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.append([rec("cccc", &["bbbb"])], &mut surface);
        let second = session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);

        assert_eq!(second.rows, 1..3);
        let rows: Vec<_> = session
            .store()
            .commits()
            .iter()
            .map(|c| c.row().unwrap())
            .collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn earlier_placements_survive_later_batches() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.append([rec("eeee", &["aaaa"]), rec("ffff", &["bbbb"])], &mut surface);
        let before: Vec<_> = session
            .store()
            .commits()
            .iter()
            .map(|c| c.placement())
            .collect();

        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);

        let after: Vec<_> = session.store().commits()[..2]
            .iter()
            .map(|c| c.placement())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn edges_cross_batch_boundaries() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        let first = session.append([rec("cccc", &["bbbb"])], &mut surface);
        assert_eq!(first.edges, 0);

        let second = session.append([rec("bbbb", &[])], &mut surface);
        assert_eq!(second.edges, 1);
        assert_eq!(surface.polylines().len(), 1);
    }

    #[test]
    fn color_counter_persists_across_passes() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.append(
            [rec("dddd", &["bbbb", "cccc"]), rec("bbbb", &[]), rec("cccc", &[])],
            &mut surface,
        );
        // one merge edge after the first-parent run
        assert_eq!(session.colors().current(), 1);

        session.append([rec("eeee", &[]), rec("ffff", &["eeee"])], &mut surface);
        // ffff is the child of eeee appended after it: parent row before child
        assert_eq!(session.colors().current(), 1);
    }

    #[test]
    fn markers_are_hover_targets_with_optional_tooltips() {
        let mut session = GraphSession::new(SessionOptions {
            tooltips: true,
            ..Default::default()
        });
        let mut surface = RecordingSurface::new();

        session.append([rec("abcd1234", &[])], &mut surface);

        let marker = session.marker(&h("abcd1234")).unwrap();
        assert_eq!(surface.hover_targets(&h("abcd1234")), vec![marker]);
        assert_eq!(
            surface.node(marker).unwrap().tooltip.as_deref(),
            Some("abcd1234\nabcd1234")
        );
    }

    #[test]
    fn snapshot_refs_label_rows_as_they_arrive() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::with_glyph_width(6.0);

        session.merge_refs(
            snapshot(&[("refs/heads/main", "bbbb"), ("refs/tags/v1", "aaaa")]),
            &mut surface,
        );
        let summary = session.append([rec("bbbb", &["aaaa"])], &mut surface);
        assert_eq!(summary.labels, 1);

        session.append([rec("aaaa", &[])], &mut surface);

        let texts: Vec<_> = surface.labels().into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["main", "v1"]);
        assert_eq!(
            session.store().lookup(&h("aaaa")).unwrap().refs,
            vec![RefName::new("refs/tags/v1").unwrap()]
        );
    }

    #[test]
    fn labels_start_right_of_the_row_extent() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::with_glyph_width(6.0);

        session.merge_refs(snapshot(&[("refs/heads/main", "bbbb")]), &mut surface);
        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);

        let row = session.row_layout(0).unwrap();
        // lane 0 center is 20; marker edge adds 7
        assert_eq!(row.extent, 27.0);
        let label = &surface.labels()[0];
        assert_eq!(label.offset, Point::new(42.0, 0.0));
        assert_eq!(row.label_cursor, 42.0 + 24.0 + 15.0);
        assert_eq!(session.width(), row.label_cursor);
    }

    #[test]
    fn late_refs_label_rendered_rows_immediately() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::with_glyph_width(6.0);
        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);
        let width = session.width();

        let labelled = session.merge_refs(snapshot(&[("refs/heads/feature", "aaaa")]), &mut surface);

        assert_eq!(labelled, 1);
        assert_eq!(surface.labels()[0].text, "feature");
        assert!(session.width() > width);
    }

    #[test]
    fn remerging_a_snapshot_duplicates_refs() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.append([rec("aaaa", &[])], &mut surface);

        let refs = snapshot(&[("refs/heads/main", "aaaa")]);
        session.merge_refs(refs.clone(), &mut surface);
        session.merge_refs(refs, &mut surface);

        assert_eq!(session.store().lookup(&h("aaaa")).unwrap().refs.len(), 2);
    }

    #[test]
    fn width_never_shrinks() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.merge_refs(snapshot(&[("refs/heads/a-long-branch-name", "cccc")]), &mut surface);
        session.append([rec("cccc", &["bbbb"])], &mut surface);
        let wide = session.width();

        session.append([rec("bbbb", &[])], &mut surface);
        assert_eq!(session.width(), wide);
        assert_eq!(surface.size().0, wide.ceil());
    }

    #[test]
    fn canvas_height_tracks_row_count() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();

        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);
        assert_eq!(surface.size().1, 50.0);
    }

    #[test]
    fn background_bands_alternate() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        let theme = Theme::default();

        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);

        let background = surface.children(None)[0];
        let fills: Vec<_> = surface
            .rects_in(Some(background))
            .into_iter()
            .map(|s| match s {
                Shape::Rect { fill, .. } => fill.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(fills, vec![theme.band_light, theme.band_dark]);
    }

    #[test]
    fn apply_stat_is_idempotent() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.append([rec("bbbb", &["aaaa"]), rec("aaaa", &[])], &mut surface);
        let marker = session.marker(&h("bbbb")).unwrap();

        assert!(session.apply_stat(&h("bbbb"), DiffStat::new(9, 0), &mut surface));
        let shapes = surface.len();
        assert!(!session.apply_stat(&h("bbbb"), DiffStat::new(9, 0), &mut surface));

        assert_eq!(surface.len(), shapes);
        assert_eq!(surface.arcs_in(marker).len(), 1);
    }

    #[test]
    fn apply_stat_never_moves_commits() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.append([rec("bbbb", &["aaaa"])], &mut surface);
        let before = session.store().lookup(&h("bbbb")).unwrap().placement();

        session.apply_stat(&h("bbbb"), DiffStat::new(3, 4), &mut surface);
        session.append([rec("aaaa", &[])], &mut surface);

        assert_eq!(session.store().lookup(&h("bbbb")).unwrap().placement(), before);
    }

    #[test]
    fn unknown_commit_stat_is_ignored() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        assert!(!session.apply_stat(&h("ffff"), DiffStat::new(1, 1), &mut surface));
    }

    #[test]
    fn stat_requests_skip_roots_and_merges() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        let summary = session.append(
            [
                rec("dddd", &["bbbb", "cccc"]),
                rec("cccc", &["aaaa"]),
                rec("bbbb", &["aaaa"]),
                rec("aaaa", &[]),
            ],
            &mut surface,
        );

        let requests = session.stat_requests(summary.rows);
        let commits: Vec<_> = requests.iter().map(|r| r.commit.as_str()).collect();
        assert_eq!(commits, vec!["cccc", "bbbb"]);
        assert_eq!(requests[0].parent, h("aaaa"));
    }

    #[test]
    fn find_commit_guards_short_prefixes() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.append([rec("abcd1234", &[])], &mut surface);

        assert!(session.find_commit("abc").is_err());
        assert_eq!(
            session.find_commit("abcd").unwrap().unwrap().hash,
            h("abcd1234")
        );
        assert!(session.find_commit("beef").unwrap().is_none());
    }

    #[test]
    fn reset_clears_layout_state() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.merge_refs(snapshot(&[("refs/heads/main", "aaaa")]), &mut surface);
        session.append(
            [rec("dddd", &["bbbb", "cccc"]), rec("bbbb", &[])],
            &mut surface,
        );

        session.reset();

        assert!(session.is_empty());
        assert!(!session.lanes().has_pending());
        assert_eq!(session.colors().current(), 0);
        assert_eq!(session.width(), 0.0);
        assert!(session.snapshot().is_empty());

        let mut fresh = RecordingSurface::new();
        session.append([rec("aaaa", &[])], &mut fresh);
        assert!(session.store().lookup(&h("aaaa")).unwrap().refs.is_empty());
        assert_eq!(fresh.children(None).len(), 4);
    }

    struct FixedDetails;

    #[async_trait::async_trait]
    impl StatSource for FixedDetails {
        async fn diff_stat(
            &self,
            _parent: &CommitHash,
            _commit: &CommitHash,
        ) -> Result<DiffStat, HistoryError> {
            Ok(DiffStat::new(1, 1))
        }

        async fn details(&self, commit: &CommitHash) -> Result<CommitDetails, HistoryError> {
            let time = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
            let who = Signature {
                name: "Test".into(),
                email: "test@example.com".into(),
                time,
            };
            Ok(CommitDetails {
                hash: commit.clone(),
                author: who.clone(),
                committer: who,
                message: "full message\n\nbody".into(),
                diff_summary: None,
                stat: None,
            })
        }
    }

    #[tokio::test]
    async fn hover_passes_details_with_known_stat() {
        let mut session = GraphSession::default();
        let mut surface = RecordingSurface::new();
        session.append([rec("bbbb", &["aaaa"])], &mut surface);
        session.apply_stat(&h("bbbb"), DiffStat::new(2, 5), &mut surface);

        let mut seen = Vec::new();
        let mut handler = |d: &CommitDetails| seen.push(d.clone());
        let shown = session
            .hover(&h("bbbb"), &FixedDetails, &mut handler)
            .await
            .unwrap();

        assert!(shown);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "full message\n\nbody");
        assert_eq!(seen[0].stat, Some(DiffStat::new(2, 5)));
    }

    #[tokio::test]
    async fn hover_on_unknown_commit_does_nothing() {
        let session = GraphSession::default();
        let mut calls = 0;
        let mut handler = |_: &CommitDetails| calls += 1;

        let shown = session
            .hover(&h("ffff"), &FixedDetails, &mut handler)
            .await
            .unwrap();

        assert!(!shown);
        assert_eq!(calls, 0);
    }
}
