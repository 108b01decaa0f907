//! session::extender
//!
//! Fetches more history when the viewport reaches the bottom.
//!
//! # Gating
//!
//! An extension starts only when all of these hold:
//!
//! - the viewport is scrolled to the bottom
//! - no other extension is in flight
//! - the source issued a pagination token
//! - some lane still awaits a commit that has not arrived
//!
//! Starting hands out an [`ExtensionTicket`]. Completing with that ticket
//! appends the page and reopens the gate. A failed fetch consumes the ticket
//! and leaves the gate closed for the rest of the session.

use tracing::{debug, warn};

use crate::core::store::CommitRecord;
use crate::render::surface::Surface;

use super::source::{HistoryError, HistoryPage, HistorySource, SessionToken};
use super::{AppendSummary, GraphSession};

/// Scroll position of whatever displays the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub client_height: f64,
    pub content_height: f64,
}

impl Viewport {
    /// A viewport showing the last `client_height` pixels of the content.
    pub fn bottom_of(content_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: (content_height - client_height).max(0.0),
            client_height,
            content_height,
        }
    }

    pub fn at_bottom(&self) -> bool {
        self.content_height <= self.scroll_top + self.client_height
    }
}

/// Proof that an extension was started. Not cloneable: one ticket, one
/// outcome.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an unfinished ticket blocks further extension"]
pub struct ExtensionTicket {
    id: u64,
    token: SessionToken,
}

impl ExtensionTicket {
    pub fn token(&self) -> SessionToken {
        self.token
    }
}

/// Why an extension did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NotAtBottom,
    InFlight,
    NoSession,
    NothingPending,
}

#[derive(Debug, Default)]
pub struct Extender {
    token: Option<SessionToken>,
    in_flight: Option<u64>,
    issued: u64,
}

impl Extender {
    pub fn new(token: Option<SessionToken>) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Check the gate without starting anything.
    pub fn check(&self, viewport: &Viewport, session: &GraphSession) -> Result<SessionToken, Skip> {
        if !viewport.at_bottom() {
            return Err(Skip::NotAtBottom);
        }
        if self.in_flight.is_some() {
            return Err(Skip::InFlight);
        }
        let token = self.token.ok_or(Skip::NoSession)?;
        if !session.lanes().has_pending() {
            return Err(Skip::NothingPending);
        }
        Ok(token)
    }

    /// Start an extension if the gate is open. A redundant call returns
    /// `None` and changes nothing.
    pub fn try_begin(
        &mut self,
        viewport: &Viewport,
        session: &GraphSession,
    ) -> Option<ExtensionTicket> {
        match self.check(viewport, session) {
            Ok(token) => {
                self.issued += 1;
                self.in_flight = Some(self.issued);
                debug!(ticket = self.issued, %token, "extension started");
                Some(ExtensionTicket {
                    id: self.issued,
                    token,
                })
            }
            Err(reason) => {
                debug!(?reason, "extension skipped");
                None
            }
        }
    }

    /// Append a fetched page and reopen the gate.
    ///
    /// Records already in the store are dropped unless some lane awaits
    /// them. Returns `None` for a ticket that is not the one in flight.
    pub fn complete(
        &mut self,
        ticket: ExtensionTicket,
        page: HistoryPage,
        session: &mut GraphSession,
        surface: &mut dyn Surface,
    ) -> Option<AppendSummary> {
        if self.in_flight != Some(ticket.id) {
            warn!(ticket = ticket.id, "completion for a stale extension ticket");
            return None;
        }

        let HistoryPage { commits, token } = page;
        let fetched = commits.len();
        let fresh = filter_page(commits, session);
        debug!(fetched, kept = fresh.len(), "extension page received");

        self.token = token;
        self.in_flight = None;
        Some(session.append(fresh, surface))
    }

    /// Record a failed fetch. The gate stays closed.
    pub fn fail(&mut self, ticket: ExtensionTicket, error: &HistoryError) {
        warn!(ticket = ticket.id, %error, "extension fetch failed; no further extension");
    }

    /// Run one gated extension against `source`.
    ///
    /// Returns `Ok(None)` when the gate is closed.
    pub async fn extend(
        &mut self,
        viewport: &Viewport,
        session: &mut GraphSession,
        source: &dyn HistorySource,
        surface: &mut dyn Surface,
    ) -> Result<Option<AppendSummary>, HistoryError> {
        let Some(ticket) = self.try_begin(viewport, session) else {
            return Ok(None);
        };
        match source.next_page(ticket.token()).await {
            Ok(page) => Ok(self.complete(ticket, page, session, surface)),
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    /// Forget the token and any in-flight extension.
    pub fn reset(&mut self, token: Option<SessionToken>) {
        self.token = token;
        self.in_flight = None;
    }
}

fn filter_page(commits: Vec<CommitRecord>, session: &GraphSession) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter(|c| session.lanes().awaits(&c.hash) || !session.store().contains(&c.hash))
        .collect()
}
