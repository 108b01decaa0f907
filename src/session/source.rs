//! session::source
//!
//! Async collaborators that feed a [`GraphSession`](super::GraphSession).
//!
//! # Design
//!
//! History and enrichment come from outside the layout core. Both traits are
//! async because a source may walk a repository on a blocking pool or read
//! from a remote. Implementations must be `Send + Sync` so stat fetches can
//! be spawned as independent tasks.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::store::CommitRecord;
use crate::core::types::{CommitHash, DiffStat, RefName};

use super::CommitDetails;

/// Reference name to commit, as reported by a source.
pub type RefSnapshot = BTreeMap<RefName, CommitHash>;

/// Errors from history and enrichment sources.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("not a git repository: {0}")]
    NotARepo(String),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    /// The pagination token was never issued or has been exhausted.
    #[error("unknown history session: {0}")]
    UnknownSession(SessionToken),

    #[error("history source error: {0}")]
    Internal(String),

    /// A blocking task panicked or was cancelled.
    #[error("history task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for HistoryError {
    fn from(err: tokio::task::JoinError) -> Self {
        HistoryError::Join(err.to_string())
    }
}

/// Opaque handle to a paginated walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// A new random token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub commits: Vec<CommitRecord>,
    /// Present while more history remains.
    pub token: Option<SessionToken>,
}

/// Supplies ordered commit batches on request.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Start a walk and return its first page.
    async fn first_page(&self) -> Result<HistoryPage, HistoryError>;

    /// Continue the walk identified by `token`.
    ///
    /// An exhausted walk returns an empty page without a token.
    async fn next_page(&self, token: SessionToken) -> Result<HistoryPage, HistoryError>;

    /// Current reference snapshot.
    async fn refs(&self) -> Result<RefSnapshot, HistoryError>;
}

/// Supplies per-commit enrichment.
#[async_trait]
pub trait StatSource: Send + Sync {
    /// Line counts changed between `parent` and `commit`.
    async fn diff_stat(
        &self,
        parent: &CommitHash,
        commit: &CommitHash,
    ) -> Result<DiffStat, HistoryError>;

    /// Metadata shown when hovering a commit.
    async fn details(&self, commit: &CommitHash) -> Result<CommitDetails, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_serialize_as_uuid() {
        let a = SessionToken::new();
        let b = SessionToken::new();
        assert_ne!(a, b);

        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", a.as_uuid()));
        let back: SessionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn unknown_session_names_the_token() {
        let token = SessionToken::new();
        let err = HistoryError::UnknownSession(token);
        assert!(err.to_string().contains(&token.to_string()));
    }
}
