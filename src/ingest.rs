//! ingest
//!
//! History read from a JSON document instead of a repository.
//!
//! # Format
//!
//! ```json
//! {
//!   "commits": [
//!     { "hash": "c3c3", "parents": ["b2b2"], "message": "third" },
//!     { "hash": "b2b2", "parents": ["a1a1"], "message": "second" }
//!   ],
//!   "refs": { "refs/heads/main": "c3c3" },
//!   "stats": { "c3c3": { "insertions": 4, "deletions": 1 } }
//! }
//! ```
//!
//! Commits must be listed newest first. `refs` and `stats` are optional.
//! Pages are cut from the commit list in order, so the source behaves like
//! a paginated walk.
//!
//! # Example
//!
//! ```
//! use lanegraph::ingest::JsonHistory;
//! use lanegraph::session::HistorySource;
//!
//! # tokio_test::block_on(async {
//! let history = JsonHistory::from_json(r#"{
//!     "commits": [
//!         {"hash": "bbbb", "parents": ["aaaa"], "message": "second"},
//!         {"hash": "aaaa", "parents": [], "message": "first"}
//!     ]
//! }"#).unwrap().with_page_size(1);
//!
//! let first = history.first_page().await.unwrap();
//! assert_eq!(first.commits.len(), 1);
//! let rest = history.next_page(first.token.unwrap()).await.unwrap();
//! assert_eq!(rest.commits[0].message, "first");
//! # });
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::DEFAULT_PAGE_SIZE;
use crate::core::store::CommitRecord;
use crate::core::types::{CommitHash, DiffStat};
use crate::session::source::{
    HistoryError, HistoryPage, HistorySource, RefSnapshot, SessionToken, StatSource,
};
use crate::session::CommitDetails;

/// Errors loading a history document.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid history document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape of a history document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryDocument {
    pub commits: Vec<CommitRecord>,
    #[serde(default)]
    pub refs: RefSnapshot,
    #[serde(default)]
    pub stats: BTreeMap<CommitHash, DiffStat>,
}

/// In-memory paginated history.
///
/// Clones share pagination state.
#[derive(Debug, Clone)]
pub struct JsonHistory {
    document: Arc<HistoryDocument>,
    page_size: usize,
    cursors: Arc<Mutex<HashMap<SessionToken, usize>>>,
}

impl JsonHistory {
    pub fn new(document: HistoryDocument) -> Self {
        Self {
            document: Arc::new(document),
            page_size: DEFAULT_PAGE_SIZE,
            cursors: Arc::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let json = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Records per page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn document(&self) -> &HistoryDocument {
        &self.document
    }

    /// Page starting at `offset`, and the offset after it if any remain.
    fn slice(&self, offset: usize) -> (Vec<CommitRecord>, Option<usize>) {
        let commits = &self.document.commits;
        let start = offset.min(commits.len());
        let end = (start + self.page_size).min(commits.len());
        let next = (end < commits.len()).then_some(end);
        (commits[start..end].to_vec(), next)
    }

    fn cursors(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SessionToken, usize>>, HistoryError> {
        self.cursors
            .lock()
            .map_err(|_| HistoryError::Internal("pagination lock poisoned".into()))
    }
}

#[async_trait]
impl HistorySource for JsonHistory {
    async fn first_page(&self) -> Result<HistoryPage, HistoryError> {
        let (commits, next) = self.slice(0);
        let token = match next {
            Some(offset) => {
                let token = SessionToken::new();
                self.cursors()?.insert(token, offset);
                Some(token)
            }
            None => None,
        };
        Ok(HistoryPage { commits, token })
    }

    async fn next_page(&self, token: SessionToken) -> Result<HistoryPage, HistoryError> {
        let mut cursors = self.cursors()?;
        let Some(&offset) = cursors.get(&token) else {
            return Err(HistoryError::UnknownSession(token));
        };
        if offset >= self.document.commits.len() {
            cursors.remove(&token);
            return Ok(HistoryPage::default());
        }

        let (commits, next) = self.slice(offset);
        cursors.insert(token, next.unwrap_or(self.document.commits.len()));
        Ok(HistoryPage {
            commits,
            token: Some(token),
        })
    }

    async fn refs(&self) -> Result<RefSnapshot, HistoryError> {
        Ok(self.document.refs.clone())
    }
}

#[async_trait]
impl StatSource for JsonHistory {
    async fn diff_stat(
        &self,
        _parent: &CommitHash,
        commit: &CommitHash,
    ) -> Result<DiffStat, HistoryError> {
        self.document
            .stats
            .get(commit)
            .copied()
            .ok_or_else(|| HistoryError::Internal(format!("no stat recorded for {commit}")))
    }

    async fn details(&self, commit: &CommitHash) -> Result<CommitDetails, HistoryError> {
        Err(HistoryError::Internal(format!(
            "history documents carry no details for {commit}"
        )))
    }
}
