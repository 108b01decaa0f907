//! git::pager
//!
//! Paginated history over a repository, behind the session source traits.
//!
//! # Design
//!
//! libgit2 handles are not shared across tasks: every request opens the
//! repository inside `spawn_blocking`. Walk state lives in a map keyed by
//! [`SessionToken`]: the set of commits already visited and the heap
//! frontier to resume from. A walk whose first page drains the history gets
//! no token. Once a stored walk runs dry it returns one empty page and is
//! forgotten.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::core::config::DEFAULT_PAGE_SIZE;
use crate::core::types::{CommitHash, DiffStat};
use crate::session::source::{
    HistoryError, HistoryPage, HistorySource, RefSnapshot, SessionToken, StatSource,
};
use crate::session::CommitDetails;

use super::interface::{Git, GitError, StartPoints};

#[derive(Debug, Default)]
struct WalkState {
    checked: HashSet<CommitHash>,
    frontier: Vec<CommitHash>,
    sent_pages: usize,
}

/// History source backed by a git repository.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    path: PathBuf,
    start: StartPoints,
    page_size: usize,
    sessions: Arc<Mutex<HashMap<SessionToken, WalkState>>>,
}

impl HistoryPager {
    /// A pager over the repository containing `path`, walking from HEAD.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            start: StartPoints::Head,
            page_size: DEFAULT_PAGE_SIZE,
            sessions: Arc::default(),
        }
    }

    pub fn with_start(mut self, start: StartPoints) -> Self {
        self.start = start;
        self
    }

    /// Records per page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of walks still holding a token.
    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().map_or(0, |s| s.len())
    }

    /// Run `f` against a freshly opened repository on the blocking pool.
    async fn with_repo<T, F>(&self, f: F) -> Result<T, HistoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Git) -> Result<T, GitError> + Send + 'static,
    {
        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let git = Git::open(&path)?;
            f(&git)
        })
        .await?;
        Ok(result?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SessionToken, WalkState>>, HistoryError> {
        self.sessions
            .lock()
            .map_err(|_| HistoryError::Internal("walk state lock poisoned".into()))
    }
}

#[async_trait]
impl HistorySource for HistoryPager {
    async fn first_page(&self) -> Result<HistoryPage, HistoryError> {
        let start = self.start.clone();
        let page_size = self.page_size;
        let (walk, checked) = self
            .with_repo(move |git| {
                let starts = git.start_points(&start)?;
                let mut checked = HashSet::new();
                let walk = git.walk(&starts, &mut checked, page_size)?;
                Ok((walk, checked))
            })
            .await?;

        let token = if walk.frontier.is_empty() {
            None
        } else {
            let token = SessionToken::new();
            self.lock()?.insert(
                token,
                WalkState {
                    checked,
                    frontier: walk.frontier,
                    sent_pages: 0,
                },
            );
            Some(token)
        };

        debug!(commits = walk.commits.len(), session = ?token, "first history page");
        Ok(HistoryPage {
            commits: walk.commits,
            token,
        })
    }

    async fn next_page(&self, token: SessionToken) -> Result<HistoryPage, HistoryError> {
        let state = {
            let mut sessions = self.lock()?;
            let Some(state) = sessions.get_mut(&token) else {
                return Err(HistoryError::UnknownSession(token));
            };
            if state.frontier.is_empty() {
                sessions.remove(&token);
                debug!(%token, "history session exhausted");
                return Ok(HistoryPage::default());
            }
            std::mem::take(state)
        };

        let page_size = self.page_size;
        let WalkState {
            mut checked,
            frontier,
            sent_pages,
        } = state;
        let result = self
            .with_repo(move |git| {
                let walk = git.walk(&frontier, &mut checked, page_size)?;
                Ok((walk, checked))
            })
            .await;

        let mut sessions = self.lock()?;
        let (walk, checked) = match result {
            Ok(done) => done,
            Err(err) => {
                sessions.remove(&token);
                return Err(err);
            }
        };

        let sent_pages = sent_pages + 1;
        debug!(
            %token,
            commits = walk.commits.len(),
            frontier = walk.frontier.len(),
            sent_pages,
            "history page"
        );
        sessions.insert(
            token,
            WalkState {
                checked,
                frontier: walk.frontier,
                sent_pages,
            },
        );

        Ok(HistoryPage {
            commits: walk.commits,
            token: Some(token),
        })
    }

    async fn refs(&self) -> Result<RefSnapshot, HistoryError> {
        self.with_repo(|git| git.refs()).await
    }
}

#[async_trait]
impl StatSource for HistoryPager {
    async fn diff_stat(
        &self,
        parent: &CommitHash,
        commit: &CommitHash,
    ) -> Result<DiffStat, HistoryError> {
        let (parent, commit) = (parent.clone(), commit.clone());
        self.with_repo(move |git| git.diff_stat(&parent, &commit))
            .await
    }

    async fn details(&self, commit: &CommitHash) -> Result<CommitDetails, HistoryError> {
        let commit = commit.clone();
        self.with_repo(move |git| git.details(&commit)).await
    }
}
