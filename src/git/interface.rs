//! git::interface
//!
//! Repository reads used by the history pager, using git2.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::ObjectNotFound`]: A hash does not name a commit
//! - [`GitError::Internal`]: Anything else libgit2 reports
//!
//! # Example
//!
//! ```ignore
//! use lanegraph::git::{Git, StartPoints};
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let starts = git.start_points(&StartPoints::Head)?;
//! let walk = git.walk(&starts, &mut HashSet::new(), 50)?;
//! println!("{} commits, {} left", walk.commits.len(), walk.frontier.len());
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Offset, Utc};
use thiserror::Error;

use crate::core::store::CommitRecord;
use crate::core::types::{CommitHash, DiffStat, RefName, TypeError};
use crate::session::{CommitDetails, HistoryError, RefSnapshot, Signature};

/// Column width of the per-file diff summary.
const SUMMARY_WIDTH: usize = 80;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The hash that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid hash string
        oid: String,
    },

    /// Internal git error.
    #[error("git error: {message}")]
    Internal {
        /// Error message from libgit2
        message: String,
    },
}

impl GitError {
    /// Map a git2 error, using `context` to name what was being looked up.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: err.message().to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidHash(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::Internal { message: msg },
        }
    }
}

impl From<GitError> for HistoryError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::NotARepo { path } => HistoryError::NotARepo(path.display().to_string()),
            GitError::RefNotFound { refname } => HistoryError::RefNotFound(refname),
            other => HistoryError::Internal(other.to_string()),
        }
    }
}

/// Where a history walk begins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartPoints {
    /// The commit HEAD points at.
    #[default]
    Head,
    /// A branch, tag or other short ref name.
    Branch(String),
    /// Every reference that peels to a commit.
    All,
}

/// One page of a walk plus the state needed to resume it.
#[derive(Debug, Clone, Default)]
pub struct WalkPage {
    pub commits: Vec<CommitRecord>,
    /// Commits queued but not yet visited.
    pub frontier: Vec<CommitHash>,
}

/// Read-only handle to a repository.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository. Bare repositories are accepted.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// The .git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// The working tree root, or the git directory for bare repositories.
    pub fn root(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Resolve where a walk begins.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the branch does not exist or HEAD is unborn
    pub fn start_points(&self, start: &StartPoints) -> Result<Vec<CommitHash>, GitError> {
        let ids = match start {
            StartPoints::Head => {
                let head = self.repo.head().map_err(|_| GitError::RefNotFound {
                    refname: "HEAD".to_string(),
                })?;
                vec![head.peel_to_commit()?.id()]
            }
            StartPoints::Branch(name) => {
                let reference = self
                    .repo
                    .resolve_reference_from_short_name(name)
                    .map_err(|_| GitError::RefNotFound {
                        refname: name.clone(),
                    })?;
                vec![reference.peel_to_commit()?.id()]
            }
            StartPoints::All => {
                let mut ids = Vec::new();
                for reference in self.repo.references()? {
                    let Ok(reference) = reference else {
                        continue;
                    };
                    if let Ok(commit) = reference.peel_to_commit() {
                        ids.push(commit.id());
                    }
                }
                ids
            }
        };

        ids.into_iter().map(to_hash).collect()
    }

    /// Walk newest-first from `starts`, skipping anything in `checked`.
    ///
    /// Commits are visited in commit-time order through a max-heap. Every
    /// visited commit is added to `checked`; commits whose summary is not
    /// valid UTF-8 are visited but not returned. The walk stops once
    /// `page_size` records are collected and returns the remaining heap as
    /// the frontier.
    pub fn walk(
        &self,
        starts: &[CommitHash],
        checked: &mut HashSet<CommitHash>,
        page_size: usize,
    ) -> Result<WalkPage, GitError> {
        let mut heap = BinaryHeap::new();
        for hash in starts {
            let commit = self.find_commit(hash)?;
            heap.push((commit.time().seconds(), Reverse(hash.clone())));
        }

        let mut page = WalkPage::default();
        while let Some((_, Reverse(hash))) = heap.pop() {
            if !checked.insert(hash.clone()) {
                continue;
            }
            let commit = self.find_commit(&hash)?;

            let mut parents = Vec::with_capacity(commit.parent_count());
            for id in commit.parent_ids() {
                let parent_hash = to_hash(id)?;
                // Parents missing from a shallow clone are still listed
                if let Ok(parent) = self.repo.find_commit(id) {
                    heap.push((parent.time().seconds(), Reverse(parent_hash.clone())));
                }
                parents.push(parent_hash);
            }

            if let Some(summary) = commit.summary() {
                page.commits
                    .push(CommitRecord::new(hash, parents, summary.to_string()));
                if page.commits.len() >= page_size {
                    break;
                }
            }
        }

        page.frontier = heap.into_iter().map(|(_, Reverse(hash))| hash).collect();
        Ok(page)
    }

    /// Every reference that peels to a commit.
    ///
    /// References with non-UTF-8 or invalid names are skipped.
    pub fn refs(&self) -> Result<RefSnapshot, GitError> {
        let mut snapshot = RefSnapshot::new();
        for reference in self.repo.references()? {
            let Ok(reference) = reference else {
                continue;
            };
            let Some(name) = reference.name() else {
                continue;
            };
            let Ok(name) = RefName::new(name) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            snapshot.insert(name, to_hash(commit.id())?);
        }
        Ok(snapshot)
    }

    /// Lines inserted and deleted between two commits' trees.
    pub fn diff_stat(&self, parent: &CommitHash, commit: &CommitHash) -> Result<DiffStat, GitError> {
        let stats = self.diff(parent, commit)?.stats()?;
        Ok(DiffStat::new(stats.insertions(), stats.deletions()))
    }

    /// Author, committer, full message and, for single-parent commits, a
    /// per-file change summary.
    pub fn details(&self, hash: &CommitHash) -> Result<CommitDetails, GitError> {
        let commit = self.find_commit(hash)?;

        let diff_summary = if commit.parent_count() == 1 {
            let parent = to_hash(commit.parent_id(0)?)?;
            let stats = self.diff(&parent, hash)?.stats()?;
            let buf = stats.to_buf(git2::DiffStatsFormat::FULL, SUMMARY_WIDTH)?;
            buf.as_str().map(str::to_string)
        } else {
            None
        };

        let author = signature(&commit.author());
        let committer = signature(&commit.committer());
        Ok(CommitDetails {
            hash: hash.clone(),
            author,
            committer,
            message: commit.message().unwrap_or("").to_string(),
            diff_summary,
            stat: None,
        })
    }

    fn diff(&self, parent: &CommitHash, commit: &CommitHash) -> Result<git2::Diff<'_>, GitError> {
        let old = self.find_commit(parent)?.tree()?;
        let new = self.find_commit(commit)?.tree()?;
        Ok(self.repo.diff_tree_to_tree(Some(&old), Some(&new), None)?)
    }

    fn find_commit(&self, hash: &CommitHash) -> Result<git2::Commit<'_>, GitError> {
        let oid = git2::Oid::from_str(hash.as_str())
            .map_err(|e| GitError::from_git2(e, hash.as_str()))?;
        self.repo
            .find_commit(oid)
            .map_err(|e| GitError::from_git2(e, hash.as_str()))
    }
}

fn to_hash(id: git2::Oid) -> Result<CommitHash, GitError> {
    Ok(CommitHash::new(id.to_string())?)
}

fn signature(sig: &git2::Signature<'_>) -> Signature {
    let when = sig.when();
    let offset = chrono::FixedOffset::east_opt(when.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    let time = DateTime::from_timestamp(when.seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset);

    Signature {
        name: sig.name().unwrap_or("").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        time,
    }
}
