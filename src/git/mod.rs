//! git
//!
//! Single interface for all repository reads.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2`; everything above it sees [`CommitRecord`](crate::core::store::CommitRecord)s,
//! ref snapshots and diff stats through the
//! [`HistorySource`](crate::session::HistorySource) and
//! [`StatSource`](crate::session::StatSource) traits.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Resolving walk start points (HEAD, a branch, every ref)
//! - Paginated newest-first walks with resumable state
//! - Reference snapshots
//! - Tree diffs: line counts and per-file summaries
//!
//! # Example
//!
//! ```ignore
//! use lanegraph::git::{HistoryPager, StartPoints};
//! use lanegraph::session::HistorySource;
//!
//! let pager = HistoryPager::new(".").with_start(StartPoints::All);
//! let page = pager.first_page().await?;
//! if let Some(token) = page.token {
//!     let more = pager.next_page(token).await?;
//! }
//! ```

mod interface;
mod pager;

pub use interface::{Git, GitError, StartPoints, WalkPage};
pub use pager::HistoryPager;
