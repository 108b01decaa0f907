//! core::store
//!
//! Append-only commit store with hash lookup and a derived child index.
//!
//! # Invariants
//!
//! - Commits keep their arrival order; the store never reorders or removes
//!   individual commits (only [`CommitStore::reset`] clears it)
//! - A commit's [`Placement`] is written at most once
//! - The child index is keyed by hash, so it is complete for a commit no
//!   matter whether its children or the commit itself arrived first
//!
//! The store does not guard against appending the same hash twice; the
//! later record shadows the earlier one in lookups.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CommitHash, DiffStat, RefName};

/// Errors from store lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("hash prefix '{prefix}' is shorter than {min} characters")]
    PrefixTooShort { prefix: String, min: usize },
}

/// A commit as delivered by a history feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: CommitHash,
    #[serde(default)]
    pub parents: Vec<CommitHash>,
    #[serde(default)]
    pub message: String,
}

impl CommitRecord {
    pub fn new(hash: CommitHash, parents: Vec<CommitHash>, message: impl Into<String>) -> Self {
        Self {
            hash,
            parents,
            message: message.into(),
        }
    }
}

/// Lane and row of a laid-out commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub lane: usize,
    pub row: usize,
}

/// A known commit.
#[derive(Debug, Clone)]
pub struct Commit {
    pub hash: CommitHash,
    pub parents: Vec<CommitHash>,
    pub message: String,
    /// Filled in when the asynchronous diff summary resolves.
    pub stat: Option<DiffStat>,
    /// Refs pointing at this commit, in merge order (duplicates preserved).
    pub refs: Vec<RefName>,
    placement: Option<Placement>,
}

impl Commit {
    fn from_record(record: CommitRecord) -> Self {
        Self {
            hash: record.hash,
            parents: record.parents,
            message: record.message,
            stat: None,
            refs: Vec::new(),
            placement: None,
        }
    }

    /// Lane and row, once the allocator has seen this commit.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn lane(&self) -> Option<usize> {
        self.placement.map(|p| p.lane)
    }

    pub fn row(&self) -> Option<usize> {
        self.placement.map(|p| p.row)
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Record the placement. Returns `false` (and changes nothing) if the
    /// commit was already placed.
    pub(crate) fn place(&mut self, placement: Placement) -> bool {
        if self.placement.is_some() {
            return false;
        }
        self.placement = Some(placement);
        true
    }
}

/// Ordered list of commits plus lookup indexes.
#[derive(Debug, Default)]
pub struct CommitStore {
    commits: Vec<Commit>,
    by_hash: HashMap<CommitHash, usize>,
    children: HashMap<CommitHash, Vec<CommitHash>>,
}

impl CommitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch to the tail of the list.
    ///
    /// Returns the index range the new commits occupy.
    pub fn append(&mut self, batch: impl IntoIterator<Item = CommitRecord>) -> Range<usize> {
        let start = self.commits.len();
        for record in batch {
            let index = self.commits.len();
            for parent in &record.parents {
                self.children
                    .entry(parent.clone())
                    .or_default()
                    .push(record.hash.clone());
            }
            self.by_hash.insert(record.hash.clone(), index);
            self.commits.push(Commit::from_record(record));
        }
        start..self.commits.len()
    }

    /// Exact-match lookup.
    pub fn lookup(&self, hash: &CommitHash) -> Option<&Commit> {
        self.by_hash.get(hash).map(|&i| &self.commits[i])
    }

    pub fn lookup_mut(&mut self, hash: &CommitHash) -> Option<&mut Commit> {
        match self.by_hash.get(hash) {
            Some(&i) => Some(&mut self.commits[i]),
            None => None,
        }
    }

    /// Position of a commit in arrival order.
    pub fn index_of(&self, hash: &CommitHash) -> Option<usize> {
        self.by_hash.get(hash).copied()
    }

    /// First commit, in arrival order, whose hash starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PrefixTooShort`] for prefixes under
    /// [`CommitHash::MIN_LEN`] characters; such prefixes are too likely to
    /// select the wrong commit.
    ///
    /// # Example
    ///
    /// ```
    /// use lanegraph::core::store::{CommitRecord, CommitStore};
    /// use lanegraph::core::types::CommitHash;
    ///
    /// let mut store = CommitStore::new();
    /// store.append([CommitRecord::new(CommitHash::new("abcd1234").unwrap(), vec![], "init")]);
    ///
    /// assert!(store.find_by_prefix("abc").is_err());
    /// assert!(store.find_by_prefix("abcd").unwrap().is_some());
    /// assert!(store.find_by_prefix("ffff").unwrap().is_none());
    /// ```
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Option<&Commit>, StoreError> {
        if prefix.len() < CommitHash::MIN_LEN {
            return Err(StoreError::PrefixTooShort {
                prefix: prefix.to_string(),
                min: CommitHash::MIN_LEN,
            });
        }
        Ok(self.commits.iter().find(|c| c.hash.has_prefix(prefix)))
    }

    /// Known children of `hash`, in arrival order.
    pub fn children(&self, hash: &CommitHash) -> &[CommitHash] {
        self.children.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, index: usize) -> Option<&Commit> {
        self.commits.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Commit> {
        self.commits.get_mut(index)
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn contains(&self, hash: &CommitHash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.commits.clear();
        self.by_hash.clear();
        self.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> CommitHash {
        CommitHash::new(s).unwrap()
    }

    fn record(hash: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord::new(h(hash), parents.iter().map(|p| h(p)).collect(), hash)
    }

    #[test]
    fn append_preserves_order_and_returns_range() {
        let mut store = CommitStore::new();
        let first = store.append([record("cccc", &["bbbb"]), record("bbbb", &["aaaa"])]);
        let second = store.append([record("aaaa", &[])]);

        assert_eq!(first, 0..2);
        assert_eq!(second, 2..3);
        let order: Vec<_> = store.commits().iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(order, vec!["cccc", "bbbb", "aaaa"]);
    }

    #[test]
    fn children_backfilled_when_parent_arrives_later() {
        let mut store = CommitStore::new();
        store.append([record("cccc", &["aaaa"]), record("bbbb", &["aaaa"])]);
        store.append([record("aaaa", &[])]);

        assert_eq!(store.children(&h("aaaa")), &[h("cccc"), h("bbbb")]);
    }

    #[test]
    fn children_recorded_when_parent_already_known() {
        let mut store = CommitStore::new();
        store.append([record("aaaa", &[])]);
        store.append([record("bbbb", &["aaaa"])]);

        assert_eq!(store.children(&h("aaaa")), &[h("bbbb")]);
        assert!(store.children(&h("bbbb")).is_empty());
    }

    #[test]
    fn lookup_is_exact() {
        let mut store = CommitStore::new();
        store.append([record("abcd1234", &[])]);

        assert!(store.lookup(&h("abcd1234")).is_some());
        assert!(store.lookup(&h("abcd")).is_none());
    }

    #[test]
    fn prefix_shorter_than_four_fails() {
        let mut store = CommitStore::new();
        store.append([record("abcd1234", &[])]);

        let err = store.find_by_prefix("abc").unwrap_err();
        assert_eq!(
            err,
            StoreError::PrefixTooShort {
                prefix: "abc".into(),
                min: 4
            }
        );
    }

    #[test]
    fn prefix_returns_first_match_in_arrival_order() {
        let mut store = CommitStore::new();
        store.append([record("abcd0001", &[]), record("abcd0002", &[])]);

        let found = store.find_by_prefix("abcd").unwrap().unwrap();
        assert_eq!(found.hash, h("abcd0001"));
        assert!(store.find_by_prefix("beef").unwrap().is_none());
    }

    #[test]
    fn placement_written_once() {
        let mut store = CommitStore::new();
        store.append([record("aaaa", &[])]);
        let commit = store.get_mut(0).unwrap();

        assert!(commit.place(Placement { lane: 2, row: 0 }));
        assert!(!commit.place(Placement { lane: 0, row: 9 }));
        assert_eq!(commit.placement(), Some(Placement { lane: 2, row: 0 }));
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = CommitStore::new();
        store.append([record("bbbb", &["aaaa"])]);
        store.reset();

        assert!(store.is_empty());
        assert!(store.lookup(&h("bbbb")).is_none());
        assert!(store.children(&h("aaaa")).is_empty());
    }

    #[test]
    fn record_deserializes_from_feed_json() {
        let json = r#"{"hash":"abcd1234","message":"init","parents":[]}"#;
        let rec: CommitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.hash, h("abcd1234"));
        assert!(rec.parents.is_empty());
    }
}
