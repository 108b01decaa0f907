//! core::lanes
//!
//! Lane allocation for the commit graph.
//!
//! # Model
//!
//! The pool is an ordered list of lanes. Each lane is either empty or holds
//! the hash of a commit some already-placed child is waiting for. Commits are
//! fed strictly in arrival (newest-first) order:
//!
//! 1. The commit takes over the leftmost lane reserved for its own hash,
//!    releasing every lane that awaited it. With no reservation it takes the
//!    leftmost empty lane, growing the pool when none is empty.
//! 2. Each parent, in parent order, is reserved a lane: the leftmost lane
//!    already awaiting that parent if there is one, else the leftmost empty
//!    lane, else a new lane.
//!
//! Reserving the first parent first keeps linear runs in one column.
//!
//! # Invariants
//!
//! - A lane holds at most one awaited hash
//! - Placement is final: the pool never revisits a commit it has assigned
//! - Children waiting on the same parent share one lane

use super::types::CommitHash;

/// Result of assigning one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    /// Lane the commit is drawn in.
    pub lane: usize,
    /// Lane reserved for each parent, in parent order.
    pub reserved: Vec<usize>,
    /// Number of lanes (from the left) that carry a line on this row,
    /// entering or leaving, including the commit's own lane.
    pub span: usize,
}

/// The shared lane pool.
#[derive(Debug, Clone, Default)]
pub struct LanePool {
    lanes: Vec<Option<CommitHash>>,
}

impl LanePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a lane to `hash` and reserve lanes for its parents.
    ///
    /// # Example
    ///
    /// ```
    /// use lanegraph::core::lanes::LanePool;
    /// use lanegraph::core::types::CommitHash;
    ///
    /// let h = |s: &str| CommitHash::new(s).unwrap();
    /// let mut pool = LanePool::new();
    ///
    /// let c = pool.assign(&h("cccc"), &[h("bbbb")]);
    /// let b = pool.assign(&h("bbbb"), &[h("aaaa")]);
    /// let a = pool.assign(&h("aaaa"), &[]);
    ///
    /// assert_eq!((c.lane, b.lane, a.lane), (0, 0, 0));
    /// assert!(!pool.has_pending());
    /// ```
    pub fn assign(&mut self, hash: &CommitHash, parents: &[CommitHash]) -> LaneAssignment {
        let span_before = self.occupied_span();

        let lane = match self.release(hash) {
            Some(lane) => lane,
            None => self.first_empty().unwrap_or_else(|| self.grow()),
        };

        let reserved = parents.iter().map(|parent| self.reserve(parent)).collect();

        let span = span_before.max(self.occupied_span()).max(lane + 1);

        LaneAssignment {
            lane,
            reserved,
            span,
        }
    }

    /// Free every lane awaiting `hash`, returning the leftmost.
    fn release(&mut self, hash: &CommitHash) -> Option<usize> {
        let mut claimed = None;
        for (index, slot) in self.lanes.iter_mut().enumerate() {
            if slot.as_ref() == Some(hash) {
                *slot = None;
                claimed.get_or_insert(index);
            }
        }
        claimed
    }

    /// Mark a lane as awaiting `parent` and return its index.
    ///
    /// A lane already awaiting the same parent wins over an empty one.
    fn reserve(&mut self, parent: &CommitHash) -> usize {
        let lane = self
            .position_of(parent)
            .or_else(|| self.first_empty())
            .unwrap_or_else(|| self.grow());
        self.lanes[lane] = Some(parent.clone());
        lane
    }

    fn grow(&mut self) -> usize {
        self.lanes.push(None);
        self.lanes.len() - 1
    }

    fn first_empty(&self) -> Option<usize> {
        self.lanes.iter().position(Option::is_none)
    }

    fn position_of(&self, hash: &CommitHash) -> Option<usize> {
        self.lanes.iter().position(|slot| slot.as_ref() == Some(hash))
    }

    /// One past the rightmost occupied lane.
    fn occupied_span(&self) -> usize {
        self.lanes
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1)
    }

    /// The hash lane `lane` is waiting for, if any.
    pub fn occupant(&self, lane: usize) -> Option<&CommitHash> {
        self.lanes.get(lane).and_then(Option::as_ref)
    }

    /// Whether some lane is waiting for `hash`.
    pub fn awaits(&self, hash: &CommitHash) -> bool {
        self.position_of(hash).is_some()
    }

    /// Hashes still awaited, left to right.
    pub fn pending(&self) -> impl Iterator<Item = &CommitHash> {
        self.lanes.iter().flatten()
    }

    pub fn has_pending(&self) -> bool {
        self.lanes.iter().any(Option::is_some)
    }

    /// Total lanes ever opened (the pool never shrinks).
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn reset(&mut self) {
        self.lanes.clear();
    }
}
