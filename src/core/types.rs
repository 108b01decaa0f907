//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CommitHash`] - Hex commit identifier
//! - [`RefName`] - Validated Git reference name
//! - [`RefCategory`] - Branch / remote-tracking / tag / other classification
//! - [`DiffStat`] - Insertion and deletion counts for one commit
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use lanegraph::core::types::{CommitHash, RefCategory, RefName};
//!
//! let hash = CommitHash::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(hash.short(6), "abc123");
//!
//! let tag = RefName::new("refs/tags/v1").unwrap();
//! assert_eq!(tag.category(), RefCategory::Tag);
//! assert_eq!(tag.label(), "v1");
//!
//! assert!(CommitHash::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// A commit identifier in hexadecimal form.
///
/// Hashes are normalized to lowercase. Abbreviated hashes (at least
/// [`CommitHash::MIN_LEN`] characters) are accepted so fixtures and
/// external feeds that only carry short ids can still be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitHash(String);

impl CommitHash {
    /// Shortest accepted hash, and the shortest accepted lookup prefix.
    pub const MIN_LEN: usize = 4;

    /// Longest accepted hash (SHA-256).
    pub const MAX_LEN: usize = 64;

    /// Create a new validated commit hash.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHash` if the string is not hex or has an
    /// unsupported length.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into().to_ascii_lowercase();
        Self::validate(&hash)?;
        Ok(Self(hash))
    }

    fn validate(hash: &str) -> Result<(), TypeError> {
        if hash.len() < Self::MIN_LEN || hash.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidHash(format!(
                "expected {} to {} hex characters, got {}",
                Self::MIN_LEN,
                Self::MAX_LEN,
                hash.len()
            )));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHash(
                "commit hash must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get an abbreviated form of the hash.
    ///
    /// Returns the full hash if `len` exceeds its length.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Check whether this hash starts with `prefix` (case-insensitive).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.len() >= prefix.len()
            && self.0.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitHash> for String {
    fn from(hash: CommitHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference categories, in label-matching precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefCategory {
    /// `refs/heads/*`
    Branch,
    /// `refs/remotes/*`
    Remote,
    /// `refs/tags/*`
    Tag,
    /// Anything else (stash, notes, custom namespaces)
    Other,
}

impl RefCategory {
    /// Matching order used by [`RefName::category`].
    const PREFIXES: [(RefCategory, &'static str); 3] = [
        (RefCategory::Branch, "refs/heads/"),
        (RefCategory::Remote, "refs/remotes/"),
        (RefCategory::Tag, "refs/tags/"),
    ];

    /// The namespace prefix for this category, if it has one.
    pub fn prefix(self) -> Option<&'static str> {
        Self::PREFIXES
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, prefix)| *prefix)
    }
}

impl std::fmt::Display for RefCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefCategory::Branch => write!(f, "branch"),
            RefCategory::Remote => write!(f, "remote"),
            RefCategory::Tag => write!(f, "tag"),
            RefCategory::Other => write!(f, "other"),
        }
    }
}

/// A validated Git reference name.
///
/// # Example
///
/// ```
/// use lanegraph::core::types::{RefCategory, RefName};
///
/// let main = RefName::new("refs/heads/main").unwrap();
/// assert_eq!(main.category(), RefCategory::Branch);
/// assert_eq!(main.label(), "main");
///
/// let stash = RefName::new("refs/stash").unwrap();
/// assert_eq!(stash.category(), RefCategory::Other);
/// assert_eq!(stash.label(), "refs/stash");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidRefName("ref name cannot be empty".into()));
        }

        if name.starts_with('/') || name.ends_with('/') {
            return Err(TypeError::InvalidRefName(
                "ref name cannot start or end with '/'".into(),
            ));
        }

        if name.ends_with(".lock") {
            return Err(TypeError::InvalidRefName(
                "ref name cannot end with '.lock'".into(),
            ));
        }

        if name.contains("..") || name.contains("//") || name.contains("@{") {
            return Err(TypeError::InvalidRefName(format!(
                "ref name contains a forbidden sequence: {name}"
            )));
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name
            .chars()
            .find(|c| INVALID_CHARS.contains(c) || c.is_ascii_control())
        {
            return Err(TypeError::InvalidRefName(format!(
                "ref name cannot contain {c:?}"
            )));
        }

        Ok(())
    }

    /// Classify the ref by namespace, first match wins.
    pub fn category(&self) -> RefCategory {
        RefCategory::PREFIXES
            .iter()
            .find(|(_, prefix)| self.0.starts_with(prefix))
            .map(|(category, _)| *category)
            .unwrap_or(RefCategory::Other)
    }

    /// Display text: the name with its category prefix removed.
    pub fn label(&self) -> &str {
        self.category()
            .prefix()
            .and_then(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line counts changed by a commit relative to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffStat {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStat {
    pub fn new(insertions: usize, deletions: usize) -> Self {
        Self {
            insertions,
            deletions,
        }
    }
}

impl std::fmt::Display for DiffStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{}", self.insertions, self.deletions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod commit_hash {
        use super::*;

        #[test]
        fn full_sha1_accepted() {
            assert!(CommitHash::new("abc123def4567890abc123def4567890abc12345").is_ok());
        }

        #[test]
        fn abbreviated_accepted() {
            assert!(CommitHash::new("abcd").is_ok());
        }

        #[test]
        fn too_short_rejected() {
            assert!(CommitHash::new("abc").is_err());
        }

        #[test]
        fn too_long_rejected() {
            assert!(CommitHash::new("a".repeat(65)).is_err());
        }

        #[test]
        fn non_hex_rejected() {
            assert!(CommitHash::new("ghij").is_err());
        }

        #[test]
        fn normalizes_to_lowercase() {
            let hash = CommitHash::new("ABCDEF01").unwrap();
            assert_eq!(hash.as_str(), "abcdef01");
        }

        #[test]
        fn prefix_match_ignores_case() {
            let hash = CommitHash::new("abcdef01").unwrap();
            assert!(hash.has_prefix("ABCD"));
            assert!(hash.has_prefix("abcdef01"));
            assert!(!hash.has_prefix("abcdef012"));
            assert!(!hash.has_prefix("bcde"));
        }

        #[test]
        fn serde_roundtrip() {
            let hash = CommitHash::new("abcdef01").unwrap();
            let json = serde_json::to_string(&hash).unwrap();
            assert_eq!(json, "\"abcdef01\"");
            let back: CommitHash = serde_json::from_str(&json).unwrap();
            assert_eq!(back, hash);
        }
    }

    mod ref_name {
        use super::*;

        #[test]
        fn branch_label_strips_prefix() {
            let name = RefName::new("refs/heads/feature/foo").unwrap();
            assert_eq!(name.category(), RefCategory::Branch);
            assert_eq!(name.label(), "feature/foo");
        }

        #[test]
        fn remote_label_strips_prefix() {
            let name = RefName::new("refs/remotes/origin/main").unwrap();
            assert_eq!(name.category(), RefCategory::Remote);
            assert_eq!(name.label(), "origin/main");
        }

        #[test]
        fn tag_label_strips_prefix() {
            let name = RefName::new("refs/tags/v1").unwrap();
            assert_eq!(name.category(), RefCategory::Tag);
            assert_eq!(name.label(), "v1");
        }

        #[test]
        fn other_keeps_full_name() {
            let name = RefName::new("refs/notes/commits").unwrap();
            assert_eq!(name.category(), RefCategory::Other);
            assert_eq!(name.label(), "refs/notes/commits");
        }

        #[test]
        fn prefix_only_in_middle_is_other() {
            let name = RefName::new("custom/refs/heads/x").unwrap();
            assert_eq!(name.category(), RefCategory::Other);
        }

        #[test]
        fn invalid_names_rejected() {
            assert!(RefName::new("").is_err());
            assert!(RefName::new("/refs/heads/x").is_err());
            assert!(RefName::new("refs/heads/x/").is_err());
            assert!(RefName::new("refs/heads/a..b").is_err());
            assert!(RefName::new("refs/heads/has space").is_err());
            assert!(RefName::new("refs/heads/x.lock").is_err());
        }
    }

    #[test]
    fn diff_stat_display() {
        assert_eq!(DiffStat::new(3, 1).to_string(), "+3 -1");
    }
}
