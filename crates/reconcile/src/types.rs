//! Shared value types for the reconciliation domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the content the synchronizers compare and the shapes the collaborator
//! traits in [`crate::ports`] exchange.

use serde::{Deserialize, Serialize};

use crate::{CategoryId, DiscussionId, LabelId, RevisionHandle};

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// A repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositorySlug {
    /// Account or organisation that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepositorySlug {
    /// Parses `"owner/name"`. Returns `None` unless both halves are non-empty
    /// and there is exactly one separator.
    pub fn parse(value: &str) -> Option<Self> {
        let (owner, name) = value.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Discussion side
// ---------------------------------------------------------------------------

/// A repository label. Status labels carry a status token as their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
}

/// A discussion category. Only used to target discussion creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// The live state of a discussion as seen at the start of a sync call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    pub id: DiscussionId,
    pub body: String,
    pub closed: bool,
    /// Every label currently attached, all pages merged.
    pub labels: Vec<Label>,
}

// ---------------------------------------------------------------------------
// Version-control side
// ---------------------------------------------------------------------------

/// A decoded file fetched from the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content: String,
    pub revision: RevisionHandle,
}

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// What a path resolved to when listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathListing {
    /// The path is a directory; entries in store order.
    Directory(Vec<DirectoryEntry>),
    /// The path is a single file.
    File,
}

/// A platform account that performed an action (commit author, event sender).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// Git-level author identity recorded in a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A commit returned by the recent-commits listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentCommit {
    pub commit_url: Option<String>,
    /// Platform account linked to the commit, if GitHub could resolve one.
    pub actor: Option<Actor>,
    pub commit_author: Option<CommitAuthor>,
}

/// Result of a create-or-update call on the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub commit_url: Option<String>,
    pub commit_author: Option<CommitAuthor>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// The decision a synchronizer reached for one document/discussion pair.
///
/// Every field describes a mutating call that was issued; a result equal to
/// [`ReconciliationResult::default`] means the pair was already converged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// The missing side was created (discussion or file).
    pub created: bool,
    /// The existing side's body or file content was rewritten.
    pub body_changed: bool,
    pub label_to_remove: Option<LabelId>,
    pub label_to_add: Option<LabelId>,
    pub should_close: bool,
    pub should_reopen: bool,
}

impl ReconciliationResult {
    /// Returns `true` if no mutating call was needed.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}
