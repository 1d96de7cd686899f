//! Newtype domain identifiers.
//!
//! Every identity the reconciler handles is a distinct newtype wrapping a
//! primitive, so a [`LabelId`] can never be passed where a [`DiscussionId`] is
//! expected even though both are GraphQL node ids under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GraphQL node ids (discussion side)
// ---------------------------------------------------------------------------

string_id! {
    /// GraphQL node id of a discussion (e.g. `"D_kwDOAbc123"`).
    DiscussionId
}

string_id! {
    /// GraphQL node id of a repository label.
    LabelId
}

string_id! {
    /// GraphQL node id of a discussion category.
    CategoryId
}

string_id! {
    /// GraphQL node id of the repository itself.
    ///
    /// Required as the owner argument when creating discussions and labels.
    RepositoryNodeId
}

// ---------------------------------------------------------------------------
// Identifiers: version-control side
// ---------------------------------------------------------------------------

string_id! {
    /// A Git branch name (e.g. `"main"`, `"release/1.x"`).
    BranchName
}

string_id! {
    /// Any Git revision the content store can resolve: a full ref
    /// (`"refs/heads/main"`), a branch name, or a commit SHA.
    GitRef
}

string_id! {
    /// Blob SHA of a stored file, passed back on update so a concurrent write is
    /// rejected instead of silently overwritten.
    RevisionHandle
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single reconciliation run (one triggering event).
///
/// Generated fresh for every invocation and attached to the run span so all
/// activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl GitRef {
    /// Returns the branch name when this ref is of the form `refs/heads/<branch>`.
    pub fn branch(&self) -> Option<&str> {
        self.0.strip_prefix("refs/heads/")
    }

    /// Returns `true` for the all-zero SHA GitHub reports as the `before`
    /// revision of a newly created branch.
    pub fn is_null_commit(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }
}

impl From<&BranchName> for GitRef {
    fn from(branch: &BranchName) -> Self {
        Self(branch.as_str().to_string())
    }
}
