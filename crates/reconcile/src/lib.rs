//! Reconciliation domain for adr-sync.
//!
//! Keeps version-controlled ADR files and their GitHub discussions convergent.
//! A push reconciles every ADR into its discussion; a discussion create/edit
//! reconciles the discussion back into its ADR file. Each side is changed at
//! most once per event and manual edits on the discussion (labels, close or
//! reopen) are left alone unless the ADR's status actually changed.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines the collaborator traits in [`ports`]; infrastructure crates
//! supply them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`DiscussionId`, `LabelId`, `GitRef`, etc.) |
//! | [`types`] | Shared value types (`Label`, `StoredFile`, `ReconciliationResult`, etc.) |
//! | [`errors`] | `StoreError`, `SyncError`, `SettingsError` |
//! | [`ports`] | `ContentStore` and `DiscussionStore` collaborator traits |
//! | [`config`] | Validated `SyncSettings` and defaults |
//! | [`events`] | Triggering events |
//! | [`status`], [`links`], [`author`] | Content helpers |
//! | [`pagination`] | Cursor-following merge |
//! | [`labels`] | Batch-scoped status label get-or-create |
//! | [`transition`] | Shared label / close / reopen policy |
//! | [`document_sync`], [`discussion_sync`] | The two synchronizers |
//! | [`scan`], [`router`] | Drivers for push and discussion events |
//! | [`engine`] | One run per event |

pub mod author;
pub mod config;
pub mod discussion_sync;
pub mod document_sync;
pub mod engine;
pub mod errors;
pub mod events;
pub mod identifiers;
pub mod labels;
pub mod links;
pub mod pagination;
pub mod ports;
pub mod router;
pub mod scan;
pub mod status;
pub mod transition;
pub mod types;

// Re-export the shared vocabulary at the crate root for downstream crates.
pub use config::{CloseStatuses, RawSettings, SyncSettings};
pub use engine::{RunSummary, SyncEngine};
pub use errors::{SettingsError, StoreError, SyncError};
pub use events::{DiscussionAction, DiscussionTrigger, PushTrigger, SyncEvent};
pub use identifiers::{
    BranchName, CategoryId, DiscussionId, GitRef, LabelId, RepositoryNodeId, RevisionHandle, RunId,
};
pub use pagination::{Page, PageInfo};
pub use ports::{CatalogPage, ContentStore, DiscussionPage, DiscussionStore, LabelsPage};
pub use types::{
    Actor, Category, CommitAuthor, CommitResult, DirectoryEntry, Discussion, EntryKind, Label,
    PathListing, ReconciliationResult, RecentCommit, RepositorySlug, StoredFile,
};

/// Repository-relative path of the ADR file `file_name` inside `adr_dir`.
pub fn document_path(adr_dir: &str, file_name: &str) -> String {
    let dir = adr_dir.trim_end_matches('/');
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{dir}/{file_name}")
    }
}
