//! Collaborator traits consumed by the synchronizers.
//!
//! Both traits are object-safe (`async_trait`) so the engine can hold them as
//! `&dyn` handles. Implementations own transport, authentication, and the
//! base64 boundary encoding; everything crossing these traits is decoded text.

use async_trait::async_trait;

use crate::pagination::Page;
use crate::{
    Category, CategoryId, CommitResult, DiscussionId, GitRef, Label, LabelId, PathListing,
    RecentCommit, RepositoryNodeId, RevisionHandle, StoreError, StoredFile,
};

/// Version-controlled repository content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetches the file at `path` as of `git_ref`.
    ///
    /// Returns [`StoreError::NotFound`] if the path does not exist at that ref
    /// and [`StoreError::UnexpectedShape`] if it is not a file with a body.
    async fn get_file(&self, path: &str, git_ref: &GitRef) -> Result<StoredFile, StoreError>;

    /// Creates the file (when `revision` is `None`) or replaces it (when it is
    /// the revision last read) on `branch` with a single commit.
    async fn create_or_update_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        message: &str,
        revision: Option<&RevisionHandle>,
    ) -> Result<CommitResult, StoreError>;

    /// Lists the entries directly under `path` as of `git_ref`.
    async fn list_directory(&self, path: &str, git_ref: &GitRef)
        -> Result<PathListing, StoreError>;

    /// Returns up to `limit` most recent commits touching `path`, newest first.
    async fn list_recent_commits(
        &self,
        path: &str,
        limit: u32,
    ) -> Result<Vec<RecentCommit>, StoreError>;
}

/// First page of the combined categories + labels query.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub repository_id: RepositoryNodeId,
    pub categories: Page<Category>,
    pub labels: Page<Label>,
}

/// A page of the labels-only query.
#[derive(Debug, Clone)]
pub struct LabelsPage {
    pub repository_id: RepositoryNodeId,
    pub labels: Page<Label>,
}

/// The first title-search hit together with one page of its labels.
#[derive(Debug, Clone)]
pub struct DiscussionPage {
    pub id: DiscussionId,
    pub body: String,
    pub closed: bool,
    pub labels: Page<Label>,
}

/// Threaded discussions, their labels, and the repository's categories.
#[async_trait]
pub trait DiscussionStore: Send + Sync {
    /// One round trip returning a page of categories and a page of labels.
    async fn catalog_page(
        &self,
        categories_after: Option<&str>,
        labels_after: Option<&str>,
    ) -> Result<CatalogPage, StoreError>;

    /// A page of discussion categories.
    async fn list_categories(&self, after: Option<&str>) -> Result<Page<Category>, StoreError>;

    /// A page of repository labels.
    async fn list_labels(&self, after: Option<&str>) -> Result<LabelsPage, StoreError>;

    /// Searches discussions whose title contains `title` and returns the first
    /// hit, if any, with the labels page starting after `labels_after`.
    async fn search_by_title(
        &self,
        title: &str,
        labels_after: Option<&str>,
    ) -> Result<Option<DiscussionPage>, StoreError>;

    async fn create_discussion(
        &self,
        repository_id: &RepositoryNodeId,
        title: &str,
        body: &str,
        category_id: &CategoryId,
    ) -> Result<DiscussionId, StoreError>;

    async fn update_body(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError>;

    async fn add_comment(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError>;

    async fn add_label(&self, id: &DiscussionId, label_id: &LabelId) -> Result<(), StoreError>;

    async fn remove_label(&self, id: &DiscussionId, label_id: &LabelId)
        -> Result<(), StoreError>;

    async fn close(&self, id: &DiscussionId) -> Result<(), StoreError>;

    async fn reopen(&self, id: &DiscussionId) -> Result<(), StoreError>;

    async fn create_label(
        &self,
        repository_id: &RepositoryNodeId,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<Label, StoreError>;
}
