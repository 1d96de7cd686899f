//! Push-driven scan of the ADR directory.
//!
//! Resolves the target discussion category, lists the markdown files directly
//! under the ADR directory (subdirectories are not descended into), and runs
//! one [`DocumentSync`] per file, strictly in listing order, with a single
//! [`LabelEnsurer`] shared across the batch.

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::document_sync::{Document, DocumentContext, DocumentSync};
use crate::labels::LabelEnsurer;
use crate::links::{blob_base_url, LinkRewriter};
use crate::pagination::{merge_paired, Page, PairedPageSource};
use crate::ports::{ContentStore, DiscussionStore};
use crate::{
    document_path, Category, EntryKind, GitRef, Label, PathListing, ReconciliationResult,
    RepositoryNodeId, StoreError, SyncError, SyncSettings,
};

/// The repository's discussion categories and labels, all pages merged.
#[derive(Debug, Clone)]
pub struct RepositoryCatalog {
    pub repository_id: RepositoryNodeId,
    pub categories: Vec<Category>,
    pub labels: Vec<Label>,
}

struct CatalogPages<'a>(&'a dyn DiscussionStore);

#[async_trait]
impl PairedPageSource for CatalogPages<'_> {
    type First = Category;
    type Second = Label;

    async fn fetch_both(
        &self,
        first_after: &str,
        second_after: &str,
    ) -> Result<(Page<Category>, Page<Label>), StoreError> {
        let page = self.0.catalog_page(Some(first_after), Some(second_after)).await?;
        Ok((page.categories, page.labels))
    }

    async fn fetch_first(&self, after: &str) -> Result<Page<Category>, StoreError> {
        self.0.list_categories(Some(after)).await
    }

    async fn fetch_second(&self, after: &str) -> Result<Page<Label>, StoreError> {
        Ok(self.0.list_labels(Some(after)).await?.labels)
    }
}

/// Fetches categories and labels together, following both cursors.
pub async fn fetch_catalog(store: &dyn DiscussionStore) -> Result<RepositoryCatalog, SyncError> {
    let first = store.catalog_page(None, None).await?;
    let (categories, labels) =
        merge_paired(&CatalogPages(store), first.categories, first.labels).await?;
    Ok(RepositoryCatalog {
        repository_id: first.repository_id,
        categories,
        labels,
    })
}

/// The reconciliation result for one ADR file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    pub title: String,
    pub result: ReconciliationResult,
}

pub struct RepositoryScan<'a> {
    content: &'a dyn ContentStore,
    discussions: &'a dyn DiscussionStore,
    settings: &'a SyncSettings,
}

impl<'a> RepositoryScan<'a> {
    pub fn new(
        content: &'a dyn ContentStore,
        discussions: &'a dyn DiscussionStore,
        settings: &'a SyncSettings,
    ) -> Self {
        Self {
            content,
            discussions,
            settings,
        }
    }

    /// Reconciles every ADR under `adr_dir` as of `git_ref`.
    #[instrument(skip_all, fields(adr_dir = %adr_dir, git_ref = %git_ref))]
    pub async fn run(
        &self,
        adr_dir: &str,
        git_ref: &GitRef,
        before: Option<&GitRef>,
    ) -> Result<Vec<DocumentOutcome>, SyncError> {
        let catalog = fetch_catalog(self.discussions).await?;
        let category = catalog
            .categories
            .iter()
            .find(|c| c.name == self.settings.category)
            .ok_or_else(|| {
                SyncError::mismatch(format!(
                    "Could not find discussion category {}",
                    self.settings.category
                ))
            })?;

        let titles = self.list_titles(adr_dir, git_ref).await?;
        info!(count = titles.len(), %adr_dir, "Found ADR files");

        let base_url = blob_base_url(
            &self.settings.server_url,
            &self.settings.repository,
            self.settings.branch.as_str(),
        );
        let links = LinkRewriter::new(&base_url, adr_dir).map_err(|e| {
            SyncError::mismatch(format!("Invalid blob base URL {base_url}: {e}"))
        })?;
        let context = DocumentContext {
            repository_id: &catalog.repository_id,
            category_id: &category.id,
            adr_dir,
            links: &links,
            status: &self.settings.status,
            close_statuses: &self.settings.close_statuses,
            before,
        };
        let sync = DocumentSync::new(self.content, self.discussions, context);
        let mut labels = LabelEnsurer::new(catalog.repository_id.clone(), catalog.labels);

        let mut outcomes = Vec::with_capacity(titles.len());
        for title in titles {
            let file = self
                .content
                .get_file(&document_path(adr_dir, &title), git_ref)
                .await?;
            let status = self.settings.status.extract(&file.content);
            let status_label = labels.ensure(self.discussions, status.as_deref()).await?;

            let result = sync
                .sync(Document {
                    title: &title,
                    content: &file.content,
                    status_label: status_label.as_ref(),
                })
                .await?;
            outcomes.push(DocumentOutcome { title, result });
        }

        Ok(outcomes)
    }

    /// Markdown file names directly under `adr_dir`, in listing order.
    async fn list_titles(&self, adr_dir: &str, git_ref: &GitRef) -> Result<Vec<String>, SyncError> {
        let listing = match self.content.list_directory(adr_dir, git_ref).await {
            Ok(listing) => listing,
            Err(e) if e.is_not_found() => {
                return Err(SyncError::mismatch(format!(
                    "Could not find directory at {adr_dir}"
                )))
            }
            Err(e) => return Err(e.into()),
        };

        match listing {
            PathListing::Directory(entries) => Ok(entries
                .into_iter()
                .filter(|entry| entry.kind == EntryKind::File && entry.name.ends_with(".md"))
                .map(|entry| entry.name)
                .collect()),
            PathListing::File => Err(SyncError::mismatch(format!(
                "Expected directory but found a file at {adr_dir}"
            ))),
        }
    }
}
