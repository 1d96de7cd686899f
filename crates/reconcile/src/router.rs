//! Discussion-event routing.

use tracing::{debug, instrument};

use crate::discussion_sync::{DiscussionContext, DiscussionSync};
use crate::events::DiscussionTrigger;
use crate::labels::LabelEnsurer;
use crate::pagination::collect_pages;
use crate::ports::{ContentStore, DiscussionStore};
use crate::{Label, ReconciliationResult, RepositoryNodeId, SyncError, SyncSettings};

/// Repository id plus every label, all pages merged.
pub async fn fetch_labels(
    store: &dyn DiscussionStore,
) -> Result<(RepositoryNodeId, Vec<Label>), SyncError> {
    let first = store.list_labels(None).await?;
    let labels = collect_pages(first.labels, |after| async move {
        store.list_labels(Some(&after)).await.map(|page| page.labels)
    })
    .await?;
    Ok((first.repository_id, labels))
}

/// Filters discussion events down to ADR discussions and drives
/// [`DiscussionSync`] for them.
pub struct DiscussionRouter<'a> {
    content: &'a dyn ContentStore,
    discussions: &'a dyn DiscussionStore,
    settings: &'a SyncSettings,
}

impl<'a> DiscussionRouter<'a> {
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

    /// Returns `Ok(None)` when the discussion is not an ADR discussion: wrong
    /// category or a title the title pattern rejects. That is the common case
    /// and not an error.
    #[instrument(skip_all, fields(title = %trigger.title))]
    pub async fn route(
        &self,
        adr_dir: &str,
        trigger: &DiscussionTrigger,
    ) -> Result<Option<ReconciliationResult>, SyncError> {
        if trigger.category != self.settings.category {
            debug!(category = %trigger.category, "Ignoring discussion outside the ADR category");
            return Ok(None);
        }
        if !self.settings.title_pattern.is_match(&trigger.title) {
            debug!("Ignoring discussion whose title is not an ADR file name");
            return Ok(None);
        }

        let (repository_id, known) = fetch_labels(self.discussions).await?;
        let mut labels = LabelEnsurer::new(repository_id, known);
        let status = self.settings.status.extract(&trigger.body);
        let status_label = labels.ensure(self.discussions, status.as_deref()).await?;

        let context = DiscussionContext {
            adr_dir,
            branch: &self.settings.branch,
            status: &self.settings.status,
            close_statuses: &self.settings.close_statuses,
        };
        DiscussionSync::new(self.content, self.discussions, context)
            .sync(trigger, status_label.as_ref())
            .await
            .map(Some)
    }
}
