//! Discussion → ADR synchronizer.
//!
//! The mirror of [`crate::document_sync`]: converges the ADR file named after
//! a discussion to the discussion's body. The previous status comes from the
//! edit payload's prior body rather than a fetch, and the live labels and
//! closed state are the event's snapshot.

use tracing::{debug, info, instrument};

use crate::author::{compose_comment, resolve_author};
use crate::config::CloseStatuses;
use crate::errors::absent_if_not_found;
use crate::events::DiscussionTrigger;
use crate::ports::{ContentStore, DiscussionStore};
use crate::status::StatusExtractor;
use crate::transition::{apply_transition, plan_transition, LiveState};
use crate::{document_path, BranchName, GitRef, Label, ReconciliationResult, SyncError};

pub const CREATE_COMMIT_MESSAGE: &str = "docs(adr): create ADR [skip ci]";
pub const UPDATE_COMMIT_MESSAGE: &str = "docs(adr): update ADR [skip ci]";

#[derive(Debug, Clone, Copy)]
pub struct DiscussionContext<'a> {
    pub adr_dir: &'a str,
    /// Branch files are read from and committed to.
    pub branch: &'a BranchName,
    pub status: &'a StatusExtractor,
    pub close_statuses: &'a CloseStatuses,
}

pub struct DiscussionSync<'a> {
    content: &'a dyn ContentStore,
    discussions: &'a dyn DiscussionStore,
    context: DiscussionContext<'a>,
}

impl<'a> DiscussionSync<'a> {
    pub fn new(
        content: &'a dyn ContentStore,
        discussions: &'a dyn DiscussionStore,
        context: DiscussionContext<'a>,
    ) -> Self {
        Self {
            content,
            discussions,
            context,
        }
    }

    #[instrument(skip_all, fields(title = %trigger.title, discussion = %trigger.id))]
    pub async fn sync(
        &self,
        trigger: &DiscussionTrigger,
        status_label: Option<&Label>,
    ) -> Result<ReconciliationResult, SyncError> {
        let path = document_path(self.context.adr_dir, &trigger.title);
        let branch = self.context.branch.as_str();
        let mut result = ReconciliationResult::default();

        let existing =
            absent_if_not_found(self.content.get_file(&path, &GitRef::from(self.context.branch)).await)?;

        match existing {
            None => {
                let commit = self
                    .content
                    .create_or_update_file(&path, branch, &trigger.body, CREATE_COMMIT_MESSAGE, None)
                    .await?;
                info!(%path, "Created ADR file");
                result.created = true;

                let author = resolve_author(trigger.sender.as_ref(), commit.commit_author.as_ref());
                if let Some(comment) =
                    compose_comment(author.as_deref(), commit.commit_url.as_deref())
                {
                    self.discussions.add_comment(&trigger.id, &comment).await?;
                }
            }
            Some(file) if file.content != trigger.body => {
                self.content
                    .create_or_update_file(
                        &path,
                        branch,
                        &trigger.body,
                        UPDATE_COMMIT_MESSAGE,
                        Some(&file.revision),
                    )
                    .await?;
                info!(%path, "Updated ADR file");
                result.body_changed = true;
            }
            Some(_) => debug!(%path, "ADR file already matches discussion body"),
        }

        let previous_status = trigger
            .previous_body
            .as_deref()
            .and_then(|body| self.context.status.extract(body));

        // The payload's labels and closed flag are a snapshot taken before this
        // run, so replaying the same event repeats a status transition.
        let transition = plan_transition(
            previous_status.as_deref(),
            status_label,
            self.context.close_statuses,
            LiveState {
                labels: &trigger.labels,
                closed: trigger.closed,
            },
        );
        debug!(
            previous = ?previous_status,
            current = ?status_label.map(|l| l.name.as_str()),
            ?transition,
            "Planned status transition"
        );
        apply_transition(self.discussions, &trigger.id, &transition).await?;

        Ok(result.with_transition(transition))
    }
}
