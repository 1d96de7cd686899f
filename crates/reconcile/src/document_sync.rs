//! ADR → discussion synchronizer.
//!
//! Converges the discussion titled after one ADR file to the file's current
//! content and status:
//!
//! 1. Links in the content are rewritten to absolute blob URLs.
//! 2. No discussion yet: create it, then post an attribution comment for the
//!    most recent commit touching the file. There is no previous status.
//! 3. Discussion exists: update its body if it differs, then derive the
//!    previous status from the file as it was before the triggering push.
//! 4. Apply the shared status transition (see [`crate::transition`]).

use tracing::{debug, info, instrument};

use crate::author::{compose_comment, resolve_author};
use crate::config::CloseStatuses;
use crate::errors::absent_if_not_found;
use crate::links::LinkRewriter;
use crate::pagination::collect_pages;
use crate::ports::{ContentStore, DiscussionStore};
use crate::status::StatusExtractor;
use crate::transition::{apply_transition, plan_transition, LiveState};
use crate::{
    document_path, CategoryId, Discussion, DiscussionId, GitRef, Label, ReconciliationResult,
    RepositoryNodeId, SyncError,
};

/// Per-batch inputs shared by every document of a repository scan.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub repository_id: &'a RepositoryNodeId,
    pub category_id: &'a CategoryId,
    pub adr_dir: &'a str,
    pub links: &'a LinkRewriter,
    pub status: &'a StatusExtractor,
    pub close_statuses: &'a CloseStatuses,
    /// Revision immediately before the triggering push, if there was one.
    pub before: Option<&'a GitRef>,
}

/// One ADR file at the pushed revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    /// File name; doubles as the discussion title.
    pub title: &'a str,
    pub content: &'a str,
    /// Label for the status derived from `content`.
    pub status_label: Option<&'a Label>,
}

pub struct DocumentSync<'a> {
    content: &'a dyn ContentStore,
    discussions: &'a dyn DiscussionStore,
    context: DocumentContext<'a>,
}

impl<'a> DocumentSync<'a> {
    pub fn new(
        content: &'a dyn ContentStore,
        discussions: &'a dyn DiscussionStore,
        context: DocumentContext<'a>,
    ) -> Self {
        Self {
            content,
            discussions,
            context,
        }
    }

    #[instrument(skip_all, fields(title = %document.title))]
    pub async fn sync(&self, document: Document<'_>) -> Result<ReconciliationResult, SyncError> {
        let path = document_path(self.context.adr_dir, document.title);
        let body = self.context.links.rewrite(document.content);

        let (discussion, result, previous_status) = match self.find_discussion(document.title).await? {
            None => {
                let id = self
                    .discussions
                    .create_discussion(
                        self.context.repository_id,
                        document.title,
                        &body,
                        self.context.category_id,
                    )
                    .await?;
                info!(discussion = %id, "Created discussion");
                self.post_attribution(&id, &path).await?;

                let result = ReconciliationResult {
                    created: true,
                    ..ReconciliationResult::default()
                };
                let created = Discussion {
                    id,
                    body,
                    closed: false,
                    labels: Vec::new(),
                };
                (created, result, None)
            }
            Some(discussion) => {
                let body_changed = body != discussion.body;
                if body_changed {
                    self.discussions.update_body(&discussion.id, &body).await?;
                    info!(discussion = %discussion.id, "Updated discussion body");
                }
                let previous = self.previous_status(&path).await?;

                let result = ReconciliationResult {
                    body_changed,
                    ..ReconciliationResult::default()
                };
                (discussion, result, previous)
            }
        };

        let transition = plan_transition(
            previous_status.as_deref(),
            document.status_label,
            self.context.close_statuses,
            LiveState {
                labels: &discussion.labels,
                closed: discussion.closed,
            },
        );
        debug!(
            previous = ?previous_status,
            current = ?document.status_label.map(|l| l.name.as_str()),
            ?transition,
            "Planned status transition"
        );
        apply_transition(self.discussions, &discussion.id, &transition).await?;

        Ok(result.with_transition(transition))
    }

    /// First title-search hit with every label page merged.
    async fn find_discussion(&self, title: &str) -> Result<Option<Discussion>, SyncError> {
        let store = self.discussions;
        let Some(first) = store.search_by_title(title, None).await? else {
            return Ok(None);
        };

        let labels = collect_pages(first.labels, |after| async move {
            let page = store.search_by_title(title, Some(&after)).await?;
            page.map(|p| p.labels).ok_or_else(|| SyncError::UnexpectedShape {
                resource: format!("discussion '{title}'"),
                detail: "disappeared while paging its labels".to_string(),
            })
        })
        .await?;

        Ok(Some(Discussion {
            id: first.id,
            body: first.body,
            closed: first.closed,
            labels,
        }))
    }

    /// Status of the file at the pre-push revision; `None` if the file did
    /// not exist then or the push created the branch.
    async fn previous_status(&self, path: &str) -> Result<Option<String>, SyncError> {
        let Some(before) = self.context.before.filter(|r| !r.is_null_commit()) else {
            return Ok(None);
        };
        let previous = absent_if_not_found(self.content.get_file(path, before).await)?;
        Ok(previous.and_then(|file| self.context.status.extract(&file.content)))
    }

    async fn post_attribution(&self, id: &DiscussionId, path: &str) -> Result<(), SyncError> {
        let commits = self.content.list_recent_commits(path, 1).await?;
        let Some(commit) = commits.into_iter().next() else {
            debug!(%path, "No commit found for attribution");
            return Ok(());
        };

        let author = resolve_author(commit.actor.as_ref(), commit.commit_author.as_ref());
        if let Some(comment) = compose_comment(author.as_deref(), commit.commit_url.as_deref()) {
            self.discussions.add_comment(id, &comment).await?;
        }
        Ok(())
    }
}
