//! One reconciliation run per triggering event.
//!
//! All store calls are issued and awaited sequentially. Each run builds its
//! state (catalog, label cache) from scratch; nothing is carried between runs.

use tracing::{debug, info, info_span, Instrument};

use crate::config::{normalize_adr_dir, ADR_DIR_FILE, DEFAULT_ADR_DIR};
use crate::errors::absent_if_not_found;
use crate::events::{PushTrigger, SyncEvent};
use crate::ports::{ContentStore, DiscussionStore};
use crate::router::DiscussionRouter;
use crate::scan::{DocumentOutcome, RepositoryScan};
use crate::{GitRef, ReconciliationResult, RunId, SyncError, SyncSettings};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// A push was reconciled; one outcome per ADR file.
    Scanned(Vec<DocumentOutcome>),
    /// A discussion event was handled; `None` if it was not an ADR discussion.
    Routed(Option<ReconciliationResult>),
}

pub struct SyncEngine<'a> {
    content: &'a dyn ContentStore,
    discussions: &'a dyn DiscussionStore,
    settings: &'a SyncSettings,
}

impl<'a> SyncEngine<'a> {
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

    pub async fn run(&self, event: &SyncEvent) -> Result<RunSummary, SyncError> {
        let run_id = RunId::new_random();
        let span = info_span!("sync_run", %run_id, event = event.kind());

        async {
            let summary = match event {
                SyncEvent::Push(push) => RunSummary::Scanned(self.on_push(push).await?),
                SyncEvent::Discussion(trigger) => {
                    let adr_dir = self.resolve_adr_dir(&GitRef::from(&self.settings.branch)).await?;
                    RunSummary::Routed(
                        DiscussionRouter::new(self.content, self.discussions, self.settings)
                            .route(&adr_dir, trigger)
                            .await?,
                    )
                }
            };
            info!(?summary, "Run complete");
            Ok::<_, SyncError>(summary)
        }
        .instrument(span)
        .await
    }

    async fn on_push(&self, push: &PushTrigger) -> Result<Vec<DocumentOutcome>, SyncError> {
        let pushed = push.git_ref.branch().unwrap_or(push.git_ref.as_str());
        if pushed != self.settings.branch.as_str() {
            return Err(SyncError::mismatch(format!(
                "Action triggered on branch '{pushed}', but configured to run only on branch '{}'",
                self.settings.branch
            )));
        }

        let adr_dir = self.resolve_adr_dir(&push.git_ref).await?;
        RepositoryScan::new(self.content, self.discussions, self.settings)
            .run(&adr_dir, &push.git_ref, push.before.as_ref())
            .await
    }

    /// The ADR directory named by `.adr-dir` at `git_ref`, or the default.
    async fn resolve_adr_dir(&self, git_ref: &GitRef) -> Result<String, SyncError> {
        let file = absent_if_not_found(self.content.get_file(ADR_DIR_FILE, git_ref).await)?;
        let configured = file
            .map(|f| normalize_adr_dir(&f.content))
            .filter(|dir| !dir.is_empty());

        match configured {
            Some(dir) => {
                debug!(%dir, "Using ADR directory from {ADR_DIR_FILE}");
                Ok(dir)
            }
            None => Ok(DEFAULT_ADR_DIR.to_string()),
        }
    }
}
