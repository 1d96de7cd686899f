//! Status-driven label and open/closed transitions.
//!
//! Both synchronizers share this policy. The decision is made from the status
//! *change* (previous vs. current), never from the discussion's live label or
//! closed state; the live state only turns an already-satisfied step into a
//! no-op. When the status did not change nothing is touched, so manual label
//! edits or manual close/reopen survive an unrelated content edit.

use tracing::{debug, info};

use crate::config::CloseStatuses;
use crate::ports::DiscussionStore;
use crate::{DiscussionId, Label, LabelId, ReconciliationResult, StoreError};

/// The label and open/closed calls one sync needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTransition {
    pub label_to_remove: Option<LabelId>,
    pub label_to_add: Option<LabelId>,
    pub should_close: bool,
    pub should_reopen: bool,
}

/// The live state the transition is checked against.
#[derive(Debug, Clone, Copy)]
pub struct LiveState<'a> {
    pub labels: &'a [Label],
    pub closed: bool,
}

/// Decides the transition from `previous` to the status carried by `current`.
pub fn plan_transition(
    previous: Option<&str>,
    current: Option<&Label>,
    close_statuses: &CloseStatuses,
    live: LiveState<'_>,
) -> StatusTransition {
    let current_status = current.map(|label| label.name.as_str());
    if previous == current_status {
        return StatusTransition::default();
    }

    let label_to_remove = previous
        .and_then(|status| live.labels.iter().find(|label| label.name == status))
        .map(|label| label.id.clone());
    let label_to_add = current
        .filter(|wanted| !live.labels.iter().any(|label| label.id == wanted.id))
        .map(|label| label.id.clone());

    let should_have_been_closed = previous.is_some_and(|s| close_statuses.contains(s));
    let should_be_closed = current_status.is_some_and(|s| close_statuses.contains(s));

    StatusTransition {
        label_to_remove,
        label_to_add,
        should_close: !should_have_been_closed && should_be_closed && !live.closed,
        should_reopen: should_have_been_closed && !should_be_closed && live.closed,
    }
}

/// Issues the calls in `transition` against discussion `id`: remove, add,
/// then close or reopen.
pub async fn apply_transition(
    store: &dyn DiscussionStore,
    id: &DiscussionId,
    transition: &StatusTransition,
) -> Result<(), StoreError> {
    if let Some(label_id) = &transition.label_to_remove {
        debug!(discussion = %id, label = %label_id, "Removing previous status label");
        store.remove_label(id, label_id).await?;
    }
    if let Some(label_id) = &transition.label_to_add {
        debug!(discussion = %id, label = %label_id, "Adding status label");
        store.add_label(id, label_id).await?;
    }
    if transition.should_close {
        info!(discussion = %id, "Closing discussion");
        store.close(id).await?;
    } else if transition.should_reopen {
        info!(discussion = %id, "Reopening discussion");
        store.reopen(id).await?;
    }
    Ok(())
}

impl ReconciliationResult {
    pub(crate) fn with_transition(mut self, transition: StatusTransition) -> Self {
        self.label_to_remove = transition.label_to_remove;
        self.label_to_add = transition.label_to_add;
        self.should_close = transition.should_close;
        self.should_reopen = transition.should_reopen;
        self
    }
}
