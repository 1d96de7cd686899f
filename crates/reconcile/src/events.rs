//! Triggering events as the engine sees them.
//!
//! Transport-specific payloads are decoded into these types by the `listener`
//! crate; nothing here knows about webhook JSON.

use crate::{Actor, DiscussionId, GitRef, Label};

/// One inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Push(PushTrigger),
    Discussion(DiscussionTrigger),
}

impl SyncEvent {
    /// Short name for logs and spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Push(_) => "push",
            Self::Discussion(d) => match d.action {
                DiscussionAction::Created => "discussion.created",
                DiscussionAction::Edited => "discussion.edited",
            },
        }
    }
}

/// Commits pushed to a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTrigger {
    /// Full ref that was pushed, e.g. `refs/heads/main`.
    pub git_ref: GitRef,
    /// Head of the ref before the push. Absent or all zeros for a new branch.
    pub before: Option<GitRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionAction {
    Created,
    Edited,
}

/// A discussion as it was when the event fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionTrigger {
    pub action: DiscussionAction,
    pub id: DiscussionId,
    pub title: String,
    pub body: String,
    pub closed: bool,
    /// Category name, compared against the configured ADR category.
    pub category: String,
    /// Labels attached at event time.
    pub labels: Vec<Label>,
    /// Body before this edit. Only present for edits that changed the body.
    pub previous_body: Option<String>,
    /// Account that created or edited the discussion.
    pub sender: Option<Actor>,
}
