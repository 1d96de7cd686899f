//! adr-sync trigger event source.
//!
//! A GitHub Actions run is started by exactly one event. The runner exposes
//! its name (`GITHUB_EVENT_NAME`) and writes the webhook payload to a file
//! (`GITHUB_EVENT_PATH`). [`read_event`] loads that file and [`decode_event`]
//! turns the pair into a [`reconcile::SyncEvent`]:
//!
//! | Event | Action | Result |
//! |-------|--------|--------|
//! | `push` | any | `SyncEvent::Push` |
//! | `discussion` | `created`, `edited` | `SyncEvent::Discussion` |
//! | `discussion` | anything else | ignored |
//! | anything else | | ignored |
//!
//! Ignored events decode to `Ok(None)`; only malformed payloads are errors.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Payload shapes live here. The [`reconcile`] crate sees
//! only [`reconcile::SyncEvent`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use reconcile::{
    Actor, DiscussionAction, DiscussionId, DiscussionTrigger, GitRef, Label, LabelId,
    PushTrigger, SyncEvent,
};

pub const PUSH_EVENT: &str = "push";
pub const DISCUSSION_EVENT: &str = "discussion";

/// Errors reading or decoding the triggering event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Could not read event payload at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {event} payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A field the engine needs is missing or empty.
    #[error("The {event} payload has no {field}")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    before: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscussionPayload {
    #[serde(default)]
    action: String,
    discussion: DiscussionNode,
    changes: Option<Changes>,
    sender: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct DiscussionNode {
    node_id: String,
    title: String,
    body: Option<String>,
    #[serde(default)]
    state: String,
    category: CategoryNode,
    #[serde(default)]
    labels: Vec<LabelNode>,
}

#[derive(Debug, Deserialize)]
struct CategoryNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    node_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Changes {
    body: Option<BodyChange>,
}

#[derive(Debug, Deserialize)]
struct BodyChange {
    from: String,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Reads the payload file written by the runner and decodes it.
pub async fn read_event(event_name: &str, path: &Path) -> Result<Option<SyncEvent>, EventError> {
    let payload = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| EventError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    decode_event(event_name, &payload)
}

/// Decodes one triggering event. Events the engine does not handle return
/// `Ok(None)`.
pub fn decode_event(event_name: &str, payload: &str) -> Result<Option<SyncEvent>, EventError> {
    match event_name {
        PUSH_EVENT => decode_push(payload).map(Some),
        DISCUSSION_EVENT => decode_discussion(payload),
        other => {
            debug!(event = %other, "Ignoring unsupported event");
            Ok(None)
        }
    }
}

fn parse<'de, T: Deserialize<'de>>(event: &'static str, payload: &'de str) -> Result<T, EventError> {
    serde_json::from_str(payload).map_err(|source| EventError::Malformed { event, source })
}

fn decode_push(payload: &str) -> Result<SyncEvent, EventError> {
    let push: PushPayload = parse(PUSH_EVENT, payload)?;
    let git_ref = GitRef::new(push.git_ref).ok_or(EventError::MissingField {
        event: PUSH_EVENT,
        field: "ref",
    })?;

    Ok(SyncEvent::Push(PushTrigger {
        git_ref,
        before: push.before.and_then(GitRef::new),
    }))
}

fn decode_discussion(payload: &str) -> Result<Option<SyncEvent>, EventError> {
    let event: DiscussionPayload = parse(DISCUSSION_EVENT, payload)?;
    let action = match event.action.as_str() {
        "created" => DiscussionAction::Created,
        "edited" => DiscussionAction::Edited,
        other => {
            debug!(action = %other, "Ignoring discussion action");
            return Ok(None);
        }
    };

    let discussion = event.discussion;
    let id = DiscussionId::new(discussion.node_id).ok_or(EventError::MissingField {
        event: DISCUSSION_EVENT,
        field: "discussion.node_id",
    })?;
    let labels = discussion
        .labels
        .into_iter()
        .filter_map(|label| {
            LabelId::new(label.node_id).map(|id| Label {
                id,
                name: label.name,
            })
        })
        .collect();

    Ok(Some(SyncEvent::Discussion(DiscussionTrigger {
        action,
        id,
        title: discussion.title,
        body: discussion.body.unwrap_or_default(),
        closed: discussion.state == "closed",
        category: discussion.category.name,
        labels,
        previous_body: event.changes.and_then(|c| c.body).map(|b| b.from),
        sender: event.sender,
    })))
}
