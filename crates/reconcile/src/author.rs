//! Author attribution for newly synchronised ADRs.

use crate::{Actor, CommitAuthor};

/// Human-readable author, first match wins: platform login (`@login`), then
/// `Name <email>`, then `Name`.
pub fn resolve_author(actor: Option<&Actor>, commit_author: Option<&CommitAuthor>) -> Option<String> {
    if let Some(actor) = actor {
        return Some(format!("@{}", actor.login));
    }

    let commit_author = commit_author?;
    match (commit_author.name.as_deref(), commit_author.email.as_deref()) {
        (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
            Some(format!("{name} <{email}>"))
        }
        (Some(name), _) if !name.is_empty() => Some(name.to_string()),
        _ => None,
    }
}

/// The attribution comment posted on creation. `None` when there is neither
/// an author nor a commit URL to mention.
pub fn compose_comment(author: Option<&str>, commit_url: Option<&str>) -> Option<String> {
    let mut sentences = Vec::with_capacity(2);
    if let Some(author) = author {
        sentences.push(format!("This ADR was authored by {author}."));
    }
    if let Some(url) = commit_url {
        sentences.push(format!("You can view the commit [here]({url})."));
    }
    if sentences.is_empty() {
        None
    } else {
        Some(sentences.join(" "))
    }
}
