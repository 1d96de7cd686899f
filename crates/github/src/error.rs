//! Adapter-level errors and their mapping onto [`StoreError`].

use reconcile::StoreError;
use thiserror::Error;

/// Failures talking to the GitHub REST or GraphQL API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 404, or GraphQL reported a `NOT_FOUND` error or a
    /// null node.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success HTTP status.
    #[error("GitHub API returned {status} for {resource}: {body}")]
    Status {
        status: u16,
        resource: String,
        body: String,
    },

    /// The GraphQL response carried errors.
    #[error("GraphQL request failed: {messages}")]
    GraphQl { messages: String },

    /// A response body did not match the expected shape.
    #[error("Could not decode response for {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// A file body was not valid base64 / UTF-8, or a path resolved to
    /// something other than a file.
    #[error("Unexpected content for {resource}: {detail}")]
    Content { resource: String, detail: String },

    /// The configured API base URL cannot take path segments.
    #[error("Invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    /// The token contains characters not allowed in an HTTP header.
    #[error("The GitHub token is not a valid header value")]
    InvalidToken,
}

impl From<GithubError> for StoreError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NotFound { resource } => StoreError::NotFound { resource },
            GithubError::Content { resource, detail } => {
                StoreError::UnexpectedShape { resource, detail }
            }
            other => StoreError::Transport(Box::new(other)),
        }
    }
}
