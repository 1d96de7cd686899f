//! Error types for the reconciliation domain.
//!
//! [`StoreError`] is the collaborator boundary: every [`crate::ports`] method
//! returns it. [`StoreError::NotFound`] is the one distinguished kind; the
//! synchronizers convert it into an absent value wherever absence is expected
//! and let it propagate everywhere else.
//!
//! [`SyncError`] covers conditions that abort a run. There is no partial
//! success: a run either completes its pass or reports exactly one of these.

use thiserror::Error;

/// Failures reported by a content or discussion store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed resource does not exist (file at ref, directory, node).
    #[error("Not found: {resource}")]
    NotFound {
        /// Human-readable description of what was looked up.
        resource: String,
    },

    /// The resource exists but its shape is unusable (e.g. a directory where a
    /// file was expected, a file without a body).
    #[error("Unexpected shape for {resource}: {detail}")]
    UnexpectedShape { resource: String, detail: String },

    /// Any other failure. Opaque to the domain and never retried here.
    #[error("Store request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Convenience constructor for [`StoreError::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Converts an expected absence into `Ok(None)`, passing every other error on.
pub(crate) fn absent_if_not_found<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configured environment does not match the repository: missing
    /// discussion category, missing ADR directory, ADR path is a file, or the
    /// event fired on a branch other than the configured one.
    #[error("Configuration mismatch: {message}")]
    ConfigurationMismatch { message: String },

    /// A fetched value exists but cannot be interpreted.
    #[error("Unexpected shape for {resource}: {detail}")]
    UnexpectedShape { resource: String, detail: String },

    /// A paginated listing kept reporting further pages past the round cap.
    #[error("Pagination did not terminate after {rounds} rounds")]
    PaginationRunaway { rounds: usize },

    /// A store failure that is not an expected absence.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Convenience constructor for [`SyncError::ConfigurationMismatch`].
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::ConfigurationMismatch {
            message: message.into(),
        }
    }
}

/// Errors produced while building [`crate::SyncSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid {name} pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("The status pattern must contain exactly one capturing group, found {found}")]
    CaptureGroupCount { found: usize },

    #[error("Setting '{name}' must not be empty")]
    Empty { name: &'static str },

    #[error("Invalid server URL '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_none() {
        let r: Result<u8, StoreError> = Err(StoreError::not_found("doc/adr/x.md"));
        assert!(absent_if_not_found(r).unwrap().is_none());
    }

    #[test]
    fn other_errors_pass_through() {
        let r: Result<u8, StoreError> = Err(StoreError::Transport("boom".into()));
        assert!(matches!(
            absent_if_not_found(r),
            Err(StoreError::Transport(_))
        ));
    }
}
