//! Validated run settings.
//!
//! [`SyncSettings`] is constructed once per run by the composition root and
//! shared read-only by every component; invalid input is rejected here, never
//! midway through a reconciliation pass.

use regex::Regex;

use crate::status::StatusExtractor;
use crate::{BranchName, RepositorySlug, SettingsError};

/// Matches the token on the first non-blank line after a `## Status` heading,
/// dropping a trailing `by …` annotation.
pub const DEFAULT_STATUS_PATTERN: &str =
    r"##\s*Status[ \t]*\r?\n\s*?([A-Za-z][^\r\n]*?)(?:[ \t]+by\b[^\n]*)?[ \t]*(?:\r?\n|$)";

/// ADR file names look like `0001-record-architecture-decisions.md`.
pub const DEFAULT_TITLE_PATTERN: &str = r"^\d{4}-.+\.md$";

pub const DEFAULT_CLOSE_STATUSES: &str = "Accepted, Superseded, Deprecated, Rejected";

pub const DEFAULT_BRANCH: &str = "main";

pub const DEFAULT_CATEGORY: &str = "ADR";

/// Used when the repository has no usable `.adr-dir` file.
pub const DEFAULT_ADR_DIR: &str = "doc/adr";

/// Repository-root file naming the ADR directory (adr-tools convention).
pub const ADR_DIR_FILE: &str = ".adr-dir";

pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Trims whitespace, a leading `./`, and surrounding slashes from a
/// repository-relative directory.
pub fn normalize_adr_dir(raw: &str) -> String {
    let dir = raw.trim();
    let dir = dir.strip_prefix("./").unwrap_or(dir);
    dir.trim_matches('/').to_string()
}

/// Status names whose discussion should be closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseStatuses(Vec<String>);

impl CloseStatuses {
    /// Parses a comma-separated list; entries are trimmed and blanks dropped.
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|s| s == status)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Everything a run needs to know besides the triggering event.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub repository: RepositorySlug,
    /// The only branch ADRs are synchronised from and committed to.
    pub branch: BranchName,
    /// Discussion category ADR discussions are created in.
    pub category: String,
    pub status: StatusExtractor,
    pub title_pattern: Regex,
    pub close_statuses: CloseStatuses,
    /// Web server root used to build blob URLs for link rewriting.
    pub server_url: String,
}

/// Raw settings as read from flags or the environment.
#[derive(Debug, Clone)]
pub struct RawSettings<'a> {
    pub repository: RepositorySlug,
    pub branch: &'a str,
    pub category: &'a str,
    pub status_pattern: &'a str,
    pub title_pattern: &'a str,
    pub close_statuses: &'a str,
    pub server_url: &'a str,
}

impl SyncSettings {
    /// Validates and compiles `raw`.
    pub fn from_raw(raw: RawSettings<'_>) -> Result<Self, SettingsError> {
        let branch = BranchName::new(raw.branch.trim()).ok_or(SettingsError::Empty { name: "branch" })?;
        let category = raw.category.trim();
        if category.is_empty() {
            return Err(SettingsError::Empty {
                name: "discussion-category",
            });
        }

        let status_pattern = Regex::new(raw.status_pattern).map_err(|source| {
            SettingsError::InvalidPattern {
                name: "status",
                source,
            }
        })?;
        // captures_len counts the implicit whole-match group.
        let groups = status_pattern.captures_len() - 1;
        if groups != 1 {
            return Err(SettingsError::CaptureGroupCount { found: groups });
        }

        let title_pattern = Regex::new(raw.title_pattern).map_err(|source| {
            SettingsError::InvalidPattern {
                name: "title",
                source,
            }
        })?;

        let server_url = raw.server_url.trim_end_matches('/');
        if let Err(source) = url::Url::parse(server_url) {
            return Err(SettingsError::InvalidServerUrl {
                url: raw.server_url.to_string(),
                source,
            });
        }

        Ok(Self {
            repository: raw.repository,
            branch,
            category: category.to_string(),
            status: StatusExtractor::new(status_pattern),
            title_pattern,
            close_statuses: CloseStatuses::parse(raw.close_statuses),
            server_url: server_url.to_string(),
        })
    }

    /// Settings with every default applied, for the given repository.
    pub fn defaults(repository: RepositorySlug) -> Result<Self, SettingsError> {
        Self::from_raw(RawSettings {
            repository,
            branch: DEFAULT_BRANCH,
            category: DEFAULT_CATEGORY,
            status_pattern: DEFAULT_STATUS_PATTERN,
            title_pattern: DEFAULT_TITLE_PATTERN,
            close_statuses: DEFAULT_CLOSE_STATUSES,
            server_url: DEFAULT_SERVER_URL,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug() -> RepositorySlug {
        RepositorySlug::parse("octo/adr").unwrap()
    }

    fn raw<'a>(status_pattern: &'a str) -> RawSettings<'a> {
        RawSettings {
            repository: slug(),
            branch: "main",
            category: "ADR",
            status_pattern,
            title_pattern: DEFAULT_TITLE_PATTERN,
            close_statuses: DEFAULT_CLOSE_STATUSES,
            server_url: "https://github.com/",
        }
    }

    #[test]
    fn adr_dir_is_normalized() {
        assert_eq!(normalize_adr_dir("docs/adr\n"), "docs/adr");
        assert_eq!(normalize_adr_dir("./docs/adr/"), "docs/adr");
        assert_eq!(normalize_adr_dir("  \n"), "");
    }

    #[test]
    fn close_statuses_are_trimmed() {
        let set = CloseStatuses::parse(" Accepted ,Rejected,, ");
        assert_eq!(set.as_slice(), ["Accepted".to_string(), "Rejected".to_string()]);
        assert!(set.contains("Accepted"));
        assert!(!set.contains("accepted"));
    }

    #[test]
    fn defaults_are_valid() {
        let settings = SyncSettings::defaults(slug()).unwrap();
        assert_eq!(settings.branch.as_str(), "main");
        assert!(settings.title_pattern.is_match("0001-record-architecture-decisions.md"));
        assert!(!settings.title_pattern.is_match("README.md"));
        assert!(settings.close_statuses.contains("Superseded"));
    }

    #[test]
    fn server_url_trailing_slash_is_dropped() {
        let settings = SyncSettings::from_raw(raw(DEFAULT_STATUS_PATTERN)).unwrap();
        assert_eq!(settings.server_url, "https://github.com");
    }

    #[test]
    fn status_pattern_needs_exactly_one_group() {
        assert!(matches!(
            SyncSettings::from_raw(raw(r"Status")),
            Err(SettingsError::CaptureGroupCount { found: 0 })
        ));
        assert!(matches!(
            SyncSettings::from_raw(raw(r"(Status)(.*)")),
            Err(SettingsError::CaptureGroupCount { found: 2 })
        ));
    }

    #[test]
    fn server_url_must_parse() {
        let mut r = raw(DEFAULT_STATUS_PATTERN);
        r.server_url = "github.com";
        assert!(matches!(
            SyncSettings::from_raw(r),
            Err(SettingsError::InvalidServerUrl { .. })
        ));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(matches!(
            SyncSettings::from_raw(raw(r"(unclosed")),
            Err(SettingsError::InvalidPattern { name: "status", .. })
        ));
    }

    #[test]
    fn empty_category_is_rejected() {
        let mut r = raw(DEFAULT_STATUS_PATTERN);
        r.category = "  ";
        assert!(matches!(
            SyncSettings::from_raw(r),
            Err(SettingsError::Empty { .. })
        ));
    }
}
