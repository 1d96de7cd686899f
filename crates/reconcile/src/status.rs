//! Status token extraction.

use regex::Regex;

/// Pulls the status token out of ADR or discussion content.
///
/// The pattern's first capturing group is the token. Only the first match is
/// used; a document with several status sections yields the first one.
#[derive(Debug, Clone)]
pub struct StatusExtractor {
    pattern: Regex,
}

impl StatusExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Returns the trimmed token, or `None` when nothing matches or the
    /// captured text is blank.
    pub fn extract(&self, content: &str) -> Option<String> {
        let captures = self.pattern.captures(content)?;
        let token = captures.get(1)?.as_str().trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}
