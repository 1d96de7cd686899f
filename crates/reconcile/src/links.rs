//! Markdown link rewriting.
//!
//! ADR files link to each other with paths relative to the ADR directory (or
//! to the repository root). Those links break once the content is copied into
//! a discussion, so before comparison and storage every such target is turned
//! into an absolute blob URL:
//!
//! - `[text](path)` with a relative `path` → resolved against `base/adr_dir/`.
//! - `[text](/path)` → resolved against `base`.
//! - `[text](http://…)` / `[text](https://…)` are left verbatim.
//!
//! Resolution follows URL rules: `.` and `..` segments are applied to the
//! URL path and characters such as spaces are percent-encoded. Link text and
//! all non-link text are preserved exactly.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use url::Url;

use crate::RepositorySlug;

fn link_pattern() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"))
}

/// Rewrites document-relative and root-relative links against a base URL.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    base_url: Url,
    adr_dir: String,
}

impl LinkRewriter {
    /// `base_url` is the blob root (see [`blob_base_url`]); `adr_dir` is the
    /// repository-relative ADR directory.
    pub fn new(base_url: &str, adr_dir: impl Into<String>) -> Result<Self, url::ParseError> {
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            base_url,
            adr_dir: adr_dir.into(),
        })
    }

    pub fn rewrite(&self, content: &str) -> String {
        link_pattern()
            .replace_all(content, |caps: &Captures<'_>| {
                let text = &caps[1];
                let target = &caps[2];
                match self.resolve(target) {
                    Some(url) => format!("[{text}]({url})"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// `None` keeps the link as written.
    fn resolve(&self, target: &str) -> Option<Url> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return None;
        }
        let relative = match target.strip_prefix('/') {
            Some(root_relative) => root_relative.trim_start_matches('/').to_string(),
            None => format!("{}/{}", self.adr_dir.trim_end_matches('/'), target),
        };
        self.base_url.join(&relative).ok()
    }
}

/// `{server}/{owner}/{repo}/blob/{branch}/` with the branch percent-encoded as
/// a single path component.
pub fn blob_base_url(server_url: &str, repository: &RepositorySlug, branch: &str) -> String {
    format!(
        "{}/{}/{}/blob/{}/",
        server_url.trim_end_matches('/'),
        repository.owner,
        repository.name,
        encode_component(branch)
    )
}

fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}
