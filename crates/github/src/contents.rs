//! [`ContentStore`] over the REST contents and commits endpoints.
//!
//! File bodies travel base64-encoded. GitHub wraps the encoded text with
//! newlines, so whitespace is stripped before decoding.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use reconcile::{
    Actor, CommitAuthor, CommitResult, ContentStore, DirectoryEntry, EntryKind, GitRef,
    PathListing, RecentCommit, RevisionHandle, StoreError, StoredFile,
};

use crate::{GithubClient, GithubError};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// `GET /contents/{path}` answers with an array for directories and an
/// object for everything else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ListingEntry>),
    Item(ContentItem),
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: EntryKind,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    content: Option<String>,
    /// `base64`, or `none` when the file is too large to inline.
    #[serde(default)]
    encoding: Option<String>,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    commit: WrittenCommit,
}

#[derive(Debug, Deserialize)]
struct WrittenCommit {
    html_url: Option<String>,
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    html_url: Option<String>,
    /// The linked account; `null` when GitHub cannot map the commit email.
    author: Option<Actor>,
    commit: GitCommit,
}

#[derive(Debug, Deserialize)]
struct GitCommit {
    author: Option<CommitAuthor>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub(crate) fn decode_content(resource: &str, encoded: &str) -> Result<String, GithubError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| GithubError::Content {
        resource: resource.to_string(),
        detail: format!("invalid base64: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| GithubError::Content {
        resource: resource.to_string(),
        detail: format!("not UTF-8: {e}"),
    })
}

pub(crate) fn encode_content(text: &str) -> String {
    STANDARD.encode(text)
}

fn into_stored_file(path: &str, response: ContentsResponse) -> Result<StoredFile, GithubError> {
    let item = match response {
        ContentsResponse::Item(item) if item.kind == EntryKind::File => item,
        ContentsResponse::Item(item) => {
            return Err(GithubError::Content {
                resource: path.to_string(),
                detail: format!("expected a file, found {:?}", item.kind),
            })
        }
        ContentsResponse::Listing(_) => {
            return Err(GithubError::Content {
                resource: path.to_string(),
                detail: "expected a file, found a directory".to_string(),
            })
        }
    };

    let encoded = match (item.content, item.encoding.as_deref()) {
        (Some(content), Some("base64") | None) if !content.is_empty() => content,
        _ => {
            return Err(GithubError::Content {
                resource: path.to_string(),
                detail: "file has no body".to_string(),
            })
        }
    };
    let revision = RevisionHandle::new(item.sha).ok_or_else(|| GithubError::Content {
        resource: path.to_string(),
        detail: "file has no sha".to_string(),
    })?;

    Ok(StoredFile {
        content: decode_content(path, &encoded)?,
        revision,
    })
}

fn into_listing(response: ContentsResponse) -> PathListing {
    match response {
        ContentsResponse::Listing(entries) => PathListing::Directory(
            entries
                .into_iter()
                .map(|entry| DirectoryEntry {
                    name: entry.name,
                    kind: entry.kind,
                })
                .collect(),
        ),
        ContentsResponse::Item(_) => PathListing::File,
    }
}

fn into_recent(entries: Vec<CommitEntry>) -> Vec<RecentCommit> {
    entries
        .into_iter()
        .map(|entry| RecentCommit {
            commit_url: entry.html_url,
            actor: entry.author,
            commit_author: entry.commit.author,
        })
        .collect()
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

// ---------------------------------------------------------------------------
// ContentStore
// ---------------------------------------------------------------------------

impl GithubClient {
    async fn fetch_contents(
        &self,
        path: &str,
        git_ref: &GitRef,
    ) -> Result<ContentsResponse, GithubError> {
        let mut url = self.repo_endpoint(std::iter::once("contents").chain(path_segments(path)))?;
        url.query_pairs_mut().append_pair("ref", git_ref.as_str());
        self.get_json(url, &format!("{path}@{git_ref}")).await
    }
}

#[async_trait]
impl ContentStore for GithubClient {
    #[instrument(skip(self))]
    async fn get_file(&self, path: &str, git_ref: &GitRef) -> Result<StoredFile, StoreError> {
        let response = self.fetch_contents(path, git_ref).await?;
        Ok(into_stored_file(path, response)?)
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn create_or_update_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        message: &str,
        revision: Option<&RevisionHandle>,
    ) -> Result<CommitResult, StoreError> {
        let url = self.repo_endpoint(std::iter::once("contents").chain(path_segments(path)))?;
        let body = PutContents {
            message,
            content: encode_content(content),
            branch,
            sha: revision.map(RevisionHandle::as_str),
        };

        let response: PutContentsResponse = self.put_json(url, &body, path).await?;
        info!(%path, %branch, commit = ?response.commit.html_url, "Committed file");
        Ok(CommitResult {
            commit_url: response.commit.html_url,
            commit_author: response.commit.author,
        })
    }

    #[instrument(skip(self))]
    async fn list_directory(
        &self,
        path: &str,
        git_ref: &GitRef,
    ) -> Result<PathListing, StoreError> {
        Ok(into_listing(self.fetch_contents(path, git_ref).await?))
    }

    #[instrument(skip(self))]
    async fn list_recent_commits(
        &self,
        path: &str,
        limit: u32,
    ) -> Result<Vec<RecentCommit>, StoreError> {
        let mut url = self.repo_endpoint(["commits"])?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("per_page", &limit.to_string());
        let entries: Vec<CommitEntry> = self.get_json(url, &format!("commits for {path}")).await?;
        Ok(into_recent(entries))
    }
}
