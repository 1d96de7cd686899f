//! GraphQL documents and response shapes for discussions, labels, and
//! categories.
//!
//! Every connection is requested 100 nodes at a time with its `pageInfo`, so
//! the domain can follow cursors through [`reconcile::Page`].

use serde::{Deserialize, Serialize};

use reconcile::{
    Category, DiscussionId, DiscussionPage, Label, Page, PageInfo, RepositoryNodeId,
};

use crate::GithubError;

pub(crate) const CATALOG_QUERY: &str = r#"
query RepositoryCategoriesAndLabels($owner: String!, $name: String!, $categoriesAfter: String, $labelsAfter: String) {
  repository(owner: $owner, name: $name) {
    id
    discussionCategories(first: 100, after: $categoriesAfter) {
      nodes { id name }
      pageInfo { hasNextPage endCursor }
    }
    labels(first: 100, after: $labelsAfter) {
      nodes { id name }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const CATEGORIES_QUERY: &str = r#"
query RepositoryCategories($owner: String!, $name: String!, $after: String) {
  repository(owner: $owner, name: $name) {
    discussionCategories(first: 100, after: $after) {
      nodes { id name }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const LABELS_QUERY: &str = r#"
query RepositoryLabels($owner: String!, $name: String!, $after: String) {
  repository(owner: $owner, name: $name) {
    id
    labels(first: 100, after: $after) {
      nodes { id name }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const SEARCH_QUERY: &str = r#"
query SearchDiscussions($query: String!, $labelsAfter: String) {
  search(query: $query, type: DISCUSSION, first: 1) {
    nodes {
      ... on Discussion {
        id
        body
        closed
        labels(first: 100, after: $labelsAfter) {
          nodes { id name }
          pageInfo { hasNextPage endCursor }
        }
      }
    }
  }
}
"#;

pub(crate) const CREATE_DISCUSSION: &str = r#"
mutation CreateDiscussion($repositoryId: ID!, $title: String!, $body: String!, $categoryId: ID!) {
  createDiscussion(input: {repositoryId: $repositoryId, title: $title, body: $body, categoryId: $categoryId}) {
    discussion { id }
  }
}
"#;

pub(crate) const UPDATE_DISCUSSION: &str = r#"
mutation UpdateDiscussion($discussionId: ID!, $body: String!) {
  updateDiscussion(input: {discussionId: $discussionId, body: $body}) {
    clientMutationId
  }
}
"#;

pub(crate) const ADD_DISCUSSION_COMMENT: &str = r#"
mutation AddDiscussionComment($discussionId: ID!, $body: String!) {
  addDiscussionComment(input: {discussionId: $discussionId, body: $body}) {
    clientMutationId
  }
}
"#;

pub(crate) const ADD_LABEL: &str = r#"
mutation AddLabel($discussionId: ID!, $labelId: ID!) {
  addLabelsToLabelable(input: {labelableId: $discussionId, labelIds: [$labelId]}) {
    clientMutationId
  }
}
"#;

pub(crate) const REMOVE_LABEL: &str = r#"
mutation RemoveLabel($discussionId: ID!, $labelId: ID!) {
  removeLabelsFromLabelable(input: {labelableId: $discussionId, labelIds: [$labelId]}) {
    clientMutationId
  }
}
"#;

pub(crate) const CLOSE_DISCUSSION: &str = r#"
mutation CloseDiscussion($discussionId: ID!) {
  closeDiscussion(input: {discussionId: $discussionId}) {
    clientMutationId
  }
}
"#;

pub(crate) const REOPEN_DISCUSSION: &str = r#"
mutation ReopenDiscussion($discussionId: ID!) {
  reopenDiscussion(input: {discussionId: $discussionId}) {
    clientMutationId
  }
}
"#;

pub(crate) const CREATE_LABEL: &str = r#"
mutation CreateLabel($repositoryId: ID!, $name: String!, $color: String!, $description: String!) {
  createLabel(input: {repositoryId: $repositoryId, name: $name, color: $color, description: $description}) {
    label { id name }
  }
}
"#;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'q, V> {
    pub query: &'q str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// `data`, unless the server reported errors. A `NOT_FOUND` error wins
    /// over every other error.
    pub(crate) fn into_data(self, operation: &str) -> Result<T, GithubError> {
        if !self.errors.is_empty() {
            if self
                .errors
                .iter()
                .any(|e| e.kind.as_deref() == Some("NOT_FOUND"))
            {
                return Err(GithubError::NotFound {
                    resource: operation.to_string(),
                });
            }
            let messages = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GithubError::GraphQl { messages });
        }

        self.data.ok_or_else(|| GithubError::GraphQl {
            messages: format!("{operation} returned no data"),
        })
    }
}

// ---------------------------------------------------------------------------
// Query data
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData<R> {
    pub repository: Option<R>,
}

impl<R> RepositoryData<R> {
    pub(crate) fn into_repository(self, resource: &str) -> Result<R, GithubError> {
        self.repository.ok_or_else(|| GithubError::NotFound {
            resource: resource.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogRepository {
    pub id: RepositoryNodeId,
    pub discussion_categories: Page<Category>,
    pub labels: Page<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoriesRepository {
    pub discussion_categories: Page<Category>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelsRepository {
    pub id: RepositoryNodeId,
    pub labels: Page<Label>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchConnection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchConnection {
    pub nodes: Vec<SearchNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchNode {
    pub id: DiscussionId,
    pub body: String,
    pub closed: bool,
    pub labels: Option<Page<Label>>,
}

impl SearchData {
    /// The first hit, with an empty final labels page if it has none.
    pub(crate) fn into_first(self) -> Option<DiscussionPage> {
        self.search.nodes.into_iter().next().map(|node| DiscussionPage {
            id: node.id,
            body: node.body,
            closed: node.closed,
            labels: node
                .labels
                .unwrap_or_else(|| Page::new(Vec::new(), PageInfo::last())),
        })
    }
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    pub id: DiscussionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDiscussionData {
    pub create_discussion: CreatedDiscussion,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedDiscussion {
    pub discussion: IdNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateLabelData {
    pub create_label: CreatedLabel,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedLabel {
    pub label: Label,
}
