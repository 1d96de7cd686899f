//! Authenticated HTTP plumbing shared by the REST and GraphQL adapters.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use reconcile::RepositorySlug;

use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::GithubError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("adr-sync/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Connection settings for one repository.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    pub api_url: String,
    pub graphql_url: String,
    pub repository: RepositorySlug,
}

/// A GitHub client scoped to a single repository.
///
/// Implements both [`reconcile::ContentStore`] (REST contents and commits)
/// and [`reconcile::DiscussionStore`] (GraphQL discussions, labels, and
/// categories).
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    graphql_url: Url,
    repository: RepositorySlug,
}

fn parse_url(raw: &str) -> Result<Url, GithubError> {
    Url::parse(raw).map_err(|_| GithubError::InvalidBaseUrl {
        url: raw.to_string(),
    })
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GithubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: parse_url(&config.api_url)?,
            graphql_url: parse_url(&config.graphql_url)?,
            repository: config.repository,
        })
    }

    pub fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    /// `{api}/repos/{owner}/{repo}/{segments...}` with every segment
    /// percent-encoded.
    pub(crate) fn repo_endpoint<'s>(
        &self,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url, GithubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidBaseUrl {
                url: self.api_url.to_string(),
            })?
            .pop_if_empty()
            .extend([
                "repos",
                self.repository.owner.as_str(),
                self.repository.name.as_str(),
            ])
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<T, GithubError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response, resource).await
    }

    pub(crate) async fn put_json<B, T>(
        &self,
        url: Url,
        body: &B,
        resource: &str,
    ) -> Result<T, GithubError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "PUT");
        let response = self.http.put(url).json(body).send().await?;
        read_json(response, resource).await
    }

    /// Runs one GraphQL document and returns its `data`.
    #[instrument(skip(self, query, variables))]
    pub(crate) async fn graphql<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<T, GithubError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest { query, variables };
        let response = self
            .http
            .post(self.graphql_url.clone())
            .json(&request)
            .send()
            .await?;
        let envelope: GraphQlResponse<T> = read_json(response, operation).await?;
        envelope.into_data(operation)
    }
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    resource: &str,
) -> Result<T, GithubError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(GithubError::NotFound {
            resource: resource.to_string(),
        });
    }

    let body = response.text().await?;
    if !status.is_success() {
        return Err(GithubError::Status {
            status: status.as_u16(),
            resource: resource.to_string(),
            body,
        });
    }
    decode_json(&body, resource)
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str, resource: &str) -> Result<T, GithubError> {
    serde_json::from_str(body).map_err(|source| GithubError::Decode {
        resource: resource.to_string(),
        source,
    })
}
