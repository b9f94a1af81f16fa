//! GitHub Contents API client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RemoteFile, RemoteFileStore, StoreError};
use crate::config::GithubConfig;

const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("backyard-eggs-backend/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GithubErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`RemoteFileStore`] backed by a GitHub repository.
#[derive(Clone)]
pub struct GithubStore {
    client: Client,
    token: String,
    owner: String,
    repo: String,
    branch: String,
    api_url: String,
}

impl GithubStore {
    pub fn new(client: Client, config: &GithubConfig, token: String) -> Self {
        Self {
            client,
            token,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    fn authorization(&self) -> String {
        format!("token {}", self.token)
    }

    async fn fetch(&self, path: &str) -> Result<Option<ContentsResponse>, StoreError> {
        let response = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.branch.as_str())])
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, ACCEPT_GITHUB_V3)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|error| StoreError::Failure(format!("GitHub request failed: {}", error)))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(path, "Document does not exist yet");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.json::<ContentsResponse>().await.map_err(|error| {
            StoreError::Failure(format!("Unexpected GitHub response: {}", error))
        })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl RemoteFileStore for GithubStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, StoreError> {
        let Some(body) = self.fetch(path).await? else {
            return Ok(None);
        };

        let content = decode_content(&body.content).map_err(|message| StoreError::Decode {
            path: path.to_string(),
            message,
        })?;

        Ok(Some(RemoteFile {
            path: path.to_string(),
            content,
            revision: body.sha,
        }))
    }

    async fn revision(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self.fetch(path).await?.map(|body| body.sha))
    }

    async fn write(
        &self,
        path: &str,
        content: &Value,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), StoreError> {
        let encoded = encode_content(content).map_err(|error| StoreError::Decode {
            path: path.to_string(),
            message: error.to_string(),
        })?;

        let payload = PutContentsRequest {
            message,
            content: encoded,
            sha: revision,
            branch: &self.branch,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, ACCEPT_GITHUB_V3)
            .header(header::USER_AGENT, USER_AGENT)
            .json(&payload)
            .send()
            .await
            .map_err(|error| StoreError::Failure(format!("GitHub request failed: {}", error)))?;

        let status = response.status();
        // 409: sha is stale. 422: sha missing for a file that now exists.
        let is_conflict = status == StatusCode::CONFLICT
            || (status == StatusCode::UNPROCESSABLE_ENTITY && revision.is_none());
        if is_conflict {
            tracing::warn!(path, %status, "GitHub rejected write with stale revision");
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        tracing::debug!(path, "Committed document to GitHub");
        Ok(())
    }
}

async fn api_error(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.json::<GithubErrorBody>().await.unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    StoreError::Failure(format!("GitHub API error: {}", message))
}

/// Decode the base64 `content` field of a Contents API response into JSON.
///
/// GitHub wraps the payload at 60 columns, so whitespace is skipped.
fn decode_content(encoded: &str) -> Result<Value, String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Pretty-print a document and base64-encode it for a PUT.
fn encode_content(content: &Value) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(content)?;
    Ok(STANDARD.encode(json))
}
