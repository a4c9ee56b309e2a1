use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::engine::types::{DeletedDoc, EngineInfo, IndexedDoc, SearchResponse};
use crate::model::Sport;

/// Failures talking to the engine.
///
/// Non-2xx responses keep the body the engine sent, so the user sees the
/// actual reason instead of a swallowed rejection.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Thin client for the engine's REST API.
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: Client,
    host: String,
    index: String,
}

impl EngineClient {
    pub fn new(host: &str, index: &str, timeout: Duration) -> Result<Self, EngineError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(
            &config.host,
            &config.index,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// `POST {host}/{index}/_search` with a full request body.
    pub async fn search(&self, body: &Value) -> Result<SearchResponse, EngineError> {
        let url = format!("{}/{}/_search", self.host, self.index);
        tracing::debug!(%url, "search request");
        let response = self.http.post(&url).json(body).send().await?;
        Ok(checked(response).await?.json().await?)
    }

    /// `POST {host}/{index}/_doc`; the engine assigns the identifier.
    pub async fn create_document(&self, doc: &Sport) -> Result<IndexedDoc, EngineError> {
        let url = format!("{}/{}/_doc", self.host, self.index);
        tracing::debug!(%url, title = %doc.title, "create document");
        let response = self.http.post(&url).json(doc).send().await?;
        Ok(checked(response).await?.json().await?)
    }

    /// `DELETE {host}/{index}/_doc/{id}`.
    pub async fn delete_document(&self, id: &str) -> Result<DeletedDoc, EngineError> {
        let url = format!("{}/{}/_doc/{}", self.host, self.index, id);
        tracing::debug!(%url, "delete document");
        let response = self.http.delete(&url).send().await?;
        Ok(checked(response).await?.json().await?)
    }

    /// `GET {host}` for reachability and version.
    pub async fn ping(&self) -> Result<EngineInfo, EngineError> {
        let response = self.http.get(&self.host).send().await?;
        Ok(checked(response).await?.json().await?)
    }
}

async fn checked(response: Response) -> Result<Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "engine error response");
    Err(EngineError::Status { status, body })
}
