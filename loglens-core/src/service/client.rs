//! HTTP client for the analysis service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::error::{Error, Result};

use super::{AnalysisService, ExportRequest, LogUpload};

/// reqwest-backed [`AnalysisService`]
pub struct HttpAnalysisService {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisService {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn upload(&self, upload: LogUpload) -> Result<Value> {
        let url = self.url("upload");
        let size = upload.bytes.len();

        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part);

        tracing::debug!(url = %url, bytes = size, "POST upload");
        let response = self.http_client.post(&url).multipart(form).send().await?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("failed to parse response: {}", e)))
    }

    async fn query(&self, question: &str) -> Result<Value> {
        let url = self.url("query");

        tracing::debug!(url = %url, "POST query");
        let response = self
            .http_client
            .post(&url)
            .json(&QueryRequest { question })
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("failed to parse response: {}", e)))
    }

    async fn export_report(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let url = self.url("export_report");

        tracing::debug!(url = %url, filename = %request.filename, "POST export_report");
        let response = self.http_client.post(&url).json(request).send().await?;
        let response = ensure_success(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read document: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Request body for POST /query
#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

/// Turn a non-2xx response into a transport error carrying the body text
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    Err(Error::Transport(format!(
        "API error ({}): {}",
        status, error_text
    )))
}
