//! Analysis service boundary
//!
//! The remote service exposes three operations:
//!
//! | Operation | Request | Response |
//! |---|---|---|
//! | `POST /upload` | multipart, part `file` | JSON, wrapped or flat |
//! | `POST /query` | JSON `{question}` | JSON with `summary` plus opaque fields |
//! | `POST /export_report` | JSON `{filename, logs, chat}` | binary document |
//!
//! Workflows only talk to the [`AnalysisService`] trait so they can be driven
//! against a fake in tests.

mod client;

pub use client::HttpAnalysisService;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::chat::ChatMessage;
use crate::error::Result;
use crate::insight::InsightModel;

/// Contents of a log file ready to be submitted
#[derive(Debug, Clone)]
pub struct LogUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body of an export request. Owned so it can be handed to a spawned task.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRequest {
    pub filename: String,
    pub logs: Option<InsightModel>,
    pub chat: Vec<ChatMessage>,
}

/// The remote analysis service
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit a log file and return the raw analysis response.
    async fn upload(&self, upload: LogUpload) -> Result<Value>;

    /// Ask a natural-language question about the uploaded logs.
    async fn query(&self, question: &str) -> Result<Value>;

    /// Render a report and return the document bytes.
    async fn export_report(&self, request: &ExportRequest) -> Result<Vec<u8>>;
}
