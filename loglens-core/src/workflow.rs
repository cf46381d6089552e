//! The upload and query workflows as plain async operations
//!
//! These run against any [`AnalysisService`] and return their outcome; they
//! never touch session state. [`crate::driver::Session`] decides what the
//! outcome does to the state.

use crate::chat::ChatMessage;
use crate::error::{Error, Result};
use crate::insight::{extract_insight_payload, InsightModel};
use crate::service::{AnalysisService, LogUpload};
use crate::session::SelectedFile;

/// Send a log file for analysis and normalize the result.
///
/// Fails with [`Error::NoFileSelected`] before any IO when `file` is `None`.
pub async fn upload(
    service: &dyn AnalysisService,
    file: Option<&SelectedFile>,
    wrapper_key: &str,
) -> Result<InsightModel> {
    let file = file.ok_or(Error::NoFileSelected)?;

    let bytes = tokio::fs::read(&file.path).await?;
    tracing::info!(
        file = %file.path.display(),
        bytes = bytes.len(),
        "Uploading log file"
    );

    let raw = service
        .upload(LogUpload {
            file_name: file.name.clone(),
            bytes,
        })
        .await?;

    if let Some(chunks) = raw.get("ingested_chunks").and_then(|v| v.as_u64()) {
        tracing::debug!(ingested_chunks = chunks, "Service indexed uploaded logs");
    }

    Ok(extract_insight_payload(&raw, wrapper_key))
}

/// Ask a question and turn the response into an assistant message.
pub async fn ask(service: &dyn AnalysisService, question: &str) -> Result<ChatMessage> {
    let response = service.query(question).await?;
    Ok(ChatMessage::from_answer(response))
}
