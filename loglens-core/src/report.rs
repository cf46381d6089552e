//! Report export: request assembly, naming and the local download

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::chat::Conversation;
use crate::config::ExportConfig;
use crate::error::Result;
use crate::insight::InsightModel;
use crate::service::{AnalysisService, ExportRequest};
use crate::session::SelectedFile;

/// Base name for the report: the file name up to its first `.`.
///
/// Falls back to `fallback` with no file selected or an empty stem
/// (e.g. `.bashrc`).
pub fn base_name(file: Option<&SelectedFile>, fallback: &str) -> String {
    file.map(|f| f.name.split('.').next().unwrap_or_default())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// `<base>_report.<extension>`
pub fn report_file_name(base: &str, extension: &str) -> String {
    format!("{}_report.{}", base, extension)
}

/// Snapshot the current state into an export request.
pub fn build_request(
    file: Option<&SelectedFile>,
    insights: Option<&InsightModel>,
    conversation: &Conversation,
    config: &ExportConfig,
) -> ExportRequest {
    ExportRequest {
        filename: base_name(file, &config.fallback_name),
        logs: insights.cloned(),
        chat: conversation.as_slice().to_vec(),
    }
}

/// Ask the service to render the report. Returns the document bytes.
pub async fn export_report(
    service: &dyn AnalysisService,
    request: &ExportRequest,
) -> Result<Vec<u8>> {
    tracing::info!(
        filename = %request.filename,
        has_insights = request.logs.is_some(),
        messages = request.chat.len(),
        "Exporting report"
    );
    let bytes = service.export_report(request).await?;
    tracing::debug!(bytes = bytes.len(), "Report rendered");
    Ok(bytes)
}

/// Write a downloaded document into `dir` as `file_name`.
///
/// Each call writes to its own hidden temp file in `dir` and renames it into
/// place, so a failed write never leaves a partial report behind and
/// concurrent saves of the same name do not share a temp file. The last
/// rename wins.
pub async fn save_download(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let dir = dir.to_path_buf();
    let target = dir.join(file_name);
    let bytes = bytes.to_vec();

    let written = bytes.len();
    let path = target.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&dir)?;
        // Removed on drop if anything below fails
        let mut partial = tempfile::Builder::new()
            .prefix(".")
            .suffix(".part")
            .tempfile_in(&dir)?;
        partial.write_all(&bytes)?;
        partial.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::from)??;

    tracing::info!(path = %target.display(), bytes = written, "Report saved");
    Ok(target)
}
