//! Session state and the transitions that mutate it
//!
//! All client state lives in one [`SessionState`]. It only changes through
//! the methods below, each of which is a single logical update: select a
//! file, edit the pending question, start a question, or apply a workflow
//! completion.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use crate::chat::{ChatMessage, Conversation};
use crate::error::{Error, Result};
use crate::insight::InsightModel;

/// A log file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// File name component, used for display and report naming
    pub name: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Chat workflow phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatPhase {
    #[default]
    Idle,
    AwaitingAnswer,
}

/// Severity of a one-shot notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-shot notification raised by a workflow outcome.
///
/// Handed to the front-end and never stored in [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    /// Whether the notice has been on screen longer than `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.raised_at > ttl
    }
}

/// Completion of an asynchronous workflow
#[derive(Debug)]
pub enum WorkflowEvent {
    UploadFinished {
        file_name: String,
        result: Result<InsightModel>,
    },
    AnswerReceived {
        request_id: u64,
        result: Result<ChatMessage>,
    },
    ExportFinished {
        result: Result<PathBuf>,
    },
}

/// Complete in-memory client state for one session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected_file: Option<SelectedFile>,
    insights: Option<InsightModel>,
    conversation: Conversation,
    pending_question: String,
    phase: ChatPhase,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn insights(&self) -> Option<&InsightModel> {
        self.insights.as_ref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn pending_question(&self) -> &str {
        &self.pending_question
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.phase == ChatPhase::AwaitingAnswer
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
    }

    pub fn set_pending_question(&mut self, text: impl Into<String>) {
        self.pending_question = text.into();
    }

    /// Start a question from the pending text.
    ///
    /// Empty or whitespace-only text is a no-op and returns `None`. Otherwise
    /// the user message is appended right away, the phase becomes
    /// `AwaitingAnswer`, and the question text to send is returned.
    pub fn begin_question(&mut self) -> Option<String> {
        if self.pending_question.trim().is_empty() {
            return None;
        }

        let question = self.pending_question.clone();
        self.conversation.push(ChatMessage::user(question.clone()));
        self.phase = ChatPhase::AwaitingAnswer;
        Some(question)
    }

    /// Apply a workflow completion and return the notice it raises.
    pub fn apply(&mut self, event: WorkflowEvent) -> Option<Notice> {
        match event {
            WorkflowEvent::UploadFinished { file_name, result } => {
                self.finish_upload(&file_name, result)
            }
            WorkflowEvent::AnswerReceived { request_id, result } => {
                self.finish_answer(request_id, result)
            }
            WorkflowEvent::ExportFinished { result } => finish_export(result),
        }
    }

    fn finish_upload(&mut self, file_name: &str, result: Result<InsightModel>) -> Option<Notice> {
        match result {
            Ok(model) => {
                tracing::info!(
                    file = %file_name,
                    threat_level = ?model.threat_level,
                    findings = model.findings.len(),
                    "Installed new insight model"
                );
                let notice = match &model.analysis_error {
                    Some(reason) => Notice::error(format!("Analysis failed: {}", reason)),
                    None => Notice::info(format!("Analyzed {}", file_name)),
                };
                self.insights = Some(model);
                Some(notice)
            }
            Err(Error::NoFileSelected) => Some(Notice::error("Upload a log file first.")),
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "Upload failed");
                Some(Notice::error(format!("Upload failed: {}", e)))
            }
        }
    }

    fn finish_answer(&mut self, request_id: u64, result: Result<ChatMessage>) -> Option<Notice> {
        self.phase = ChatPhase::Idle;
        self.pending_question.clear();

        match result {
            Ok(message) => {
                tracing::debug!(request_id, "Appending answer");
                self.conversation.push(message);
                None
            }
            Err(e) => {
                tracing::error!(request_id, error = %e, "Query failed");
                Some(Notice::error(format!("Query failed: {}", e)))
            }
        }
    }
}

fn finish_export(result: Result<PathBuf>) -> Option<Notice> {
    match result {
        Ok(path) => Some(Notice::info(format!("Report saved to {}", path.display()))),
        Err(e) => {
            tracing::error!(error = %e, "Report export failed");
            Some(Notice::error(format!("Failed to export report: {}", e)))
        }
    }
}
