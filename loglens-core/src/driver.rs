//! Session driver
//!
//! [`Session`] owns the [`SessionState`] and runs the three workflows as
//! tokio tasks. A task only holds owned snapshots of its inputs and reports
//! back with a single [`WorkflowEvent`] over a channel. The owner applies
//! events one at a time, in arrival order, via [`Session::poll`] or
//! [`Session::settle`].
//!
//! There is no cancellation. Dropping the session drops the receiver and
//! any late completions are discarded.
//!
//! Workflow methods spawn onto the current tokio runtime and must be called
//! from within one.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{Config, ExportConfig};
use crate::report;
use crate::service::AnalysisService;
use crate::session::{Notice, SelectedFile, SessionState, WorkflowEvent};
use crate::workflow;

/// A running client session
pub struct Session {
    service: Arc<dyn AnalysisService>,
    wrapper_key: String,
    export: ExportConfig,
    state: SessionState,
    events_tx: mpsc::UnboundedSender<WorkflowEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkflowEvent>,
    next_request_id: u64,
    in_flight: usize,
}

impl Session {
    pub fn new(service: Arc<dyn AnalysisService>, config: &Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            service,
            wrapper_key: config.service.wrapper_key.clone(),
            export: config.export.clone(),
            state: SessionState::new(),
            events_tx,
            events_rx,
            next_request_id: 1,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of workflows whose completion has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let file = SelectedFile::new(path);
        tracing::debug!(file = %file.path.display(), "File selected");
        self.state.select_file(file);
    }

    pub fn set_pending_question(&mut self, text: impl Into<String>) {
        self.state.set_pending_question(text);
    }

    /// Start an upload of the selected file.
    ///
    /// With no file selected this returns a notice right away and makes no
    /// network call.
    pub fn upload(&mut self) -> Option<Notice> {
        let Some(file) = self.state.selected_file().cloned() else {
            tracing::warn!("Upload requested with no file selected");
            return Some(Notice::error("Upload a log file first."));
        };

        let service = Arc::clone(&self.service);
        let wrapper_key = self.wrapper_key.clone();
        self.spawn(async move {
            let result = workflow::upload(service.as_ref(), Some(&file), &wrapper_key).await;
            WorkflowEvent::UploadFinished {
                file_name: file.name,
                result,
            }
        });
        None
    }

    /// Submit the pending question.
    ///
    /// Returns `false` when the pending text is blank, in which case nothing
    /// happens. Does not check the awaiting flag: callers that want one
    /// question at a time must gate on [`SessionState::is_awaiting_answer`].
    pub fn submit_question(&mut self) -> bool {
        let Some(question) = self.state.begin_question() else {
            return false;
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        tracing::info!(request_id, "Submitting question");

        let service = Arc::clone(&self.service);
        self.spawn(async move {
            let result = workflow::ask(service.as_ref(), &question).await;
            WorkflowEvent::AnswerReceived { request_id, result }
        });
        true
    }

    /// Export the current insights and conversation as a report.
    pub fn export(&mut self) {
        let request = report::build_request(
            self.state.selected_file(),
            self.state.insights(),
            self.state.conversation(),
            &self.export,
        );
        let file_name = report::report_file_name(&request.filename, &self.export.extension);
        let dir = self.export.download_dir();

        let service = Arc::clone(&self.service);
        self.spawn(async move {
            let result = match report::export_report(service.as_ref(), &request).await {
                Ok(bytes) => report::save_download(&dir, &file_name, &bytes).await,
                Err(e) => Err(e),
            };
            WorkflowEvent::ExportFinished { result }
        });
    }

    /// Apply every completion that has arrived so far, without waiting.
    pub fn poll(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            notices.extend(self.apply(event));
        }
        notices
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<Option<Notice>> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Wait until every in-flight workflow has completed.
    pub async fn settle(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Some(notice) = self.next_event().await {
            notices.extend(notice);
        }
        notices
    }

    fn apply(&mut self, event: WorkflowEvent) -> Option<Notice> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.apply(event)
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = WorkflowEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            if tx.send(event).is_err() {
                tracing::debug!("Session dropped; discarding workflow completion");
            }
        });
    }
}
