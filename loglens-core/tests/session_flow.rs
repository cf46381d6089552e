//! Integration tests for the session driver
//!
//! These drive full upload / question / export workflows against a scripted
//! in-memory `AnalysisService` and check the resulting session state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use loglens_core::{
    classify, AnalysisService, ChatPhase, Config, Error, ExportRequest, InsightModel, LogUpload,
    NoticeLevel, Result, Sender, Session, ThreatCategory,
};
use serde_json::{json, Value};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload(String),
    Query(String),
    Export(String),
}

/// Scripted analysis service that records every call
#[derive(Default)]
struct FakeService {
    calls: Mutex<Vec<Call>>,
    upload_response: Mutex<Option<Value>>,
    fail_queries: bool,
    fail_export: bool,
    /// Questions containing this marker are answered after a delay
    slow_marker: Option<&'static str>,
}

impl FakeService {
    fn with_upload(response: Value) -> Self {
        Self {
            upload_response: Mutex::new(Some(response)),
            ..Default::default()
        }
    }

    fn set_upload(&self, response: Option<Value>) {
        *self.upload_response.lock().unwrap() = response;
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn transport(what: &str) -> Error {
    Error::Transport(format!("API error (500 Internal Server Error): {} failed", what))
}

#[async_trait]
impl AnalysisService for FakeService {
    async fn upload(&self, upload: LogUpload) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Upload(upload.file_name.clone()));
        let response = self.upload_response.lock().unwrap().clone();
        response.ok_or_else(|| transport("upload"))
    }

    async fn query(&self, question: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Query(question.to_string()));
        if let Some(marker) = self.slow_marker {
            if question.contains(marker) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }
        if self.fail_queries {
            return Err(transport("query"));
        }
        Ok(json!({
            "summary": format!("answer to {}", question),
            "findings": ["f1"],
            "recommendations": "r1"
        }))
    }

    async fn export_report(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Export(request.filename.clone()));
        if self.fail_export {
            return Err(transport("export"));
        }
        Ok(serde_json::to_vec(request)?)
    }
}

struct Harness {
    _dir: TempDir,
    download_dir: PathBuf,
    log_path: PathBuf,
    service: Arc<FakeService>,
    session: Session,
}

impl Harness {
    fn new(service: FakeService) -> Self {
        loglens_core::logging::init_test();

        let dir = TempDir::new().expect("failed to create temp dir");
        let download_dir = dir.path().join("downloads");
        let log_path = dir.path().join("server.log");
        std::fs::write(&log_path, "2024-01-01 ERROR disk full\n").expect("failed to write log");

        let mut config = Config::default();
        config.export.download_dir = Some(download_dir.clone());

        let service = Arc::new(service);
        let session = Session::new(service.clone(), &config);

        Self {
            _dir: dir,
            download_dir,
            log_path,
            service,
            session,
        }
    }

    fn ask(&mut self, question: &str) -> bool {
        self.session.set_pending_question(question);
        self.session.submit_question()
    }
}

fn report_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<_> = entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}

// ============================================
// Upload
// ============================================

#[tokio::test]
async fn upload_normalizes_flat_response() {
    let mut h = Harness::new(FakeService::with_upload(json!({
        "summary": "ok",
        "threat_level": "High",
        "findings": "one issue"
    })));

    h.session.select_file(&h.log_path);
    assert!(h.session.upload().is_none());
    let notices = h.session.settle().await;

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);

    let model = h.session.state().insights().expect("model installed");
    assert_eq!(
        model,
        &InsightModel {
            summary: Some("ok".to_string()),
            threat_level: Some("High".to_string()),
            findings: vec!["one issue".to_string()],
            anomalies: vec![],
            suspicious_activities: vec![],
            insights: vec![],
            recommendations: vec![],
            analysis_error: None,
        }
    );
    assert_eq!(
        classify(model.threat_level.as_deref()),
        ThreatCategory::Critical
    );
    assert_eq!(h.service.calls(), vec![Call::Upload("server.log".to_string())]);
}

#[tokio::test]
async fn upload_uses_wrapped_result() {
    let mut h = Harness::new(FakeService::with_upload(json!({
        "parsed_logs": [{"level": "ERROR"}],
        "ingested_chunks": 3,
        "gemini_insights": {
            "summary": "Parsed 1 lines; 1 errors, 0 warnings.",
            "threat_level": "Medium",
            "anomalies": ["Counts only; no LLM analysis."]
        }
    })));

    h.session.select_file(&h.log_path);
    h.session.upload();
    h.session.settle().await;

    let model = h.session.state().insights().unwrap();
    assert_eq!(model.threat_level.as_deref(), Some("Medium"));
    assert_eq!(model.anomalies, vec!["Counts only; no LLM analysis."]);
    assert!(model.findings.is_empty());
}

#[tokio::test]
async fn upload_without_file_makes_no_call() {
    let mut h = Harness::new(FakeService::with_upload(json!({"summary": "x"})));

    let notice = h.session.upload().expect("immediate notice");

    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(h.session.in_flight(), 0);
    assert!(h.session.settle().await.is_empty());
    assert!(h.session.state().insights().is_none());
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn failed_upload_keeps_prior_model() {
    let mut h = Harness::new(FakeService::with_upload(json!({"summary": "prior"})));
    h.session.select_file(&h.log_path);
    h.session.upload();
    h.session.settle().await;

    h.service.set_upload(None);
    h.session.upload();
    let notices = h.session.settle().await;

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.starts_with("Upload failed"));
    assert_eq!(
        h.session.state().insights(),
        Some(&InsightModel {
            summary: Some("prior".to_string()),
            ..Default::default()
        })
    );
}

#[tokio::test]
async fn unreadable_file_fails_before_network() {
    let mut h = Harness::new(FakeService::with_upload(json!({"summary": "x"})));

    h.session.select_file(h.log_path.with_file_name("missing.log"));
    h.session.upload();
    let notices = h.session.settle().await;

    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(h.session.state().insights().is_none());
    assert!(h.service.calls().is_empty());
}

// ============================================
// Chat
// ============================================

#[tokio::test]
async fn blank_questions_are_ignored() {
    let mut h = Harness::new(FakeService::default());

    assert!(!h.ask(""));
    assert!(!h.ask("   "));

    assert!(h.session.state().conversation().is_empty());
    assert_eq!(h.session.state().phase(), ChatPhase::Idle);
    assert_eq!(h.session.in_flight(), 0);
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn question_then_answer() {
    let mut h = Harness::new(FakeService::default());

    assert!(h.ask("What happened?"));

    // The user message is visible before the answer resolves.
    let state = h.session.state();
    assert_eq!(state.conversation().len(), 1);
    assert_eq!(state.conversation().last().unwrap().text, "What happened?");
    assert_eq!(state.phase(), ChatPhase::AwaitingAnswer);

    let notices = h.session.settle().await;
    assert!(notices.is_empty());

    let state = h.session.state();
    let messages = state.conversation().as_slice();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert_eq!(messages[1].text, "answer to What happened?");
    assert_eq!(messages[1].detail_findings(), vec!["f1"]);
    assert_eq!(messages[1].detail_recommendations(), vec!["r1"]);
    assert_eq!(state.phase(), ChatPhase::Idle);
    assert_eq!(state.pending_question(), "");
}

#[tokio::test]
async fn failed_query_keeps_only_the_question() {
    let mut h = Harness::new(FakeService {
        fail_queries: true,
        ..Default::default()
    });

    h.ask("What happened?");
    let notices = h.session.settle().await;

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    let state = h.session.state();
    assert_eq!(state.conversation().len(), 1);
    assert!(state.conversation().last().unwrap().is_user());
    assert_eq!(state.phase(), ChatPhase::Idle);
    assert_eq!(state.pending_question(), "");
}

#[tokio::test]
async fn overlapping_answers_append_in_arrival_order() {
    let mut h = Harness::new(FakeService {
        slow_marker: Some("slow"),
        ..Default::default()
    });

    assert!(h.ask("slow question"));
    assert!(h.ask("fast question"));
    assert_eq!(h.session.in_flight(), 2);

    h.session.settle().await;

    let texts: Vec<_> = h
        .session
        .state()
        .conversation()
        .iter()
        .map(|m| m.text.clone())
        .collect();
    assert_eq!(
        texts,
        vec![
            "slow question",
            "fast question",
            "answer to fast question",
            "answer to slow question",
        ]
    );
}

// ============================================
// Export
// ============================================

#[tokio::test]
async fn export_names_report_after_selected_file() {
    let mut h = Harness::new(FakeService::with_upload(json!({"summary": "ok"})));
    h.session.select_file(&h.log_path);
    h.session.upload();
    h.ask("What happened?");
    h.session.settle().await;

    h.session.export();
    let notices = h.session.settle().await;

    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(report_files(&h.download_dir), vec!["server_report.pdf"]);

    let body: Value =
        serde_json::from_slice(&std::fs::read(h.download_dir.join("server_report.pdf")).unwrap())
            .unwrap();
    assert_eq!(body["filename"], "server");
    assert_eq!(body["logs"]["summary"], "ok");
    assert_eq!(body["chat"].as_array().unwrap().len(), 2);
    assert_eq!(body["chat"][1]["full"]["findings"], json!(["f1"]));

    // Export reads state without mutating it.
    assert_eq!(h.session.state().conversation().len(), 2);
}

#[tokio::test]
async fn export_without_file_uses_fallback_name() {
    let mut h = Harness::new(FakeService::default());

    h.session.export();
    h.session.settle().await;

    assert_eq!(report_files(&h.download_dir), vec!["logfile_report.pdf"]);
    assert_eq!(h.service.calls(), vec![Call::Export("logfile".to_string())]);
}

#[tokio::test]
async fn failed_export_writes_nothing() {
    let mut h = Harness::new(FakeService {
        fail_export: true,
        ..Default::default()
    });

    h.session.export();
    let notices = h.session.settle().await;

    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.starts_with("Failed to export report"));
    assert!(report_files(&h.download_dir).is_empty());
}
