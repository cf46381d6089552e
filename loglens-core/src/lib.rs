//! # loglens-core
//!
//! Client-side session model for loglens, a log analysis client.
//!
//! This library provides:
//! - Normalization of loosely-typed analysis results into [`InsightModel`]
//! - Threat level classification
//! - The conversation model and the append-only chat log
//! - The [`AnalysisService`] boundary and its HTTP implementation
//! - A [`Session`] driver running upload, query and export workflows
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use loglens_core::{Config, HttpAnalysisService, Session};
//!
//! # async fn run() -> loglens_core::Result<()> {
//! let config = Config::load()?;
//! let service = Arc::new(HttpAnalysisService::new(&config.service)?);
//! let mut session = Session::new(service, &config);
//!
//! session.select_file("/var/log/server.log");
//! session.upload();
//! for notice in session.settle().await {
//!     println!("{}", notice.message);
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use chat::{ChatMessage, Conversation, Sender};
pub use config::Config;
pub use driver::Session;
pub use error::{Error, Result};
pub use insight::{extract_insight_payload, normalize_list_field, InsightModel, SectionKind};
pub use service::{AnalysisService, ExportRequest, HttpAnalysisService, LogUpload};
pub use session::{ChatPhase, Notice, NoticeLevel, SelectedFile, SessionState, WorkflowEvent};
pub use threat::{classify, ThreatCategory, ThreatLevel};

// Public modules
pub mod chat;
pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod insight;
pub mod logging;
pub mod report;
pub mod service;
pub mod session;
pub mod threat;
pub mod workflow;
