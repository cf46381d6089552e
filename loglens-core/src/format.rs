//! Formatting helpers shared across UIs.

use chrono::{DateTime, Utc};

use crate::chat::{ChatMessage, Sender};
use crate::insight::InsightModel;
use crate::threat::{ThreatCategory, ThreatLevel};

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(ts);

    if duration.num_seconds() < 1 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else {
        format!("{}h ago", duration.num_hours())
    }
}

/// Short lowercase label for a threat badge
pub fn category_label(category: ThreatCategory) -> &'static str {
    match category {
        ThreatCategory::Critical => "critical",
        ThreatCategory::Warning => "warning",
        ThreatCategory::Normal => "normal",
        ThreatCategory::Unknown => "unknown",
    }
}

/// Plain-text rendering of the summary panel.
///
/// Only non-empty sections are listed. Used by the headless CLI.
pub fn insight_lines(model: &InsightModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &model.analysis_error {
        lines.push(format!("Analysis error: {}", error));
    }
    if let Some(summary) = &model.summary {
        lines.push("System Diagnostics".to_string());
        if let Some(level) = &model.threat_level {
            let level = ThreatLevel::parse(level);
            lines.push(format!(
                "Threat: {} ({})",
                level,
                category_label(level.category())
            ));
        }
        lines.push(summary.clone());
    }

    for section in model.non_empty_sections() {
        lines.push(String::new());
        lines.push(format!("{}:", section.title));
        lines.extend(section.items.iter().map(|item| format!("  - {}", item)));
    }

    lines
}

/// Plain-text rendering of one chat message, with answer details.
pub fn message_lines(message: &ChatMessage) -> Vec<String> {
    let prefix = match message.sender {
        Sender::User => "Q",
        Sender::Assistant => "A",
    };
    let mut lines = vec![format!("{}: {}", prefix, message.text)];

    if message.sender == Sender::Assistant {
        for (title, items) in [
            ("Findings", message.detail_findings()),
            ("Recommendations", message.detail_recommendations()),
        ] {
            if items.is_empty() {
                continue;
            }
            lines.push(format!("   {}:", title));
            lines.extend(items.iter().map(|item| format!("     - {}", item)));
        }
    }

    lines
}
