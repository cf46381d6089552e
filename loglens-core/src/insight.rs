//! Normalization of analysis payloads into a stable display model
//!
//! The analysis service is loosely typed: list fields may arrive as a single
//! value or as an array, and the whole result may or may not be wrapped under
//! a named key. Everything downstream works on [`InsightModel`] instead.

use serde::Serialize;
use serde_json::{Map, Value};

/// Normalized, display-ready analysis result for one uploaded file.
///
/// Every list field is always a sequence, whatever the upstream payload
/// contained. Serializes with the service's own field names so it can be
/// sent back verbatim in an export request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsightModel {
    pub summary: Option<String>,
    pub threat_level: Option<String>,
    pub findings: Vec<String>,
    pub anomalies: Vec<String>,
    #[serde(rename = "suspicious")]
    pub suspicious_activities: Vec<String>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Failure reported by the service inside an otherwise successful response
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

/// A titled group of items for display, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightSection<'a> {
    pub title: &'static str,
    pub kind: SectionKind,
    pub items: &'a [String],
}

/// Which list of the model a section shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Findings,
    Anomalies,
    SuspiciousActivities,
    Insights,
    Recommendations,
}

impl InsightModel {
    /// All five list sections in display order, including empty ones.
    pub fn sections(&self) -> [InsightSection<'_>; 5] {
        [
            InsightSection {
                title: "Findings",
                kind: SectionKind::Findings,
                items: &self.findings,
            },
            InsightSection {
                title: "Anomalies",
                kind: SectionKind::Anomalies,
                items: &self.anomalies,
            },
            InsightSection {
                title: "Suspicious Activities",
                kind: SectionKind::SuspiciousActivities,
                items: &self.suspicious_activities,
            },
            InsightSection {
                title: "Insights",
                kind: SectionKind::Insights,
                items: &self.insights,
            },
            InsightSection {
                title: "Recommendations",
                kind: SectionKind::Recommendations,
                items: &self.recommendations,
            },
        ]
    }

    /// Sections that have at least one item.
    pub fn non_empty_sections(&self) -> impl Iterator<Item = InsightSection<'_>> {
        self.sections()
            .into_iter()
            .filter(|section| !section.items.is_empty())
    }
}

/// Shape of a raw upload response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// The result sits under the wrapper key. Used even when empty.
    Wrapped(&'a Value),
    /// The response is the result itself.
    Flat(&'a Value),
}

impl<'a> PayloadShape<'a> {
    /// Detect the shape by presence of `wrapper_key`, not by its truthiness.
    ///
    /// A wrapper key holding `null` counts as absent.
    pub fn detect(raw: &'a Value, wrapper_key: &str) -> Self {
        match raw.as_object().and_then(|obj| obj.get(wrapper_key)) {
            None | Some(Value::Null) => PayloadShape::Flat(raw),
            Some(inner) => PayloadShape::Wrapped(inner),
        }
    }

    fn result(self) -> &'a Value {
        match self {
            PayloadShape::Wrapped(inner) => inner,
            PayloadShape::Flat(raw) => raw,
        }
    }
}

/// Normalize one list-typed field.
///
/// - absent or `null` → empty
/// - array → items in order
/// - anything else → one-element sequence
///
/// String items are kept verbatim; other items are rendered as JSON text.
/// No validation or deduplication happens here.
pub fn normalize_list_field(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(item_text).collect(),
        Some(other) => vec![item_text(other)],
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_field(obj: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match obj?.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Build an [`InsightModel`] from a raw upload response.
pub fn extract_insight_payload(raw: &Value, wrapper_key: &str) -> InsightModel {
    let shape = PayloadShape::detect(raw, wrapper_key);
    if let PayloadShape::Wrapped(_) = shape {
        tracing::debug!(wrapper_key, "Upload response is wrapped");
    }

    let result = shape.result();
    let obj = result.as_object();
    let field = |key: &str| obj.and_then(|o| o.get(key));

    InsightModel {
        summary: text_field(obj, "summary"),
        threat_level: text_field(obj, "threat_level"),
        findings: normalize_list_field(field("findings")),
        anomalies: normalize_list_field(field("anomalies")),
        suspicious_activities: normalize_list_field(field("suspicious")),
        insights: normalize_list_field(field("insights")),
        recommendations: normalize_list_field(field("recommendations")),
        analysis_error: text_field(obj, "error"),
    }
}
