//! Threat level classification

use std::fmt;

/// Coarse severity label attached to an insight model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreatLevel {
    High,
    Medium,
    Low,
    /// Any label the service sends that is not one of the above
    Unrecognized(String),
}

impl ThreatLevel {
    /// Parse a label exactly as the service spells it.
    pub fn parse(label: &str) -> Self {
        match label {
            "High" => ThreatLevel::High,
            "Medium" => ThreatLevel::Medium,
            "Low" => ThreatLevel::Low,
            other => ThreatLevel::Unrecognized(other.to_string()),
        }
    }

    /// Visual category for this level.
    pub fn category(&self) -> ThreatCategory {
        match self {
            ThreatLevel::High => ThreatCategory::Critical,
            ThreatLevel::Medium => ThreatCategory::Warning,
            ThreatLevel::Low => ThreatCategory::Normal,
            ThreatLevel::Unrecognized(_) => ThreatCategory::Unknown,
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreatLevel::High => write!(f, "High"),
            ThreatLevel::Medium => write!(f, "Medium"),
            ThreatLevel::Low => write!(f, "Low"),
            ThreatLevel::Unrecognized(label) => write!(f, "{}", label),
        }
    }
}

/// Fixed visual category for a threat badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreatCategory {
    Critical,
    Warning,
    Normal,
    #[default]
    Unknown,
}

/// Map an optional label to its category. Total: never fails.
pub fn classify(level: Option<&str>) -> ThreatCategory {
    level
        .map(|label| ThreatLevel::parse(label).category())
        .unwrap_or_default()
}
