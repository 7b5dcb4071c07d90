//! Threat-intelligence data model and feed loading.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub mod analytics;

/// Threat severity, ordered least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Info,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Dashboard chart palette.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "#94a3b8",
            Severity::Low => "#3b82f6",
            Severity::Medium => "#eab308",
            Severity::High => "#f97316",
            Severity::Critical => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatType {
    Malware,
    Phishing,
    Vulnerability,
    Ransomware,
    Apt,
    Other,
}

impl ThreatType {
    pub fn label(&self) -> &'static str {
        match self {
            ThreatType::Malware => "Malware",
            ThreatType::Phishing => "Phishing",
            ThreatType::Vulnerability => "Vulnerability",
            ThreatType::Ransomware => "Ransomware",
            ThreatType::Apt => "APT",
            ThreatType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatStatus {
    New,
    InProgress,
    Resolved,
    Dismissed,
}

/// Geo attribution as sources report it: coordinates arrive as strings and
/// may be absent or unparsable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoIp {
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatMetadata {
    #[serde(default)]
    pub geo_ip: Option<GeoIp>,
    /// Loose source-specific fields carried through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A single threat record as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub threat_type: Option<ThreatType>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<ThreatStatus>,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub iocs: Vec<String>,
    #[serde(default)]
    pub ttps: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<ThreatMetadata>,
}

/// Load a JSON threat feed (an array of threat records).
pub fn load_feed(path: &Path) -> Result<Vec<Threat>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read threat feed from {}", path.display()))?;
    let threats: Vec<Threat> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse threat feed from {}", path.display()))?;
    Ok(threats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_threat_deserializes_with_sparse_fields() {
        let threat: Threat = serde_json::from_str(
            r#"{"id": "t-1", "title": "Credential phishing wave", "severity": "high"}"#,
        )
        .unwrap();
        assert_eq!(threat.severity, Severity::High);
        assert!(threat.threat_type.is_none());
        assert!(threat.iocs.is_empty());
    }

    #[test]
    fn test_metadata_keeps_unknown_fields() {
        let threat: Threat = serde_json::from_str(
            r#"{
                "id": "t-2",
                "title": "Botnet C2",
                "severity": "critical",
                "status": "in_progress",
                "metadata": {
                    "geo_ip": {"latitude": "52.52", "longitude": "13.40", "country_name": "Germany"},
                    "asn": 64496
                }
            }"#,
        )
        .unwrap();
        let metadata = threat.metadata.unwrap();
        assert_eq!(
            metadata.geo_ip.unwrap().country_name.as_deref(),
            Some("Germany")
        );
        assert_eq!(metadata.extra["asn"], serde_json::json!(64496));
        assert_eq!(threat.status, Some(ThreatStatus::InProgress));
    }

    #[test]
    fn test_load_feed_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "t-1", "title": "Ransomware note", "severity": "medium", "threat_type": "ransomware"}}]"#
        )
        .unwrap();
        let threats = load_feed(file.path()).unwrap();
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].threat_type, Some(ThreatType::Ransomware));
    }

    #[test]
    fn test_load_feed_missing_file_has_context() {
        let err = load_feed(Path::new("/nonexistent/feed.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read threat feed"));
    }
}
