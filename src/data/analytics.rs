//! Chart-ready aggregation over threat records.
//!
//! Everything here is pure shaping: filter, count, bucket. Rendering and
//! data fetching live elsewhere.

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{Severity, Threat, ThreatStatus, ThreatType};

/// Filters applied before aggregation. `None` means "all".
#[derive(Debug, Clone)]
pub struct AnalyticsFilters {
    pub severity: Option<Severity>,
    pub threat_type: Option<ThreatType>,
    pub source: Option<String>,
    pub status: Option<ThreatStatus>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl AnalyticsFilters {
    /// Unfiltered view over the trailing `days`.
    pub fn last_days(days: i64) -> Self {
        let to = Utc::now();
        Self {
            severity: None,
            threat_type: None,
            source: None,
            status: None,
            from: to - Duration::days(days),
            to,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.from > self.to {
            bail!("Invalid date range: Start date must be before end date");
        }
        Ok(())
    }

    /// Apply the filters. Threats without a timestamp stay visible.
    pub fn apply<'a>(&self, threats: &'a [Threat]) -> Vec<&'a Threat> {
        threats.iter().filter(|t| self.matches(t)).collect()
    }

    fn matches(&self, threat: &Threat) -> bool {
        if let Some(severity) = self.severity {
            if threat.severity != severity {
                return false;
            }
        }
        if let Some(threat_type) = self.threat_type {
            if threat.threat_type != Some(threat_type) {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if threat.source.as_deref() != Some(source.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if threat.status != Some(status) {
                return false;
            }
        }
        if let Some(created) = threat.created_at {
            if created < self.from || created > self.to {
                return false;
            }
        }
        true
    }
}

impl Default for AnalyticsFilters {
    fn default() -> Self {
        Self::last_days(7)
    }
}

/// Summary counters for the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreatStats {
    pub total: u64,
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub info: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub new_last_24h: u64,
}

pub fn compute_stats<'a>(
    threats: impl IntoIterator<Item = &'a Threat>,
    now: DateTime<Utc>,
) -> ThreatStats {
    let mut stats = ThreatStats::default();
    let day_ago = now - Duration::hours(24);
    for threat in threats {
        stats.total += 1;
        match threat.severity {
            Severity::Critical => stats.critical += 1,
            Severity::High => stats.high += 1,
            Severity::Medium => stats.medium += 1,
            Severity::Low => stats.low += 1,
            Severity::Info => stats.info += 1,
        }
        match threat.status {
            Some(ThreatStatus::InProgress) => stats.in_progress += 1,
            Some(ThreatStatus::Resolved) => stats.resolved += 1,
            _ => {}
        }
        if let Some(created) = threat.created_at {
            if created >= day_ago && created <= now {
                stats.new_last_24h += 1;
            }
        }
    }
    stats
}

/// One slice of the severity donut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityCount {
    pub name: &'static str,
    pub value: u64,
    pub color: &'static str,
}

/// Fixed-order severity breakdown, most severe first.
pub fn severity_breakdown(stats: &ThreatStats) -> Vec<SeverityCount> {
    [
        (Severity::Critical, stats.critical),
        (Severity::High, stats.high),
        (Severity::Medium, stats.medium),
        (Severity::Low, stats.low),
        (Severity::Info, stats.info),
    ]
    .into_iter()
    .map(|(severity, value)| SeverityCount {
        name: severity.label(),
        value,
        color: severity.color(),
    })
    .collect()
}

/// One day of the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: u64,
    pub severity: Severity,
}

/// Daily counts over the trailing `days`, every day present.
///
/// A day's severity is the highest seen that day; quiet days report low.
pub fn trend_series<'a>(
    threats: impl IntoIterator<Item = &'a Threat>,
    now: DateTime<Utc>,
    days: i64,
) -> Vec<TrendPoint> {
    let today = now.date_naive();
    let mut series: Vec<TrendPoint> = (0..days)
        .rev()
        .map(|i| TrendPoint {
            date: today - Duration::days(i),
            value: 0,
            severity: Severity::Low,
        })
        .collect();
    let first = match series.first() {
        Some(point) => point.date,
        None => return series,
    };

    for threat in threats {
        let Some(created) = threat.created_at else {
            continue;
        };
        let date = created.date_naive();
        if date < first || date > today {
            continue;
        }
        let point = &mut series[(date - first).num_days() as usize];
        point.value += 1;
        if threat.severity > point.severity {
            point.severity = threat.severity;
        }
    }
    series
}

/// A plotted geo marker.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Markers for the threat map. Threats without parsable, in-range
/// coordinates are skipped.
pub fn geo_points<'a>(threats: impl IntoIterator<Item = &'a Threat>) -> Vec<GeoPoint> {
    threats
        .into_iter()
        .filter_map(|threat| {
            let geo = threat.metadata.as_ref()?.geo_ip.as_ref()?;
            let latitude: f64 = geo.latitude.as_deref()?.trim().parse().ok()?;
            let longitude: f64 = geo.longitude.as_deref()?.trim().parse().ok()?;
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return None;
            }
            Some(GeoPoint {
                name: geo
                    .country_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Threat counts by type, first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub name: &'static str,
    pub value: u64,
}

pub fn type_breakdown<'a>(threats: impl IntoIterator<Item = &'a Threat>) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    for threat in threats {
        let name = threat.threat_type.unwrap_or(ThreatType::Other).label();
        match counts.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value += 1,
            None => counts.push(TypeCount { name, value: 1 }),
        }
    }
    counts
}
