use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a reported disaster event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    /// Riverine or urban flooding.
    Flood,
    /// Structural or wildland fire.
    Fire,
    /// Seismic event.
    Earthquake,
    /// Tropical cyclone.
    Cyclone,
    /// Prolonged water scarcity.
    Drought,
    /// Extreme-temperature event.
    Heatwave,
    /// Anything the feed reports outside the known set.
    #[serde(other)]
    Other,
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flood => write!(f, "flood"),
            Self::Fire => write!(f, "fire"),
            Self::Earthquake => write!(f, "earthquake"),
            Self::Cyclone => write!(f, "cyclone"),
            Self::Drought => write!(f, "drought"),
            Self::Heatwave => write!(f, "heatwave"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Severity tier of an incident. Unrecognized feed values normalize to
/// `Medium` at the intake boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Life-threatening, large-scale impact.
    High,
    /// Limited impact.
    Low,
    /// Significant but contained impact. Also the catch-all for
    /// unrecognized feed values, so it must stay the last variant.
    #[serde(other)]
    Medium,
}

impl Severity {
    /// Rank weight used by the priority scorer.
    #[must_use]
    pub const fn rank_value(self) -> u32 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Scaling factor applied to demand estimates.
    #[must_use]
    pub const fn demand_factor(self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Lifecycle state of an incident. Only `Active` incidents compete for
/// resources. Unrecognized feed values normalize to `Reported`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// Verified and ongoing.
    Active,
    /// Being observed, no response underway.
    Monitoring,
    /// Closed out.
    Resolved,
    /// Submitted but not yet verified. Also the catch-all for
    /// unrecognized feed values, so it must stay the last variant.
    #[serde(other)]
    Reported,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reported => write!(f, "reported"),
            Self::Active => write!(f, "active"),
            Self::Monitoring => write!(f, "monitoring"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// WGS84 coordinates of an incident site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// A reported disaster event requiring resource response. Records reaching
/// this type have passed intake validation: every field here is trusted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    /// Stable opaque identifier (e.g. `D001`).
    pub id: String,
    /// Event category.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Severity tier.
    pub severity: Severity,
    /// Lifecycle state.
    pub status: IncidentStatus,
    /// Short headline.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Human-readable place name.
    pub location: String,
    /// Incident site coordinates.
    pub coordinates: GeoPoint,
    /// When the incident was reported (display only, never used by the
    /// allocator).
    pub reported: DateTime<Utc>,
    /// Estimated number of people affected; `None` when unknown at
    /// reporting time.
    pub affected: Option<u32>,
}

impl Incident {
    /// Whether this incident competes for resources.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == IncidentStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_normalizes_to_other() {
        let parsed: IncidentType = serde_json::from_str("\"volcano\"").unwrap();
        assert_eq!(parsed, IncidentType::Other);
    }

    #[test]
    fn known_types_keep_their_variant() {
        let parsed: IncidentType = serde_json::from_str("\"cyclone\"").unwrap();
        assert_eq!(parsed, IncidentType::Cyclone);
    }

    #[test]
    fn unknown_severity_normalizes_to_medium() {
        let parsed: Severity = serde_json::from_str("\"catastrophic\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn unknown_status_normalizes_to_reported() {
        let parsed: IncidentStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, IncidentStatus::Reported);
    }

    #[test]
    fn catch_all_variants_keep_their_own_names() {
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"medium\"");
        assert_eq!(
            serde_json::from_str::<Severity>("\"medium\"").unwrap(),
            Severity::Medium
        );
        assert_eq!(
            serde_json::to_string(&IncidentStatus::Reported).unwrap(),
            "\"reported\""
        );
        assert_eq!(
            serde_json::from_str::<IncidentStatus>("\"reported\"").unwrap(),
            IncidentStatus::Reported
        );
    }

    #[test]
    fn severity_weights_are_ordered() {
        assert!(Severity::High.rank_value() > Severity::Medium.rank_value());
        assert!(Severity::Medium.demand_factor() > Severity::Low.demand_factor());
    }
}
