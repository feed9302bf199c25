use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::module::{GeoPoint, Incident, IncidentStatus, IncidentType, Severity};

/// Untrusted feed record, prior to structural validation. Unknown type and
/// severity strings already normalize during deserialization; missing
/// fields are what gets records rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIncident {
    /// Identifier, required.
    pub id: Option<String>,
    /// Latitude, required.
    pub lat: Option<f64>,
    /// Longitude, required.
    pub lng: Option<f64>,
    /// Event category, required (unknown values become `other`).
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,
    /// Severity tier, required (unknown values become `medium`).
    pub severity: Option<Severity>,
    /// Lifecycle state; missing or unknown values become `reported`.
    pub status: Option<IncidentStatus>,
    /// Short headline.
    pub title: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Human-readable place name.
    pub location: Option<String>,
    /// ISO-8601 report timestamp, with or without an offset.
    pub reported: Option<String>,
    /// Estimated affected population.
    pub affected: Option<u32>,
}

/// Result of normalizing one feed snapshot.
#[derive(Debug, Clone, Default)]
pub struct IntakeSummary {
    /// Structurally valid incidents, in feed order.
    pub incidents: Vec<Incident>,
    /// Records dropped for missing id, coordinates, type, or severity.
    pub rejected: usize,
}

fn parse_reported(raw: Option<&str>) -> DateTime<Utc> {
    // Feed timestamps come with or without a zone suffix; display-only
    // either way, so an unparseable value falls back to the epoch rather
    // than rejecting the record.
    raw.and_then(|text| {
        DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
                    .ok()
            })
    })
    .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Validates and normalizes a feed snapshot. Records missing any of
/// id, coordinates, type, or severity are structurally invalid and
/// excluded entirely; the count is reported for the caller to log.
#[must_use]
pub fn normalize(raw: Vec<RawIncident>) -> IntakeSummary {
    let mut summary = IntakeSummary::default();
    for record in raw {
        let (Some(id), Some(lat), Some(lng), Some(incident_type), Some(severity)) = (
            record.id,
            record.lat,
            record.lng,
            record.incident_type,
            record.severity,
        ) else {
            summary.rejected += 1;
            continue;
        };
        if id.is_empty() {
            summary.rejected += 1;
            continue;
        }
        summary.incidents.push(Incident {
            id,
            incident_type,
            severity,
            status: record.status.unwrap_or(IncidentStatus::Reported),
            title: record.title.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            location: record.location.unwrap_or_default(),
            coordinates: GeoPoint { lat, lng },
            reported: parse_reported(record.reported.as_deref()),
            affected: record.affected,
        });
    }
    summary
}

/// A new-incident submission from the reporting surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Event category.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Severity tier.
    pub severity: Severity,
    /// Human-readable place name.
    pub location: String,
    /// Incident site coordinates.
    pub coordinates: GeoPoint,
    /// Free-text description.
    pub description: String,
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Next sequential incident identifier: one past the highest numeric
/// suffix among existing `D###` ids, so deleted incidents never cause a
/// reused id.
#[must_use]
pub fn next_incident_id(existing: &[Incident]) -> String {
    let max = existing
        .iter()
        .filter_map(|incident| incident.id.strip_prefix('D'))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("D{:03}", max + 1)
}

impl IncidentReport {
    /// Turns the submission into a trusted incident record: generated id,
    /// status `Reported`, affected count unknown, derived title.
    #[must_use]
    pub fn into_incident(self, existing: &[Incident], reported_at: DateTime<Utc>) -> Incident {
        Incident {
            id: next_incident_id(existing),
            title: format!("{} in {}", title_case(&self.incident_type.to_string()), self.location),
            incident_type: self.incident_type,
            severity: self.severity,
            status: IncidentStatus::Reported,
            description: self.description,
            location: self.location,
            coordinates: self.coordinates,
            reported: reported_at,
            affected: None,
        }
    }
}

/// Predicate over incidents mirroring the operator search surface: free
/// text, category, severity, region substring, and report-date range.
/// `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    /// Case-insensitive match against title, description, or location.
    pub search: Option<String>,
    /// Exact category match.
    pub incident_type: Option<IncidentType>,
    /// Exact severity match.
    pub severity: Option<Severity>,
    /// Case-insensitive substring of the location, `-` treated as space.
    pub region: Option<String>,
    /// Earliest report timestamp, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Latest report timestamp, inclusive.
    pub to: Option<DateTime<Utc>>,
}

impl IncidentFilter {
    /// Whether one incident passes every set criterion.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = incident.title.to_lowercase().contains(&needle)
                || incident.description.to_lowercase().contains(&needle)
                || incident.location.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(incident_type) = self.incident_type {
            if incident.incident_type != incident_type {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if incident.severity != severity {
                return false;
            }
        }
        if let Some(region) = &self.region {
            let needle = region.to_lowercase().replace('-', " ");
            if !incident.location.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if incident.reported < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if incident.reported > to {
                return false;
            }
        }
        true
    }

    /// Applies the filter, preserving feed order.
    #[must_use]
    pub fn apply<'a>(&self, incidents: &'a [Incident]) -> Vec<&'a Incident> {
        incidents
            .iter()
            .filter(|incident| self.matches(incident))
            .collect()
    }
}
