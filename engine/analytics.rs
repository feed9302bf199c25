use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;
use crate::module::{Incident, IncidentType};

/// Number of incidents per category, in first-seen feed order.
#[must_use]
pub fn counts_by_type(incidents: &[Incident]) -> IndexMap<IncidentType, usize> {
    let mut counts = IndexMap::new();
    for incident in incidents {
        *counts.entry(incident.incident_type).or_insert(0) += 1;
    }
    counts
}

/// Number of incidents reported per calendar day, sorted by date.
#[must_use]
pub fn counts_by_day(incidents: &[Incident]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.reported.date_naive()).or_insert(0) += 1;
    }
    counts
}

/// Available/deployed tally for one resource category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageTally {
    /// Still in the pool.
    pub available: u32,
    /// Consumed by allocation runs.
    pub deployed: u32,
}

/// Per-category usage derived from a starting catalog and its leftover.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogUsage {
    /// Transport units.
    pub transport: UsageTally,
    /// Rescue teams.
    pub rescue_teams: UsageTally,
    /// Shelter beds.
    pub shelter_capacity: UsageTally,
}

/// Compares a starting catalog snapshot against the leftover after one or
/// more runs. Counts saturate at zero if the leftover somehow grew.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn catalog_usage(start: &ResourceCatalog, leftover: &ResourceCatalog) -> CatalogUsage {
    let transport_start = start.transport.len() as u32;
    let transport_left = leftover.transport.len() as u32;
    let rescue_start = start.rescue_teams.len() as u32;
    let rescue_left = leftover.rescue_teams.len() as u32;
    let shelter_start = start.shelter_capacity();
    let shelter_left = leftover.shelter_capacity();
    CatalogUsage {
        transport: UsageTally {
            available: transport_left,
            deployed: transport_start.saturating_sub(transport_left),
        },
        rescue_teams: UsageTally {
            available: rescue_left,
            deployed: rescue_start.saturating_sub(rescue_left),
        },
        shelter_capacity: UsageTally {
            available: shelter_left,
            deployed: shelter_start.saturating_sub(shelter_left),
        },
    }
}
