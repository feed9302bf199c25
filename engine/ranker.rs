use serde::{Deserialize, Serialize};

use crate::module::Incident;

/// One entry of the priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedIncident {
    /// Incident identifier.
    pub id: String,
    /// Priority score (higher first).
    pub score: f64,
}

/// Priority score combining severity tier and log-scaled affected
/// population. Deterministic: no clock, no randomness.
#[must_use]
pub fn priority_score(incident: &Incident) -> f64 {
    let base = f64::from(incident.severity.rank_value() * 10);
    match incident.affected {
        Some(affected) if affected > 0 => base + f64::from(affected).log10(),
        _ => base,
    }
}

/// Ranks incidents for allocation: filters to `Active`, sorts descending
/// by score. The sort is stable, so score ties keep the input's relative
/// order.
#[must_use]
pub fn rank(incidents: &[Incident]) -> Vec<RankedIncident> {
    let mut ranked: Vec<RankedIncident> = incidents
        .iter()
        .filter(|incident| incident.is_active())
        .map(|incident| RankedIncident {
            id: incident.id.clone(),
            score: priority_score(incident),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
