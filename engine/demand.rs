use serde::{Deserialize, Serialize};

use crate::module::{Incident, IncidentType};

/// Population assumed when an incident's affected count is unknown or zero.
pub const DEFAULT_AFFECTED: u32 = 1000;

/// Resource quantities one incident needs, derived from its type,
/// severity, and affected population. Never stored on the incident.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demand {
    /// Medical transport units needed.
    pub transport: u32,
    /// Rescue teams needed.
    pub rescue_teams: u32,
    /// Shelter beds needed.
    pub shelter_capacity: u32,
}

impl Demand {
    /// Whether the incident needs nothing at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.transport == 0 && self.rescue_teams == 0 && self.shelter_capacity == 0
    }
}

/// Per-type scaling profile: population divisors for countable units and a
/// population multiplier for shelter beds.
struct TypeProfile {
    transport_divisor: f64,
    rescue_divisor: f64,
    shelter_multiplier: f64,
}

const fn profile(incident_type: IncidentType) -> TypeProfile {
    match incident_type {
        IncidentType::Flood => TypeProfile {
            transport_divisor: 5000.0,
            rescue_divisor: 2000.0,
            shelter_multiplier: 0.7,
        },
        IncidentType::Fire => TypeProfile {
            transport_divisor: 2000.0,
            rescue_divisor: 3000.0,
            shelter_multiplier: 0.5,
        },
        IncidentType::Earthquake => TypeProfile {
            transport_divisor: 1000.0,
            rescue_divisor: 1500.0,
            shelter_multiplier: 0.9,
        },
        IncidentType::Cyclone => TypeProfile {
            transport_divisor: 3000.0,
            rescue_divisor: 2000.0,
            shelter_multiplier: 0.8,
        },
        IncidentType::Drought => TypeProfile {
            transport_divisor: 10000.0,
            rescue_divisor: 20000.0,
            shelter_multiplier: 0.2,
        },
        IncidentType::Heatwave => TypeProfile {
            transport_divisor: 8000.0,
            rescue_divisor: 15000.0,
            shelter_multiplier: 0.3,
        },
        IncidentType::Other => TypeProfile {
            transport_divisor: 5000.0,
            rescue_divisor: 5000.0,
            shelter_multiplier: 0.5,
        },
    }
}

/// Rounds a fractional need up to the next whole unit. Estimated need is
/// never understated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn round_up(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.ceil() as u32
    }
}

/// Estimates the resource demand for one incident. The incident record is
/// read-only; the default population substitution is local to this
/// calculation.
#[must_use]
pub fn estimate(incident: &Incident) -> Demand {
    let population = f64::from(match incident.affected {
        Some(affected) if affected > 0 => affected,
        _ => DEFAULT_AFFECTED,
    });
    let factor = incident.severity.demand_factor();
    let profile = profile(incident.incident_type);
    Demand {
        transport: round_up(population / profile.transport_divisor * factor),
        rescue_teams: round_up(population / profile.rescue_divisor * factor),
        shelter_capacity: round_up(population * profile.shelter_multiplier * factor),
    }
}
