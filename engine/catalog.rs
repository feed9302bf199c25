use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A single countable response unit (ambulance, rescue team).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceUnit {
    /// Identifier unique within its category (e.g. `AMB-04`).
    pub id: String,
}

impl ResourceUnit {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A shelter with capacity that can be split across incidents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shelter {
    /// Shelter identifier.
    pub id: String,
    /// Total bed capacity.
    pub total_capacity: u32,
    /// Beds still unassigned.
    pub available_capacity: u32,
}

impl Shelter {
    /// Convenience constructor with full availability.
    #[must_use]
    pub fn new(id: impl Into<String>, total_capacity: u32) -> Self {
        Self {
            id: id.into(),
            total_capacity,
            available_capacity: total_capacity,
        }
    }
}

/// Snapshot of available resources for one allocation run.
///
/// Transport and rescue-team pools are FIFO queues: earlier-ranked
/// incidents draw from the front. Shelters keep their supplied order and
/// are drained in place. The catalog is a value: the allocation pass
/// takes ownership and returns the leftover.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceCatalog {
    /// Medical transport units, first-available-first-assigned.
    pub transport: VecDeque<ResourceUnit>,
    /// Rescue teams, first-available-first-assigned.
    pub rescue_teams: VecDeque<ResourceUnit>,
    /// Shelters, drained in supplied order.
    pub shelters: Vec<Shelter>,
}

impl ResourceCatalog {
    /// Repairs invariant violations in a freshly loaded snapshot: drops
    /// units and shelters with empty identifiers and clamps
    /// `available_capacity` to `total_capacity`.
    ///
    /// Returns the number of entries that needed repair or removal.
    pub fn sanitize(&mut self) -> usize {
        let before = self.transport.len() + self.rescue_teams.len() + self.shelters.len();
        self.transport.retain(|unit| !unit.id.is_empty());
        self.rescue_teams.retain(|unit| !unit.id.is_empty());
        self.shelters.retain(|shelter| !shelter.id.is_empty());
        let removed = before - (self.transport.len() + self.rescue_teams.len() + self.shelters.len());
        let mut clamped = 0;
        for shelter in &mut self.shelters {
            if shelter.available_capacity > shelter.total_capacity {
                shelter.available_capacity = shelter.total_capacity;
                clamped += 1;
            }
        }
        removed + clamped
    }

    /// Total shelter beds still unassigned.
    #[must_use]
    pub fn shelter_capacity(&self) -> u32 {
        self.shelters
            .iter()
            .map(|shelter| shelter.available_capacity)
            .sum()
    }

    /// Whether every pool is exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.transport.is_empty() && self.rescue_teams.is_empty() && self.shelter_capacity() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_overfull_shelters() {
        let mut catalog = ResourceCatalog {
            shelters: vec![Shelter {
                id: "SH-1".into(),
                total_capacity: 100,
                available_capacity: 150,
            }],
            ..ResourceCatalog::default()
        };
        assert_eq!(catalog.sanitize(), 1);
        assert_eq!(catalog.shelters[0].available_capacity, 100);
    }

    #[test]
    fn sanitize_drops_unidentified_units() {
        let mut catalog = ResourceCatalog {
            transport: VecDeque::from(vec![ResourceUnit::new(""), ResourceUnit::new("AMB-1")]),
            ..ResourceCatalog::default()
        };
        assert_eq!(catalog.sanitize(), 1);
        assert_eq!(catalog.transport.len(), 1);
    }

    #[test]
    fn exhaustion_considers_all_pools() {
        let mut catalog = ResourceCatalog::default();
        assert!(catalog.is_exhausted());
        catalog.shelters.push(Shelter::new("SH-1", 10));
        assert!(!catalog.is_exhausted());
    }
}
