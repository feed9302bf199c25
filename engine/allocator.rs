use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;
use crate::demand::Demand;
use crate::ranker::RankedIncident;

/// Capacity drawn from one shelter for one incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelterAssignment {
    /// Shelter identifier.
    pub shelter_id: String,
    /// Beds allocated from it.
    pub capacity: u32,
}

/// Resources assigned to one incident by an allocation run. All three
/// lists may be empty: that is an explicit "nothing could be allocated",
/// distinct from the incident being absent from the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    /// Identifiers of assigned transport units.
    pub transport: Vec<String>,
    /// Identifiers of assigned rescue teams.
    pub rescue_teams: Vec<String>,
    /// Per-shelter capacity draws.
    pub shelters: Vec<ShelterAssignment>,
}

impl Recommendation {
    /// Whether the run could assign nothing to this incident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transport.is_empty() && self.rescue_teams.is_empty() && self.shelters.is_empty()
    }
}

/// Result of one allocation pass: the plan in rank order plus the
/// leftover catalog for the caller to keep or refresh.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// Incident id -> recommendation, iteration order follows rank order.
    pub plan: IndexMap<String, Recommendation>,
    /// Pools remaining after the pass.
    pub catalog: ResourceCatalog,
}

/// Runs one greedy allocation pass.
///
/// Incidents are visited strictly in `ranked` order, each taking what it
/// needs from the front of the transport and rescue-team queues and
/// draining shelters in catalog order. No backtracking: resources given
/// to an earlier incident are gone for the rest of the pass. Incidents in
/// `ranked` without a demand entry are recorded with an empty
/// recommendation.
#[must_use]
pub fn allocate(
    ranked: &[RankedIncident],
    demands: &IndexMap<String, Demand>,
    mut catalog: ResourceCatalog,
) -> AllocationOutcome {
    let mut plan = IndexMap::with_capacity(ranked.len());
    for entry in ranked {
        let demand = demands.get(&entry.id).copied().unwrap_or_default();
        let mut recommendation = Recommendation::default();

        for _ in 0..demand.transport {
            match catalog.transport.pop_front() {
                Some(unit) => recommendation.transport.push(unit.id),
                None => break,
            }
        }
        for _ in 0..demand.rescue_teams {
            match catalog.rescue_teams.pop_front() {
                Some(unit) => recommendation.rescue_teams.push(unit.id),
                None => break,
            }
        }

        let mut needed = demand.shelter_capacity;
        for shelter in &mut catalog.shelters {
            if needed == 0 {
                break;
            }
            if shelter.available_capacity == 0 {
                continue;
            }
            let taken = needed.min(shelter.available_capacity);
            shelter.available_capacity -= taken;
            needed -= taken;
            recommendation.shelters.push(ShelterAssignment {
                shelter_id: shelter.id.clone(),
                capacity: taken,
            });
        }

        plan.insert(entry.id.clone(), recommendation);
    }
    AllocationOutcome { plan, catalog }
}
