use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_logging::LogLevel;
use thiserror::Error;
use uuid::Uuid;

use crate::allocator::{allocate, Recommendation};
use crate::cache::RecommendationCache;
use crate::catalog::ResourceCatalog;
use crate::demand::{estimate, Demand};
use crate::module::Incident;
use crate::ranker::{rank, RankedIncident};
use crate::telemetry::EngineTelemetry;

/// Errors surfaced by the engine runtime. These are precondition
/// failures: the engine refuses to allocate from inputs that never
/// arrived rather than produce a plan that starves later incidents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No incident snapshot has been loaded.
    #[error("incident feed not loaded")]
    IncidentFeedUnavailable,
    /// No resource catalog snapshot has been loaded.
    #[error("resource catalog not loaded")]
    CatalogUnavailable,
}

/// Caller-visible result of a recommendation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendOutcome {
    /// A plan exists for the incident (possibly with empty lists when the
    /// pools were exhausted).
    Plan(Recommendation),
    /// The incident had no demand or was filtered out upstream (inactive,
    /// unknown, or structurally invalid). Nothing to apply; not an error.
    NothingToAllocate,
}

/// Summary of one completed allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Priority order the pass followed.
    pub ranked: Vec<RankedIncident>,
    /// Transport units assigned across all incidents.
    pub transport_allocated: usize,
    /// Rescue teams assigned across all incidents.
    pub rescue_teams_allocated: usize,
    /// Shelter beds assigned across all incidents.
    pub shelter_capacity_allocated: u32,
}

/// The allocation engine runtime.
///
/// The caller owns data lifecycle: it loads incident and catalog
/// snapshots when its fetch layer completes, and the engine never
/// fetches or blocks. Pools supplied via [`Self::load_catalog`] are
/// consumed across runs until the next load, so a second run without a
/// refresh starts from the first run's leftovers.
#[derive(Debug, Default)]
pub struct ResponseEngine {
    incidents: Option<Vec<Incident>>,
    catalog: Option<ResourceCatalog>,
    cache: RecommendationCache,
    telemetry: Option<EngineTelemetry>,
}

impl ResponseEngine {
    /// Creates an engine with no snapshots loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a telemetry handle.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: EngineTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Replaces the incident snapshot. The cached plan is kept: stale
    /// reads are the caller's documented responsibility until the next
    /// run replaces it.
    pub fn load_incidents(&mut self, incidents: Vec<Incident>) {
        self.incidents = Some(incidents);
    }

    /// Replaces the resource catalog snapshot, taking ownership for
    /// subsequent runs. The snapshot is sanitized on the way in; repairs
    /// are logged.
    pub fn load_catalog(&mut self, mut catalog: ResourceCatalog) {
        let repaired = catalog.sanitize();
        if repaired > 0 {
            self.log(
                LogLevel::Warn,
                "catalog snapshot repaired",
                serde_json::json!({ "entries": repaired }),
            );
        }
        self.catalog = Some(catalog);
    }

    /// Current pools: the loaded snapshot minus whatever prior runs
    /// consumed. `None` until a catalog is loaded.
    #[must_use]
    pub fn catalog(&self) -> Option<&ResourceCatalog> {
        self.catalog.as_ref()
    }

    /// Read access to the recommendation cache.
    #[must_use]
    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    /// Runs one full pass: rank all active incidents, estimate demand,
    /// allocate greedily, replace the cache with the new plan, and keep
    /// the leftover pools for the next run.
    pub fn run_allocation(&mut self) -> Result<AllocationReport, EngineError> {
        let incidents = self
            .incidents
            .as_ref()
            .ok_or(EngineError::IncidentFeedUnavailable)?;
        let catalog = self.catalog.take().ok_or(EngineError::CatalogUnavailable)?;

        let ranked = rank(incidents);
        let by_id: IndexMap<&str, &Incident> = incidents
            .iter()
            .map(|incident| (incident.id.as_str(), incident))
            .collect();
        let demands: IndexMap<String, Demand> = ranked
            .iter()
            .filter_map(|entry| by_id.get(entry.id.as_str()).copied())
            .map(|incident| (incident.id.clone(), estimate(incident)))
            .collect();

        let outcome = allocate(&ranked, &demands, catalog);
        let report = AllocationReport {
            run_id: Uuid::new_v4(),
            transport_allocated: outcome.plan.values().map(|rec| rec.transport.len()).sum(),
            rescue_teams_allocated: outcome
                .plan
                .values()
                .map(|rec| rec.rescue_teams.len())
                .sum(),
            shelter_capacity_allocated: outcome
                .plan
                .values()
                .flat_map(|rec| rec.shelters.iter())
                .map(|assignment| assignment.capacity)
                .sum(),
            ranked,
        };

        self.catalog = Some(outcome.catalog);
        self.cache.replace_all(outcome.plan);
        self.log(
            LogLevel::Info,
            "allocation run complete",
            serde_json::json!({
                "run_id": report.run_id,
                "incidents": report.ranked.len(),
                "transport": report.transport_allocated,
                "rescue_teams": report.rescue_teams_allocated,
                "shelter_capacity": report.shelter_capacity_allocated,
            }),
        );
        Ok(report)
    }

    /// Returns the recommendation for one incident.
    ///
    /// On a cache miss this runs a full pass over all active incidents
    /// first: allocation is a shared, cross-incident competition, never a
    /// per-incident computation.
    pub fn recommend(&mut self, incident_id: &str) -> Result<RecommendOutcome, EngineError> {
        if let Some(cached) = self.cache.get(incident_id) {
            return Ok(RecommendOutcome::Plan(cached));
        }
        self.run_allocation()?;
        Ok(self
            .cache
            .get(incident_id)
            .map_or(RecommendOutcome::NothingToAllocate, RecommendOutcome::Plan))
    }

    // Telemetry must never fail a run.
    fn log(&self, level: LogLevel, message: &str, fields: serde_json::Value) {
        if let Some(telemetry) = &self.telemetry {
            let _ = telemetry.log(level, message, fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ResourceUnit, Shelter};
    use crate::module::{GeoPoint, IncidentStatus, IncidentType, Severity};
    use chrono::Utc;
    use std::collections::VecDeque;

    fn incident(
        id: &str,
        incident_type: IncidentType,
        severity: Severity,
        affected: u32,
        status: IncidentStatus,
    ) -> Incident {
        Incident {
            id: id.into(),
            incident_type,
            severity,
            status,
            title: "t".into(),
            description: "d".into(),
            location: "l".into(),
            coordinates: GeoPoint { lat: 0.0, lng: 0.0 },
            reported: Utc::now(),
            affected: Some(affected),
        }
    }

    fn catalog(transport: usize, rescue: usize, shelter_capacity: u32) -> ResourceCatalog {
        ResourceCatalog {
            transport: (1..=transport)
                .map(|idx| ResourceUnit::new(format!("AMB-{idx}")))
                .collect::<VecDeque<_>>(),
            rescue_teams: (1..=rescue)
                .map(|idx| ResourceUnit::new(format!("RT-{idx}")))
                .collect::<VecDeque<_>>(),
            shelters: vec![Shelter::new("SH-1", shelter_capacity)],
        }
    }

    #[test]
    fn refuses_to_run_without_snapshots() {
        let mut engine = ResponseEngine::new();
        assert_eq!(
            engine.run_allocation().unwrap_err(),
            EngineError::IncidentFeedUnavailable
        );
        engine.load_incidents(vec![]);
        assert_eq!(
            engine.run_allocation().unwrap_err(),
            EngineError::CatalogUnavailable
        );
    }

    #[test]
    fn recommend_runs_full_pass_on_cache_miss() {
        let mut engine = ResponseEngine::new();
        engine.load_incidents(vec![
            incident(
                "A",
                IncidentType::Flood,
                Severity::High,
                15000,
                IncidentStatus::Active,
            ),
            incident(
                "B",
                IncidentType::Fire,
                Severity::Medium,
                500,
                IncidentStatus::Active,
            ),
        ]);
        engine.load_catalog(catalog(2, 0, 0));

        // Requesting B computes the plan for A as well: A outranks B and
        // exhausts the 2-unit transport pool first.
        let outcome = engine.recommend("B").unwrap();
        match outcome {
            RecommendOutcome::Plan(rec) => assert!(rec.transport.is_empty()),
            RecommendOutcome::NothingToAllocate => panic!("B is active and must have a plan"),
        }
        match engine.recommend("A").unwrap() {
            RecommendOutcome::Plan(rec) => {
                assert_eq!(rec.transport, vec!["AMB-1", "AMB-2"]);
            }
            RecommendOutcome::NothingToAllocate => panic!("A must have a plan"),
        }
    }

    #[test]
    fn inactive_incident_yields_nothing_to_allocate() {
        let mut engine = ResponseEngine::new();
        engine.load_incidents(vec![incident(
            "A",
            IncidentType::Flood,
            Severity::High,
            1000,
            IncidentStatus::Monitoring,
        )]);
        engine.load_catalog(catalog(2, 2, 100));
        assert_eq!(
            engine.recommend("A").unwrap(),
            RecommendOutcome::NothingToAllocate
        );
        // No resources were consumed on its behalf.
        assert_eq!(engine.catalog().unwrap().transport.len(), 2);
    }

    #[test]
    fn second_run_starts_from_leftover_pools() {
        let mut engine = ResponseEngine::new();
        engine.load_incidents(vec![incident(
            "A",
            IncidentType::Flood,
            Severity::High,
            15000,
            IncidentStatus::Active,
        )]);
        engine.load_catalog(catalog(5, 8, 20000));

        let first = engine.run_allocation().unwrap();
        assert_eq!(first.transport_allocated, 3);
        assert_eq!(engine.catalog().unwrap().transport.len(), 2);

        // No intervening load_catalog: the pass consumes leftovers, so A
        // now only gets the remaining two transport units.
        let second = engine.run_allocation().unwrap();
        assert_eq!(second.transport_allocated, 2);
        assert_eq!(engine.catalog().unwrap().transport.len(), 0);

        // A fresh snapshot restores the full pool.
        engine.load_catalog(catalog(5, 8, 20000));
        let third = engine.run_allocation().unwrap();
        assert_eq!(third.transport_allocated, 3);
    }

    #[test]
    fn each_run_replaces_the_whole_cache() {
        let mut engine = ResponseEngine::new();
        engine.load_incidents(vec![
            incident(
                "A",
                IncidentType::Flood,
                Severity::High,
                1000,
                IncidentStatus::Active,
            ),
            incident(
                "B",
                IncidentType::Fire,
                Severity::Low,
                1000,
                IncidentStatus::Active,
            ),
        ]);
        engine.load_catalog(catalog(4, 4, 5000));
        engine.run_allocation().unwrap();
        assert_eq!(engine.cache().len(), 2);

        engine.load_incidents(vec![incident(
            "C",
            IncidentType::Cyclone,
            Severity::High,
            2000,
            IncidentStatus::Active,
        )]);
        engine.run_allocation().unwrap();
        assert_eq!(engine.cache().len(), 1);
        assert!(engine.cache().get("A").is_none());
        assert!(engine.cache().get("C").is_some());
    }

    #[test]
    fn report_totals_match_the_plan() {
        let mut engine = ResponseEngine::new();
        engine.load_incidents(vec![incident(
            "A",
            IncidentType::Earthquake,
            Severity::High,
            3000,
            IncidentStatus::Active,
        )]);
        engine.load_catalog(catalog(10, 10, 10000));
        let report = engine.run_allocation().unwrap();
        // ceil(3000/1000), ceil(3000/1500), ceil(3000*0.9)
        assert_eq!(report.transport_allocated, 3);
        assert_eq!(report.rescue_teams_allocated, 2);
        assert_eq!(report.shelter_capacity_allocated, 2700);
    }
}
