#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Aegis allocation engine: ranks active incidents and greedily assigns
//! scarce response resources (transport, rescue teams, shelter capacity).

/// Incident records and enumerations.
#[path = "../module.rs"]
pub mod module;

/// Resource unit, shelter, and catalog pools.
#[path = "../catalog.rs"]
pub mod catalog;

/// Per-incident demand estimation.
#[path = "../demand.rs"]
pub mod demand;

/// Priority scoring and stable ranking.
#[path = "../ranker.rs"]
pub mod ranker;

/// Greedy allocation pass over ranked incidents.
#[path = "../allocator.rs"]
pub mod allocator;

/// Recommendation cache keyed by incident id.
#[path = "../cache.rs"]
pub mod cache;

/// Feed normalization, incident reports, and filters.
#[path = "../intake.rs"]
pub mod intake;

/// Aggregation helpers for dashboards.
#[path = "../analytics.rs"]
pub mod analytics;

/// Telemetry handle for run/intake logging.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Engine runtime orchestration entry points.
#[path = "../main.rs"]
pub mod runtime;

pub use allocator::{allocate, AllocationOutcome, Recommendation, ShelterAssignment};
pub use cache::RecommendationCache;
pub use catalog::{ResourceCatalog, ResourceUnit, Shelter};
pub use demand::{estimate, Demand};
pub use module::{GeoPoint, Incident, IncidentStatus, IncidentType, Severity};
pub use ranker::{rank, RankedIncident};
pub use runtime::{AllocationReport, EngineError, RecommendOutcome, ResponseEngine};
pub use telemetry::{EngineTelemetry, EngineTelemetryBuilder};
