use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use aegis_engine::intake::{self, IncidentFilter, RawIncident};
use aegis_engine::{
    analytics, EngineTelemetry, Incident, RecommendOutcome, ResourceCatalog, ResponseEngine,
};

#[derive(Parser, Debug)]
#[command(name = "aegis-ops", version, about = "Disaster-response allocation operator console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the priority order of active incidents.
    Rank {
        /// JSON incident feed snapshot.
        #[arg(long)]
        incidents: PathBuf,
    },
    /// Runs an allocation pass and prints the plan.
    Recommend {
        /// JSON incident feed snapshot.
        #[arg(long)]
        incidents: PathBuf,
        /// JSON resource catalog snapshot.
        #[arg(long)]
        resources: PathBuf,
        /// Limit output to one incident's recommendation.
        #[arg(long)]
        incident: Option<String>,
        /// Append run telemetry to this JSON-lines file.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Prints aggregate counts for dashboards.
    Summary {
        /// JSON incident feed snapshot.
        #[arg(long)]
        incidents: PathBuf,
        /// Restrict to one incident category (e.g. `flood`).
        #[arg(long)]
        r#type: Option<String>,
    },
}

fn load_incidents(path: &PathBuf) -> Result<Vec<Incident>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading incident feed {}", path.display()))?;
    let raw: Vec<RawIncident> =
        serde_json::from_str(&content).context("incident feed is not a JSON array")?;
    let summary = intake::normalize(raw);
    if summary.rejected > 0 {
        eprintln!(
            "warning: {} structurally invalid record(s) excluded",
            summary.rejected
        );
    }
    Ok(summary.incidents)
}

fn load_catalog(path: &PathBuf) -> Result<ResourceCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading resource catalog {}", path.display()))?;
    serde_json::from_str(&content).context("resource catalog is malformed")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Rank { incidents } => {
            let incidents = load_incidents(&incidents)?;
            let ranked = aegis_engine::rank(&incidents);
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Recommend {
            incidents,
            resources,
            incident,
            log,
        } => {
            let feed = load_incidents(&incidents)?;
            let catalog = load_catalog(&resources)?;
            let mut engine = ResponseEngine::new();
            if let Some(path) = log {
                let telemetry = EngineTelemetry::builder("aegis-ops")
                    .log_path(path)
                    .build()
                    .context("opening telemetry log")?;
                engine = engine.with_telemetry(telemetry);
            }
            engine.load_incidents(feed);
            engine.load_catalog(catalog);
            if let Some(id) = incident {
                let mut out = serde_json::Map::new();
                match engine.recommend(&id)? {
                    RecommendOutcome::Plan(plan) => {
                        out.insert(id, serde_json::to_value(plan)?);
                    }
                    RecommendOutcome::NothingToAllocate => {
                        out.insert(id, serde_json::Value::Null);
                    }
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let report = engine.run_allocation()?;
                let plan = engine.cache().snapshot();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "run_id": report.run_id,
                        "plan": plan,
                        "leftover": engine.catalog(),
                    }))?
                );
            }
        }
        Commands::Summary { incidents, r#type } => {
            let feed = load_incidents(&incidents)?;
            let filter = IncidentFilter {
                incident_type: match r#type {
                    Some(raw) => Some(
                        serde_json::from_value(serde_json::Value::String(raw))
                            .context("invalid incident type")?,
                    ),
                    None => None,
                },
                ..IncidentFilter::default()
            };
            let matched: Vec<Incident> = filter.apply(&feed).into_iter().cloned().collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "by_type": analytics::counts_by_type(&matched),
                    "by_day": analytics::counts_by_day(&matched),
                }))?
            );
        }
    }
    Ok(())
}
