use partner_match::config::{LoggingSettings, Settings};
use partner_match::core::{match_batch, BatchOptions, MatchError, Matcher};
use partner_match::models::Snapshot;
use partner_match::services::{load_snapshot, SeedError, SnapshotError, SyntheticSeeder};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Anything that stops a run
#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn obtain_snapshot(settings: &Settings) -> Result<Snapshot, RunError> {
    if let Some(path) = &settings.input.snapshot_path {
        return Ok(load_snapshot(path)?);
    }

    info!("No snapshot configured, seeding synthetic partners");
    let mut seeder = SyntheticSeeder::new(&settings.seed)?;
    let partners = seeder.seed()?;
    let leads = seeder.probe_leads(settings.seed.probe_leads);

    Ok(Snapshot::new(partners, leads))
}

async fn run(settings: Settings) -> Result<(), RunError> {
    let matcher = Matcher::from_config(settings.matching.expansion_limit)?;
    info!("Matcher initialized with expansion limit {}", matcher.expansion_limit().get());

    let snapshot = obtain_snapshot(&settings)?;
    if snapshot.leads.is_empty() {
        warn!("Snapshot has no leads, nothing to match");
    }

    let options = BatchOptions {
        survey_radius_m: settings.matching.survey_radius_m,
    };
    let reports = match_batch(matcher, Arc::new(snapshot.partners), snapshot.leads, options).await?;

    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting partner matching...");

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Matching run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
