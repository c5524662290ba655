//! Stakeholder import service.
//!
//! Serves the CSV import API, or with `run` imports a single file and prints
//! the result.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use csv_import::{EsriGeocoder, ImportOutcome, ImportPipeline};
use foodmap_common::{ImportAction, TenantId};
use importer::{start_server, Args, Command, ServerState};
use storage::{MemoryStakeholderStore, StakeholderCatalog, StakeholderStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so `run` can print its result on stdout.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let pipeline = build_pipeline(&args).await?;

    match &args.command {
        Some(Command::Run {
            file,
            tenant_id,
            action,
        }) => run_file(&pipeline, file, *tenant_id, *action).await,
        Some(Command::Serve) | None => serve(&args, pipeline).await,
    }
}

async fn build_pipeline(args: &Args) -> Result<ImportPipeline> {
    let geocoder = EsriGeocoder::new(args.geocoder_config())
        .context("Failed to create geocoder client")?;

    let store: Arc<dyn StakeholderStore> = match &args.database_url {
        Some(url) => {
            let catalog = StakeholderCatalog::connect(url).await?;
            catalog.migrate().await?;
            info!("Connected to stakeholder database");
            Arc::new(catalog)
        }
        None => {
            warn!("DATABASE_URL not set, imported rows are kept in memory only");
            Arc::new(MemoryStakeholderStore::new())
        }
    };

    let config = args.import_config();
    info!(
        concurrency = config.geocode_concurrency,
        failure_policy = %config.failure_policy,
        "Import pipeline configured"
    );

    Ok(ImportPipeline::new(Arc::new(geocoder), store, config)?)
}

async fn serve(args: &Args, pipeline: ImportPipeline) -> Result<()> {
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let state = Arc::new(ServerState::new(pipeline).with_metrics(prometheus_handle));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", args.listen))?;

    start_server(state, addr).await
}

async fn run_file(
    pipeline: &ImportPipeline,
    file: &Path,
    tenant_id: TenantId,
    action: ImportAction,
) -> Result<()> {
    info!(file = %file.display(), tenant_id, action = %action, "Importing file");

    let buffer = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let run = pipeline.run(&buffer, action, tenant_id).await?;
    println!("{}", serde_json::to_string_pretty(&run)?);

    match &run.outcome {
        Some(ImportOutcome::Success { .. }) => Ok(()),
        Some(outcome) => bail!("Import finished with status {:?}", outcome),
        None => bail!("Parse aborted after {} row failure(s)", run.report.failures.len()),
    }
}
