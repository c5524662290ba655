//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use csv_import::{EsriGeocoderConfig, FailurePolicy, ImportConfig};
use foodmap_common::{ImportAction, TenantId};

/// Stakeholder CSV import service
#[derive(Parser, Debug)]
#[command(name = "importer")]
#[command(about = "Parses stakeholder CSV uploads, geocodes them and stores the batch")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// PostgreSQL connection string. Without it batches are kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// ArcGIS findAddressCandidates endpoint
    #[arg(long, env = "GEOCODER_URL")]
    pub geocoder_url: Option<String>,

    /// ArcGIS API key
    #[arg(long, env = "GEOCODER_TOKEN", hide_env_values = true)]
    pub geocoder_token: Option<String>,

    /// Geocoder request timeout in seconds
    #[arg(long, default_value_t = 30, env = "GEOCODER_TIMEOUT_SECS")]
    pub geocoder_timeout_secs: u64,

    /// Geocoding requests allowed in flight
    #[arg(long, default_value_t = 1, env = "GEOCODE_CONCURRENCY")]
    pub geocode_concurrency: usize,

    /// What to do with a row that cannot be geocoded (abort or skip)
    #[arg(long, default_value_t = FailurePolicy::Abort, env = "GEOCODE_FAILURE_POLICY")]
    pub failure_policy: FailurePolicy,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,

    /// Import one CSV file and print the result as JSON
    Run {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Tenant the rows belong to
        #[arg(short, long)]
        tenant_id: TenantId,

        /// insert or upsert
        #[arg(short, long, default_value_t = ImportAction::Insert)]
        action: ImportAction,
    },
}

impl Args {
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            geocode_concurrency: self.geocode_concurrency,
            failure_policy: self.failure_policy,
        }
    }

    pub fn geocoder_config(&self) -> EsriGeocoderConfig {
        let defaults = EsriGeocoderConfig::default();
        EsriGeocoderConfig {
            url: self.geocoder_url.clone().unwrap_or(defaults.url),
            token: self.geocoder_token.clone(),
            timeout_secs: self.geocoder_timeout_secs,
            ..defaults
        }
    }
}
