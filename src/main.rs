use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use royalty_shield::audit_store::{AuditStore, NoOpAuditStore, SqliteAuditStore};
use royalty_shield::catalog::{InMemoryCatalog, TrackCatalog};
use royalty_shield::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_PROVIDER_TIMEOUT_SEC,
};
use royalty_shield::providers::{
    ProviderGateway, SoundchartsClient, SoundchartsCredentials, SpotifyClient,
    SpotifyCredentials, DEFAULT_SOUNDCHARTS_BASE_URL, DEFAULT_SPOTIFY_ACCOUNTS_URL,
    DEFAULT_SPOTIFY_API_URL,
};
use royalty_shield::server::{run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. File values override CLI values.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to a JSON catalog of baseline track records. Uses the built-in
    /// reference catalog when omitted.
    #[clap(long)]
    pub catalog: Option<PathBuf>,

    /// Path to the SQLite audit-log database. Audit persistence is disabled
    /// when omitted.
    #[clap(long)]
    pub audit_db: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Timeout in seconds for upstream provider requests.
    #[clap(long, default_value_t = DEFAULT_PROVIDER_TIMEOUT_SEC)]
    pub provider_timeout_sec: u64,
}

fn build_gateway(config: &AppConfig) -> Result<ProviderGateway> {
    let timeout = Duration::from_secs(config.provider_timeout_sec);

    let soundcharts = match &config.soundcharts {
        Some(settings) => Some(SoundchartsClient::new(
            SoundchartsCredentials {
                app_id: settings.app_id.clone(),
                api_key: settings.api_key.clone(),
            },
            settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SOUNDCHARTS_BASE_URL.to_string()),
            timeout,
        )?),
        None => None,
    };

    let spotify = match &config.spotify {
        Some(settings) => Some(SpotifyClient::new(
            SpotifyCredentials {
                client_id: settings.client_id.clone(),
                client_secret: settings.client_secret.clone(),
            },
            settings
                .accounts_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string()),
            settings
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            timeout,
        )?),
        None => None,
    };

    Ok(ProviderGateway::new(soundcharts, spotify))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        port: cli_args.port,
        catalog_path: cli_args.catalog,
        audit_db: cli_args.audit_db,
        logging_level: cli_args.logging_level,
        provider_timeout_sec: cli_args.provider_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            let catalog = InMemoryCatalog::from_json_file(path)?;
            info!("Loaded catalog from {:?}", path);
            catalog
        }
        None => {
            info!("No catalog file configured, using built-in reference catalog");
            InMemoryCatalog::demo()
        }
    };
    info!("Monitoring {} tracks", catalog.list().len());

    let audit_store: Arc<dyn AuditStore> = match &config.audit_db {
        Some(path) => Arc::new(
            SqliteAuditStore::new(path)
                .with_context(|| format!("Failed to open audit database {:?}", path))?,
        ),
        None => {
            info!("No audit database configured, audit persistence disabled");
            Arc::new(NoOpAuditStore)
        }
    };

    let gateway = build_gateway(&config)?;

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
    };

    run_server(
        server_config,
        Arc::new(catalog),
        Arc::new(gateway),
        audit_store,
    )
    .await
}
