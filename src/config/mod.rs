mod file_config;

pub use file_config::{FileConfig, SoundchartsSettings, SpotifySettings};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PROVIDER_TIMEOUT_SEC: u64 = 5;

/// CLI arguments that can be overridden by the TOML config file.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub catalog_path: Option<PathBuf>,
    pub audit_db: Option<PathBuf>,
    pub logging_level: RequestsLoggingLevel,
    pub provider_timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub catalog_path: Option<PathBuf>,
    pub audit_db: Option<PathBuf>,
    pub logging_level: RequestsLoggingLevel,
    pub provider_timeout_sec: u64,
    pub soundcharts: Option<SoundchartsSettings>,
    pub spotify: Option<SpotifySettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; provider
    /// credentials fall back to environment variables when the file has no
    /// matching section.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let catalog_path = file.catalog_path.or_else(|| cli.catalog_path.clone());
        if let Some(path) = &catalog_path {
            if !path.is_file() {
                bail!("Catalog file does not exist: {:?}", path);
            }
        }

        let logging_level = match file.logging_level {
            Some(value) => match RequestsLoggingLevel::from_str(&value, true) {
                Ok(level) => level,
                Err(_) => bail!("Invalid logging_level in config file: {}", value),
            },
            None => cli.logging_level.clone(),
        };

        Ok(AppConfig {
            port: file.port.unwrap_or(cli.port),
            catalog_path,
            audit_db: file.audit_db.or_else(|| cli.audit_db.clone()),
            logging_level,
            provider_timeout_sec: file
                .provider_timeout_sec
                .unwrap_or(cli.provider_timeout_sec),
            soundcharts: file.soundcharts.or_else(soundcharts_from_env),
            spotify: file.spotify.or_else(spotify_from_env),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn soundcharts_from_env() -> Option<SoundchartsSettings> {
    match (
        env_var("SOUNDCHARTS_APP_ID"),
        env_var("SOUNDCHARTS_API_KEY"),
    ) {
        (Some(app_id), Some(api_key)) => Some(SoundchartsSettings {
            app_id,
            api_key,
            base_url: None,
        }),
        _ => None,
    }
}

fn spotify_from_env() -> Option<SpotifySettings> {
    match (
        env_var("SPOTIFY_CLIENT_ID"),
        env_var("SPOTIFY_CLIENT_SECRET"),
    ) {
        (Some(client_id), Some(client_secret)) => Some(SpotifySettings {
            client_id,
            client_secret,
            accounts_url: None,
            api_url: None,
        }),
        _ => None,
    }
}
