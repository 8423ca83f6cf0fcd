use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// TOML file configuration. Every field is optional; present values override
/// the corresponding CLI arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub catalog_path: Option<PathBuf>,
    pub audit_db: Option<PathBuf>,
    pub logging_level: Option<String>,
    pub provider_timeout_sec: Option<u64>,
    pub soundcharts: Option<SoundchartsSettings>,
    pub spotify: Option<SpotifySettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundchartsSettings {
    pub app_id: String,
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub accounts_url: Option<String>,
    pub api_url: Option<String>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
