use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::error::AppError;

pub const API_KEY_VAR: &str = "API_KEY";
const ENV_FILE_VAR: &str = "VELOSTREAM_ENV_FILE";
const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_DATA_DIR: &str = ".velostream";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub poll_interval: Duration,
    pub data_dir: PathBuf,
    /// Re-read when the user asks to pick another key.
    pub env_file: PathBuf,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let env_file = env::var(ENV_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));

        load_env_file(&env_file)?;

        Self::from_lookup(env_file, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        env_file: PathBuf,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let poll_interval_secs: u64 = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("POLL_INTERVAL_SECS must be a number, got '{raw}'"))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        Ok(Self {
            api_key: lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty()),
            api_base_url: lookup("VEO_API_BASE_URL")
                .unwrap_or_else(|| vs_veo::DEFAULT_BASE_URL.to_string()),
            model: lookup("VEO_MODEL").unwrap_or_else(|| vs_veo::DEFAULT_MODEL.to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
            data_dir: lookup("VELOSTREAM_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            env_file,
        })
    }
}

/// Load variables from a dotenv file at startup. A missing file is fine.
pub fn load_env_file(path: &Path) -> anyhow::Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => {
            debug!("No env file at {}", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
