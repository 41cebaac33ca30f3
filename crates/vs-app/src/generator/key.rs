use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use log::{info, warn};
use vs_veo::ApiKey;

use crate::config::API_KEY_VAR;

/// Host capability for picking the API key used by the video client.
#[async_trait]
pub trait KeySelector: Send + Sync {
    async fn has_selected_key(&self) -> bool;

    /// Ask the host to (re)select a key.
    async fn open_select_key(&self) -> anyhow::Result<()>;
}

/// Selects the key from the env file, re-reading it on every selection so
/// an edited `API_KEY` is picked up without a restart.
pub struct EnvKeySelector {
    env_file: PathBuf,
    api_key: ApiKey,
}

impl EnvKeySelector {
    pub fn new(env_file: PathBuf, api_key: ApiKey) -> Self {
        Self { env_file, api_key }
    }
}

#[async_trait]
impl KeySelector for EnvKeySelector {
    async fn has_selected_key(&self) -> bool {
        self.api_key.is_set()
    }

    async fn open_select_key(&self) -> anyhow::Result<()> {
        info!(
            "Selecting API key: set {} in {} to a paid Veo key",
            API_KEY_VAR,
            self.env_file.display()
        );

        match read_key(&self.env_file)? {
            Some(key) if !key.trim().is_empty() => {
                self.api_key.set(key);
                Ok(())
            }
            _ => {
                warn!("{} is not set", API_KEY_VAR);
                anyhow::bail!("{} is not set in {}", API_KEY_VAR, self.env_file.display())
            }
        }
    }
}

/// Last `API_KEY` entry in the env file. The process environment is left
/// alone, jobs may be running on other threads.
fn read_key(path: &Path) -> anyhow::Result<Option<String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to open {}", path.display())),
    };

    let mut key = None;
    for entry in entries {
        let (name, value) = entry.with_context(|| format!("Failed to parse {}", path.display()))?;
        if name == API_KEY_VAR {
            key = Some(value);
        }
    }
    Ok(key)
}
