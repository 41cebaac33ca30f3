use std::sync::Arc;

use log::info;
use vs_core::Ledger;
use vs_veo::{ApiKey, VeoApi};

use crate::config::AppConfig;
use crate::generator::key::{EnvKeySelector, KeySelector};
use crate::generator::store::{FileStore, LedgerStore};
use crate::generator::video::VideoService;

pub mod key;
pub mod messages;
pub mod store;
pub mod video;

/// The video service plus the storage the ledger lives in.
pub struct Generator {
    service: Arc<VideoService>,
    store: Box<dyn LedgerStore>,
}

impl Generator {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = ApiKey::new(config.api_key.clone());
        let api = VeoApi::new(&config.api_base_url, &config.model, api_key.clone());
        info!("Using model {} at {}", api.model(), config.api_base_url);
        let api = Arc::new(api);
        let selector = Arc::new(EnvKeySelector::new(config.env_file.clone(), api_key.clone()));

        let service = VideoService::new(api, api_key, selector)
            .with_poll_interval(config.poll_interval);

        let store = FileStore::new(&config.data_dir)?;

        Ok(Self::from_parts(service, Box::new(store)))
    }

    pub fn from_parts(service: VideoService, store: Box<dyn LedgerStore>) -> Self {
        Self {
            service: Arc::new(service),
            store,
        }
    }

    pub fn service(&self) -> Arc<VideoService> {
        self.service.clone()
    }

    pub fn key_selector(&self) -> Arc<dyn KeySelector> {
        self.service.key_selector()
    }

    pub fn load_posts(&self) -> Ledger {
        store::load_ledger(self.store.as_ref())
    }

    pub fn save_posts(&self, ledger: &Ledger) -> anyhow::Result<()> {
        store::save_ledger(self.store.as_ref(), ledger)
    }
}
