//! Effect executors: each async call resolves to the action that reports it

use std::sync::Arc;

use crate::action::Action;
use crate::api::WeatherClient;
use crate::config::{Config, LocatorConfig, SetupError};
use crate::geo::{FixedLocator, IpLocator, Locator, NoLocator};
use crate::state::{LookupTarget, Unit};
use crate::store::RecentStore;

#[derive(Clone)]
pub struct Services {
    client: WeatherClient,
    locator: Arc<dyn Locator>,
    store: RecentStore,
}

impl Services {
    pub fn new(client: WeatherClient, locator: Arc<dyn Locator>, store: RecentStore) -> Self {
        Self {
            client,
            locator,
            store,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let client = WeatherClient::new(&config.base_url, &config.api_key, config.timeout)?;
        let locator: Arc<dyn Locator> = match &config.locator {
            LocatorConfig::Ip { url } => Arc::new(IpLocator::new(url, config.timeout)?),
            LocatorConfig::Fixed(coords) => Arc::new(FixedLocator(*coords)),
            LocatorConfig::Disabled => Arc::new(NoLocator),
        };
        Ok(Self::new(client, locator, config.recent_store()))
    }

    pub fn store(&self) -> &RecentStore {
        &self.store
    }

    pub async fn fetch_weather(&self, seq: u64, target: LookupTarget, unit: Unit) -> Action {
        match self.client.current(&target, unit).await {
            Ok(result) => Action::WeatherDidLoad { seq, result },
            Err(e) => {
                tracing::warn!(seq, lookup = ?target, error = %e, "weather lookup failed");
                Action::WeatherDidError {
                    seq,
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn locate(&self, seq: u64) -> Action {
        match self.locator.locate().await {
            Ok(coords) => Action::LocationDidResolve {
                seq,
                lat: coords.lat,
                lon: coords.lon,
            },
            Err(e) => {
                tracing::warn!(seq, error = %e, "location lookup failed");
                Action::LocationDidError {
                    seq,
                    failure: e.failure(),
                }
            }
        }
    }

    pub async fn save_recent(&self, cities: Vec<String>) -> Action {
        match self.store.save(&cities).await {
            Ok(()) => Action::RecentDidSave,
            Err(e) => {
                tracing::warn!(error = %e, "could not save recent searches");
                Action::RecentDidError(e.to_string())
            }
        }
    }
}
