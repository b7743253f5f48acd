mod cost_api;
mod resolver;
mod route_api;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    entities::Pricing,
    external::{DynMapsProvider, GoogleMaps, MapsProvider},
};

pub struct Engine {
    maps: DynMapsProvider,
    pricing: Pricing,
}

impl Engine {
    pub fn new<M: MapsProvider + Send + Sync + 'static>(maps: M, pricing: Pricing) -> Self {
        Self {
            maps: Arc::new(maps),
            pricing,
        }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(config: &Config) -> Self {
        Self::new(GoogleMaps::from_config(config), config.pricing)
    }
}

impl API for Engine {}
