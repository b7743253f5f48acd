use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{FeeBreakdown, RouteQuote, Waypoints};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CostRequest {
    pub origin: String,
    pub destination: String,
    pub rate_per_km: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Raw form input for a route calculation. Nothing here is validated yet.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub weight: String,
    #[serde(default)]
    pub waypoints: Waypoints,
}

#[async_trait]
pub trait CostAPI {
    async fn calculate_cost(&self, request: CostRequest) -> Result<FeeBreakdown, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn quote_route(&self, request: RouteRequest) -> Result<RouteQuote, Error>;
}

pub trait API: CostAPI + RouteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
