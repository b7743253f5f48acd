use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{CostRequest, DynAPI};
use crate::entities::FeeBreakdown;
use crate::error::Error;
use crate::presentation::format_money;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateParams {
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    /// Only honoured when it is a JSON number; anything else uses the default rate.
    #[serde(default)]
    rate_per_km: Option<Value>,
    #[serde(default)]
    weight_kg: Option<f64>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    distance_km: String,
    distance_fee: String,
    weight_fee: String,
    total_cost: String,
}

impl From<FeeBreakdown> for CalculateResponse {
    fn from(fees: FeeBreakdown) -> Self {
        Self {
            distance_km: format_money(fees.distance_km),
            distance_fee: format_money(fees.distance_fee),
            weight_fee: format_money(fees.weight_fee),
            total_cost: format_money(fees.total),
        }
    }
}

pub async fn calculate(
    Extension(api): Extension<DynAPI>,
    params: Result<Json<CalculateParams>, JsonRejection>,
) -> Result<Json<CalculateResponse>, Error> {
    let Json(params) = params?;

    let request = CostRequest {
        origin: params.origin,
        destination: params.destination,
        rate_per_km: params.rate_per_km.as_ref().and_then(Value::as_f64),
        weight_kg: params.weight_kg,
    };

    let fees = api.calculate_cost(request).await?;

    Ok(CalculateResponse::from(fees).into())
}
