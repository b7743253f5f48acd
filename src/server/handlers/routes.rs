use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{DynAPI, RouteRequest};
use crate::entities::RouteQuote;
use crate::error::Error;

/// A form field that clients may send either as a JSON number or a string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl From<FormValue> for String {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Number(number) => number.to_string(),
            FormValue::Text(text) => text,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct QuoteParams {
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    weight: Option<FormValue>,
    #[serde(default)]
    waypoints: Vec<String>,
}

/// Failure of a route quote. Unlike the cost endpoint, internal failures
/// keep their underlying text in the response.
pub struct QuoteError(Error);

impl From<Error> for QuoteError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for QuoteError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.into())
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let err = self.0;
        if !err.is_internal() {
            return err.into_response();
        }

        tracing::error!(code = err.code, "{}", err.message);

        let body = Json(json!({
            "code": err.code,
            "message": format!("Error calculating the cost: {}", err.message),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub async fn quote(
    Extension(api): Extension<DynAPI>,
    params: Result<Json<QuoteParams>, JsonRejection>,
) -> Result<Json<RouteQuote>, QuoteError> {
    let Json(params) = params?;

    let request = RouteRequest {
        origin: params.origin,
        destination: params.destination,
        weight: params.weight.map(String::from).unwrap_or_default(),
        waypoints: params.waypoints.into(),
    };

    let quote = api.quote_route(request).await?;

    Ok(quote.into())
}
