use axum::extract::rejection::JsonRejection;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Display};

use crate::external::{DirectionsStatus, GeocodeStatus};

pub const SERVER_ERROR_MESSAGE: &str = "Server error calculating cost.";
pub const DISTANCE_UNAVAILABLE_MESSAGE: &str = "Could not get distance from Google.";

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }

    pub fn is_geocode_error(&self) -> bool {
        (120..=129).contains(&self.code)
    }

    pub fn is_directions_error(&self) -> bool {
        (130..=139).contains(&self.code)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        upstream_error(err)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        malformed_body_error(rejection)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_internal() {
            tracing::error!(code = self.code, "{}", self.message);
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
        } else {
            (StatusCode::BAD_REQUEST, self.message.as_str())
        };

        let body = Json(json!({
            "code": self.code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        message: format!("environment variable error: {}", err),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error {
        code: 2,
        message: format!("request error: {}", err),
    }
}

pub fn upstream_error<T: Display>(detail: T) -> Error {
    Error {
        code: 3,
        message: format!("upstream error: {}", detail),
    }
}

pub fn unexpected_error<T: Display>(detail: T) -> Error {
    Error {
        code: 4,
        message: format!("unexpected error: {}", detail),
    }
}

pub fn config_error<T: Display>(detail: T) -> Error {
    Error {
        code: 5,
        message: format!("configuration error: {}", detail),
    }
}

pub fn invalid_input_error<T: Display>(detail: T) -> Error {
    Error {
        code: 100,
        message: detail.to_string(),
    }
}

pub fn missing_field_error(field: &str) -> Error {
    Error {
        code: 101,
        message: format!("Please enter the {}.", field),
    }
}

pub fn invalid_weight_error() -> Error {
    Error {
        code: 102,
        message: "Please enter a valid positive number for weight (kg).".into(),
    }
}

pub fn invalid_coordinates_error(lat: f64, lng: f64) -> Error {
    Error {
        code: 103,
        message: format!(
            "Coordinates ({}, {}) are out of range: latitude must be within [-90, 90] and longitude within [-180, 180].",
            lat, lng
        ),
    }
}

pub fn malformed_body_error<T: Display>(detail: T) -> Error {
    Error {
        code: 104,
        message: format!("Invalid request body: {}", detail),
    }
}

pub fn distance_unavailable_error() -> Error {
    Error {
        code: 110,
        message: DISTANCE_UNAVAILABLE_MESSAGE.into(),
    }
}

/// Maps a geocoding failure for the named location (e.g. "origin",
/// "waypoint 2") to a user-facing error.
pub fn geocode_error(label: &str, status: &GeocodeStatus) -> Error {
    match status {
        GeocodeStatus::ZeroResults | GeocodeStatus::Ok => Error {
            code: 120,
            message: format!("Could not find the {} address.", label),
        },
        GeocodeStatus::OverQueryLimit | GeocodeStatus::OverDailyLimit => Error {
            code: 121,
            message: format!(
                "Geocoding quota exceeded while resolving the {}. Please try again later.",
                label
            ),
        },
        GeocodeStatus::RequestDenied => Error {
            code: 122,
            message: format!(
                "Geocoding request for the {} was denied. Check the API key.",
                label
            ),
        },
        GeocodeStatus::InvalidRequest => Error {
            code: 123,
            message: format!("The {} address could not be geocoded: the request was malformed.", label),
        },
        GeocodeStatus::UnknownError | GeocodeStatus::Other => Error {
            code: 124,
            message: format!("Could not resolve the {} ({}).", label, status),
        },
    }
}

pub fn directions_error(status: &DirectionsStatus) -> Error {
    match status {
        DirectionsStatus::NotFound | DirectionsStatus::ZeroResults | DirectionsStatus::Ok => Error {
            code: 130,
            message: "No route could be found between the given locations.".into(),
        },
        DirectionsStatus::MaxWaypointsExceeded | DirectionsStatus::MaxRouteLengthExceeded => Error {
            code: 131,
            message: "Too many waypoints for a single route.".into(),
        },
        DirectionsStatus::InvalidRequest => Error {
            code: 132,
            message: "The route request was invalid.".into(),
        },
        DirectionsStatus::OverQueryLimit | DirectionsStatus::OverDailyLimit => Error {
            code: 133,
            message: "Directions quota exceeded. Please try again later.".into(),
        },
        DirectionsStatus::RequestDenied => Error {
            code: 134,
            message: "The directions request was denied. Check the API key.".into(),
        },
        DirectionsStatus::UnknownError | DirectionsStatus::Other => Error {
            code: 135,
            message: "Failed to load directions from Google Maps.".into(),
        },
    }
}

#[test]
fn internal_errors_hide_details_from_clients() {
    let err = unexpected_error("connection reset");
    assert!(err.is_internal());

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = tokio_test::block_on(hyper::body::to_bytes(response.into_body())).unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], SERVER_ERROR_MESSAGE);
    assert_eq!(body["code"], 4);
}

#[test]
fn malformed_bodies_are_bad_requests() {
    let err = malformed_body_error("missing field `origin`");
    assert_eq!(err.code, 104);
    assert!(!err.is_internal());
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn user_facing_errors_are_bad_requests() {
    let response = distance_unavailable_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = invalid_weight_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn geocode_statuses_map_to_distinct_messages() {
    let statuses = [
        GeocodeStatus::ZeroResults,
        GeocodeStatus::OverQueryLimit,
        GeocodeStatus::RequestDenied,
        GeocodeStatus::InvalidRequest,
        GeocodeStatus::UnknownError,
    ];

    let codes: Vec<i32> = statuses
        .iter()
        .map(|status| geocode_error("origin", status).code)
        .collect();

    assert_eq!(codes, vec![120, 121, 122, 123, 124]);
    assert!(geocode_error("waypoint 2", &GeocodeStatus::ZeroResults)
        .message
        .contains("waypoint 2"));
}

#[test]
fn directions_statuses_map_to_six_categories() {
    let statuses = [
        DirectionsStatus::ZeroResults,
        DirectionsStatus::MaxWaypointsExceeded,
        DirectionsStatus::InvalidRequest,
        DirectionsStatus::OverQueryLimit,
        DirectionsStatus::RequestDenied,
        DirectionsStatus::Other,
    ];

    let codes: Vec<i32> = statuses
        .iter()
        .map(|status| directions_error(status).code)
        .collect();

    assert_eq!(codes, vec![130, 131, 132, 133, 134, 135]);
    assert_eq!(
        directions_error(&DirectionsStatus::NotFound),
        directions_error(&DirectionsStatus::ZeroResults)
    );
}
