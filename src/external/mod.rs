pub mod google_maps;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::entities::{Coordinates, Route, RouteLeg};
use crate::error::Error;

pub use google_maps::GoogleMaps;

/// Remote mapping capabilities used by the engine. Implementations only fail
/// with an [`Error`] on transport or payload problems; provider-reported
/// failures come back as a status in the response.
#[async_trait]
pub trait MapsProvider {
    async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceMatrixResponse, Error>;

    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, Error>;

    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse, Error>;
}

pub type DynMapsProvider = std::sync::Arc<dyn MapsProvider + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeStatus {
    Ok,
    ZeroResults,
    OverDailyLimit,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    #[serde(other)]
    Other,
}

/// Status reported by the directions and distance matrix services, both for
/// a whole response and for a single matrix element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionsStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    InvalidRequest,
    OverDailyLimit,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    #[serde(other)]
    Other,
}

impl Display for GeocodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::OverDailyLimit => "OVER_DAILY_LIMIT",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Other => "UNRECOGNIZED_STATUS",
        };
        write!(f, "{}", name)
    }
}

impl Display for DirectionsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
            Self::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OverDailyLimit => "OVER_DAILY_LIMIT",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Other => "UNRECOGNIZED_STATUS",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: DirectionsStatus,
    #[serde(default)]
    pub rows: Vec<DistanceMatrixRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixRow {
    #[serde(default)]
    pub elements: Vec<DistanceMatrixElement>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixElement {
    pub status: DirectionsStatus,
    pub distance: Option<Measurement>,
    pub duration: Option<Measurement>,
}

impl DistanceMatrixResponse {
    pub fn first_element(&self) -> Option<&DistanceMatrixElement> {
        self.rows.first()?.elements.first()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: GeocodeStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub optimize_waypoints: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: DirectionsStatus,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub distance: Measurement,
    pub duration: Measurement,
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsStep {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

impl From<DirectionsLeg> for RouteLeg {
    fn from(leg: DirectionsLeg) -> Self {
        let mut path = vec![leg.start_location];
        path.extend(leg.steps.iter().map(|step| step.end_location));
        if path.last() != Some(&leg.end_location) {
            path.push(leg.end_location);
        }

        RouteLeg {
            distance_meters: leg.distance.value,
            duration_seconds: leg.duration.value,
            path,
        }
    }
}

impl From<DirectionsRoute> for Route {
    fn from(route: DirectionsRoute) -> Self {
        Route::new(
            route.legs.into_iter().map(RouteLeg::from).collect(),
            route.waypoint_order,
        )
    }
}

#[test]
fn unknown_statuses_fall_into_the_catch_all() {
    let status: DirectionsStatus = serde_json::from_str("\"MAX_ELEMENTS_EXCEEDED\"").unwrap();
    assert_eq!(status, DirectionsStatus::Other);

    let status: GeocodeStatus = serde_json::from_str("\"OVER_QUERY_LIMIT\"").unwrap();
    assert_eq!(status, GeocodeStatus::OverQueryLimit);
}

#[test]
fn parses_a_directions_payload_into_a_route() {
    let payload = serde_json::json!({
        "status": "OK",
        "geocoded_waypoints": [],
        "routes": [{
            "summary": "EDSA",
            "waypoint_order": [0],
            "legs": [
                {
                    "distance": { "text": "4.2 km", "value": 4200 },
                    "duration": { "text": "10 mins", "value": 600 },
                    "start_location": { "lat": 14.5995, "lng": 120.9842 },
                    "end_location": { "lat": 14.62, "lng": 121.0 },
                    "steps": [
                        {
                            "start_location": { "lat": 14.5995, "lng": 120.9842 },
                            "end_location": { "lat": 14.61, "lng": 120.99 }
                        },
                        {
                            "start_location": { "lat": 14.61, "lng": 120.99 },
                            "end_location": { "lat": 14.62, "lng": 121.0 }
                        }
                    ]
                },
                {
                    "distance": { "text": "5.8 km", "value": 5800 },
                    "duration": { "text": "15 mins", "value": 900 },
                    "start_location": { "lat": 14.62, "lng": 121.0 },
                    "end_location": { "lat": 14.676, "lng": 121.0437 },
                    "steps": []
                }
            ]
        }]
    });

    let response: DirectionsResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(response.status, DirectionsStatus::Ok);

    let route: Route = response.routes.into_iter().next().unwrap().into();
    assert_eq!(route.distance_meters(), 10_000);
    assert_eq!(route.duration_seconds(), 1_500);
    assert_eq!(route.legs[0].path.len(), 3);
    assert_eq!(route.legs[1].path.len(), 2);
    assert_eq!(route.path().len(), 4);
}

#[test]
fn parses_a_failed_distance_matrix_element() {
    let payload = serde_json::json!({
        "status": "OK",
        "origin_addresses": ["Nowhere"],
        "destination_addresses": ["Elsewhere"],
        "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }] }]
    });

    let response: DistanceMatrixResponse = serde_json::from_value(payload).unwrap();
    let element = response.first_element().unwrap();
    assert_eq!(element.status, DirectionsStatus::ZeroResults);
    assert!(element.distance.is_none());
}
