use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request};
use haulcost::{
    api::DynAPI,
    engine::Engine,
    entities::{Coordinates, Pricing},
    error::{unexpected_error, Error},
    external::{
        DirectionsLeg, DirectionsRequest, DirectionsResponse, DirectionsRoute, DirectionsStatus,
        DistanceMatrixElement, DistanceMatrixResponse, DistanceMatrixRow, GeocodeResponse,
        GeocodeStatus, MapsProvider, Measurement,
    },
    server::router,
};
use hyper::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Answers every distance lookup with the same element and every route with
/// a single 10 km leg.
#[derive(Clone)]
struct StubMaps {
    element_status: DirectionsStatus,
    meters: u64,
    unreachable: bool,
    calls: Arc<AtomicUsize>,
}

impl StubMaps {
    fn new(element_status: DirectionsStatus, meters: u64) -> Self {
        Self {
            element_status,
            meters,
            unreachable: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every remote call fails at the transport level.
    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new(DirectionsStatus::Ok, 0)
        }
    }

    fn check_reachable(&self) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(unexpected_error("connection reset by peer"));
        }
        Ok(())
    }
}

#[async_trait]
impl MapsProvider for StubMaps {
    async fn distance_matrix(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<DistanceMatrixResponse, Error> {
        self.check_reachable()?;
        let found = self.element_status == DirectionsStatus::Ok;

        Ok(DistanceMatrixResponse {
            status: DirectionsStatus::Ok,
            rows: vec![DistanceMatrixRow {
                elements: vec![DistanceMatrixElement {
                    status: self.element_status,
                    distance: found.then(|| Measurement { value: self.meters }),
                    duration: found.then(|| Measurement { value: 600 }),
                }],
            }],
        })
    }

    async fn geocode(&self, _address: &str) -> Result<GeocodeResponse, Error> {
        self.check_reachable()?;
        Ok(GeocodeResponse {
            status: GeocodeStatus::ZeroResults,
            results: vec![],
        })
    }

    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse, Error> {
        self.check_reachable()?;
        Ok(DirectionsResponse {
            status: DirectionsStatus::Ok,
            routes: vec![DirectionsRoute {
                legs: vec![DirectionsLeg {
                    distance: Measurement { value: self.meters },
                    duration: Measurement { value: 1_320 },
                    start_location: request.origin,
                    end_location: request.destination,
                    steps: vec![],
                }],
                waypoint_order: vec![],
            }],
        })
    }
}

fn test_app(maps: StubMaps) -> axum::Router {
    let api = Arc::new(Engine::new(maps, Pricing::default())) as DynAPI;
    router(api)
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn calculate_cost_returns_two_decimal_strings() {
    let app = test_app(StubMaps::new(DirectionsStatus::Ok, 14_700));

    let response = app
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "Manila", "destination": "Quezon City" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["distanceKm"], "14.70");
    assert_eq!(body["distanceFee"], "3234.00");
    assert_eq!(body["weightFee"], "0.00");
    assert_eq!(body["totalCost"], "3234.00");
}

#[tokio::test]
async fn calculate_cost_honours_numeric_rate_only() {
    let app = test_app(StubMaps::new(DirectionsStatus::Ok, 10_000));

    let response = app
        .clone()
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "a", "destination": "b", "ratePerKm": 100, "weightKg": 100 }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["distanceFee"], "1000.00");
    assert_eq!(body["weightFee"], "700.00");
    assert_eq!(body["totalCost"], "1700.00");

    let response = app
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "a", "destination": "b", "ratePerKm": "100" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["distanceFee"], "2200.00");
}

#[tokio::test]
async fn calculate_cost_reports_missing_distance_as_bad_request() {
    let app = test_app(StubMaps::new(DirectionsStatus::ZeroResults, 0));

    let response = app
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "Manila", "destination": "Honolulu" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Could not get distance from Google.");
    assert!(body.get("totalCost").is_none());
}

#[tokio::test]
async fn route_quote_prices_the_coordinate_scenario() {
    let maps = StubMaps::new(DirectionsStatus::Ok, 10_000);
    let calls = maps.calls.clone();
    let app = test_app(maps);

    let response = app
        .oneshot(post(
            "/routes/quote",
            json!({
                "origin": "14.5995,120.9842",
                "destination": "14.6760,121.0437",
                "weight": 100
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalText"], "2900.00");
    assert_eq!(body["distanceText"], "10.0 km");
    assert_eq!(body["durationText"], "22 mins");
    assert_eq!(body["fees"]["weightFee"], 700.0);
    assert_eq!(body["path"][0]["x"], 120.9842);
    assert_eq!(body["markers"][0]["label"], "A");
    assert_eq!(
        body["origin"]["coordinates"],
        serde_json::to_value(Coordinates { lat: 14.5995, lng: 120.9842 }).unwrap()
    );

    // one directions call, no geocoding
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn route_quote_rejects_bad_weight_without_remote_calls() {
    let maps = StubMaps::new(DirectionsStatus::Ok, 10_000);
    let calls = maps.calls.clone();
    let app = test_app(maps);

    let response = app
        .oneshot(post(
            "/routes/quote",
            json!({ "origin": "Manila", "destination": "Makati", "weight": "-3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Please enter a valid positive number for weight (kg)."
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn calculate_cost_hides_transport_failures_behind_a_server_error() {
    let app = test_app(StubMaps::unreachable());

    let response = app
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "Manila", "destination": "Makati" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Server error calculating cost.");
    assert!(body.get("totalCost").is_none());
}

#[tokio::test]
async fn calculate_cost_answers_malformed_bodies_with_json_bad_requests() {
    let maps = StubMaps::new(DirectionsStatus::Ok, 10_000);
    let calls = maps.calls.clone();
    let app = test_app(maps);

    let response = app
        .clone()
        .oneshot(post("/calculate-cost", json!({ "destination": "b" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Please enter the origin.");

    let response = app
        .oneshot(post(
            "/calculate-cost",
            json!({ "origin": "a", "destination": "b", "weightKg": "10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 104);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn route_quote_reports_transport_failures_with_their_cause() {
    let app = test_app(StubMaps::unreachable());

    let response = app
        .oneshot(post(
            "/routes/quote",
            json!({ "origin": "1,1", "destination": "2,2", "weight": "10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Error calculating the cost: unexpected error: connection reset by peer"
    );
}

#[tokio::test]
async fn route_quote_drops_blank_waypoints_before_capping() {
    let maps = StubMaps::new(DirectionsStatus::Ok, 10_000);
    let calls = maps.calls.clone();
    let app = test_app(maps);

    let response = app
        .oneshot(post(
            "/routes/quote",
            json!({
                "origin": "1,1",
                "destination": "2,2",
                "weight": 10,
                "waypoints": ["", "", "", "1.5,1.5"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 1);
    assert_eq!(body["markers"][2]["label"], "1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
