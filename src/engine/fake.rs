use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::entities::Coordinates;
use crate::error::{unexpected_error, Error};
use crate::external::{
    DirectionsLeg, DirectionsRequest, DirectionsResponse, DirectionsRoute, DirectionsStatus,
    DistanceMatrixElement, DistanceMatrixResponse, DistanceMatrixRow, GeocodeResponse,
    GeocodeResult, GeocodeStatus, Geometry, MapsProvider, Measurement,
};

/// In-memory provider that answers from canned responses and records every
/// call it receives.
#[derive(Clone, Default)]
pub struct FakeMaps {
    matrix: Option<DistanceMatrixResponse>,
    geocodes: HashMap<String, GeocodeResponse>,
    directions: Option<DirectionsResponse>,
    calls: Arc<Mutex<Calls>>,
}

#[derive(Default)]
struct Calls {
    matrix: usize,
    geocode: Vec<String>,
    directions: Vec<DirectionsRequest>,
}

impl FakeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrix_distance(mut self, meters: u64) -> Self {
        self.matrix = Some(DistanceMatrixResponse {
            status: DirectionsStatus::Ok,
            rows: vec![DistanceMatrixRow {
                elements: vec![DistanceMatrixElement {
                    status: DirectionsStatus::Ok,
                    distance: Some(Measurement { value: meters }),
                    duration: Some(Measurement { value: 0 }),
                }],
            }],
        });
        self
    }

    pub fn with_matrix_element_status(mut self, status: DirectionsStatus) -> Self {
        self.matrix = Some(DistanceMatrixResponse {
            status: DirectionsStatus::Ok,
            rows: vec![DistanceMatrixRow {
                elements: vec![DistanceMatrixElement {
                    status,
                    distance: None,
                    duration: None,
                }],
            }],
        });
        self
    }

    pub fn with_matrix_status(mut self, status: DirectionsStatus) -> Self {
        self.matrix = Some(DistanceMatrixResponse {
            status,
            rows: vec![],
        });
        self
    }

    pub fn with_address(mut self, address: &str, lat: f64, lng: f64) -> Self {
        self.geocodes.insert(
            address.into(),
            GeocodeResponse {
                status: GeocodeStatus::Ok,
                results: vec![GeocodeResult {
                    formatted_address: Some(format!("{}, Philippines", address)),
                    geometry: Geometry {
                        location: Coordinates { lat, lng },
                    },
                }],
            },
        );
        self
    }

    pub fn with_geocode_status(mut self, address: &str, status: GeocodeStatus) -> Self {
        self.geocodes.insert(
            address.into(),
            GeocodeResponse {
                status,
                results: vec![],
            },
        );
        self
    }

    /// Answers directions with one leg per `(meters, seconds)` pair.
    pub fn with_legs(mut self, legs: &[(u64, u64)]) -> Self {
        let stop = Coordinates { lat: 0.0, lng: 0.0 };
        self.directions = Some(DirectionsResponse {
            status: DirectionsStatus::Ok,
            routes: vec![DirectionsRoute {
                legs: legs
                    .iter()
                    .map(|&(meters, seconds)| DirectionsLeg {
                        distance: Measurement { value: meters },
                        duration: Measurement { value: seconds },
                        start_location: stop,
                        end_location: stop,
                        steps: vec![],
                    })
                    .collect(),
                waypoint_order: vec![],
            }],
        });
        self
    }

    pub fn with_directions_status(mut self, status: DirectionsStatus) -> Self {
        self.directions = Some(DirectionsResponse {
            status,
            routes: vec![],
        });
        self
    }

    pub fn matrix_calls(&self) -> usize {
        self.calls.lock().unwrap().matrix
    }

    pub fn geocoded(&self) -> Vec<String> {
        self.calls.lock().unwrap().geocode.clone()
    }

    pub fn directions_requests(&self) -> Vec<DirectionsRequest> {
        self.calls.lock().unwrap().directions.clone()
    }

    pub fn remote_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.matrix + calls.geocode.len() + calls.directions.len()
    }
}

#[async_trait]
impl MapsProvider for FakeMaps {
    async fn distance_matrix(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<DistanceMatrixResponse, Error> {
        self.calls.lock().unwrap().matrix += 1;
        self.matrix
            .clone()
            .ok_or_else(|| unexpected_error("no distance matrix response configured"))
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, Error> {
        self.calls.lock().unwrap().geocode.push(address.into());
        Ok(self.geocodes.get(address).cloned().unwrap_or(GeocodeResponse {
            status: GeocodeStatus::ZeroResults,
            results: vec![],
        }))
    }

    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse, Error> {
        self.calls.lock().unwrap().directions.push(request.clone());
        self.directions
            .clone()
            .ok_or_else(|| unexpected_error("no directions response configured"))
    }
}
