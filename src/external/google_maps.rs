use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use super::{
    DirectionsRequest, DirectionsResponse, DistanceMatrixResponse, GeocodeResponse, MapsProvider,
};
use crate::config::Config;
use crate::entities::Coordinates;
use crate::error::{upstream_error, Error};

pub const DEFAULT_API_BASE: &str = "maps.googleapis.com";

/// Google Maps web services client (Distance Matrix, Geocoding, Directions).
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.google_maps_api_base, &config.google_maps_api_key)
    }

    fn url(&self, service: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, service)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, Error> {
    let status_code = res.status();

    if !status_code.is_success() {
        tracing::warn!(%status_code, "google maps returned an error status");
        return Err(upstream_error(format!("HTTP {}", status_code)));
    }

    let text = res.text().await?;
    let data = serde_json::from_str(&text)?;

    Ok(data)
}

fn waypoints_param(waypoints: &[Coordinates], optimize: bool) -> Option<String> {
    if waypoints.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::with_capacity(waypoints.len() + 1);
    if optimize {
        parts.push("optimize:true".into());
    }
    parts.extend(waypoints.iter().map(|&waypoint| String::from(waypoint)));

    Some(parts.join("|"))
}

#[async_trait]
impl MapsProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceMatrixResponse, Error> {
        let res = self
            .client
            .get(self.url("distancematrix"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("origins", origin)])
            .query(&[("destinations", destination)])
            .send()
            .await?;

        decode(res).await
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, Error> {
        let res = self
            .client
            .get(self.url("geocode"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("address", address)])
            .send()
            .await?;

        decode(res).await
    }

    #[tracing::instrument(skip(self))]
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse, Error> {
        let origin: String = request.origin.into();
        let destination: String = request.destination.into();

        let mut builder = self
            .client
            .get(self.url("directions"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("origin", origin)])
            .query(&[("destination", destination)])
            .query(&[("mode", "driving")]);

        if let Some(waypoints) = waypoints_param(&request.waypoints, request.optimize_waypoints) {
            builder = builder.query(&[("waypoints", waypoints)]);
        }

        let res = builder.send().await?;

        decode(res).await
    }
}

#[test]
fn waypoints_are_pipe_separated_with_optimize_flag() {
    let waypoints = [
        Coordinates { lat: 14.6, lng: 121.0 },
        Coordinates { lat: 14.65, lng: 121.02 },
    ];

    assert_eq!(
        waypoints_param(&waypoints, true).unwrap(),
        "optimize:true|14.6,121|14.65,121.02"
    );
    assert_eq!(waypoints_param(&waypoints, false).unwrap(), "14.6,121|14.65,121.02");
    assert!(waypoints_param(&[], true).is_none());
}

#[test]
fn builds_service_urls_from_the_api_base() {
    let maps = GoogleMaps::new(DEFAULT_API_BASE, "key");
    assert_eq!(
        maps.url("distancematrix"),
        "https://maps.googleapis.com/maps/api/distancematrix/json"
    );
}
