use super::resolver::resolve_location;
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{RouteAPI, RouteRequest},
    entities::{Location, Route, RouteQuote},
    error::{directions_error, invalid_weight_error, missing_field_error, Error},
    external::{DirectionsRequest, DirectionsStatus},
};

struct ValidatedRequest<'a> {
    origin: &'a str,
    destination: &'a str,
    weight_kg: f64,
}

fn validate(request: &RouteRequest) -> Result<ValidatedRequest<'_>, Error> {
    let origin = request.origin.trim();
    if origin.is_empty() {
        return Err(missing_field_error("origin"));
    }

    let destination = request.destination.trim();
    if destination.is_empty() {
        return Err(missing_field_error("destination"));
    }

    let weight = request.weight.trim();
    if weight.is_empty() {
        return Err(missing_field_error("weight (kg)"));
    }

    let weight_kg: f64 = weight.parse().map_err(|_| invalid_weight_error())?;
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(invalid_weight_error());
    }

    Ok(ValidatedRequest {
        origin,
        destination,
        weight_kg,
    })
}

impl Engine {
    /// Resolves each non-blank waypoint in order. Failures are skipped and
    /// reported as warnings.
    async fn resolve_waypoints(
        &self,
        request: &RouteRequest,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Location>, Error> {
        let mut waypoints = Vec::new();

        for (i, input) in request.waypoints.iter().enumerate() {
            if input.trim().is_empty() {
                continue;
            }

            let label = format!("waypoint {}", i + 1);
            match resolve_location(self.maps.as_ref(), &label, input).await {
                Ok(location) => waypoints.push(location),
                Err(err) if err.is_geocode_error() => {
                    tracing::warn!(%label, "skipping waypoint: {}", err.message);
                    warnings.push(err.message);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(waypoints)
    }

    async fn find_route(
        &self,
        origin: &Location,
        destination: &Location,
        waypoints: &[Location],
    ) -> Result<Route, Error> {
        let request = DirectionsRequest {
            origin: origin.coordinates,
            destination: destination.coordinates,
            waypoints: waypoints.iter().map(|waypoint| waypoint.coordinates).collect(),
            optimize_waypoints: true,
        };

        let data = self.maps.directions(&request).await?;

        if data.status != DirectionsStatus::Ok {
            tracing::warn!(status = %data.status, "directions failed");
            return Err(directions_error(&data.status));
        }

        let route = data
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| directions_error(&DirectionsStatus::ZeroResults))?;

        Ok(route.into())
    }
}

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn quote_route(&self, request: RouteRequest) -> Result<RouteQuote, Error> {
        let input = validate(&request)?;

        let origin = resolve_location(self.maps.as_ref(), "origin", input.origin).await?;
        let destination =
            resolve_location(self.maps.as_ref(), "destination", input.destination).await?;

        let mut warnings = Vec::new();
        let waypoints = self.resolve_waypoints(&request, &mut warnings).await?;

        let route = self.find_route(&origin, &destination, &waypoints).await?;
        let fees = self.pricing.quote(route.distance_km(), input.weight_kg)?;

        let quote = RouteQuote::new(origin, destination, waypoints, route, fees, warnings);

        tracing::info!(
            token = %quote.token,
            distance_km = quote.fees.distance_km,
            total = quote.fees.total,
            "quoted route"
        );

        Ok(quote)
    }
}

#[cfg(test)]
fn request(origin: &str, destination: &str, weight: &str, waypoints: &[&str]) -> RouteRequest {
    RouteRequest {
        origin: origin.into(),
        destination: destination.into(),
        weight: weight.into(),
        waypoints: waypoints.iter().copied().collect(),
    }
}

#[test]
fn coordinate_scenario_prices_100kg_over_10km() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_legs(&[(10_000, 1_320)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let quote = block_on(engine.quote_route(request(
        "14.5995,120.9842",
        "14.6760,121.0437",
        "100",
        &[],
    )))
    .unwrap();

    assert_eq!(format!("{:.2}", quote.fees.weight_fee), "700.00");
    assert_eq!(format!("{:.2}", quote.fees.distance_fee), "2200.00");
    assert_eq!(quote.total_text, "2900.00");
    assert_eq!(quote.distance_text, "10.0 km");
    assert_eq!(quote.duration_text, "22 mins");
    assert!(maps.geocoded().is_empty());

    let sent = maps.directions_requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].optimize_waypoints);
}

#[test]
fn invalid_weight_makes_no_remote_calls() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_legs(&[(1_000, 60)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    for weight in ["0", "-5", "heavy", "NaN", "inf"] {
        let err = block_on(engine.quote_route(request("Manila", "Makati", weight, &[]))).unwrap_err();
        assert_eq!(err, invalid_weight_error(), "weight {:?}", weight);
    }

    let err = block_on(engine.quote_route(request("Manila", "Makati", "  ", &[]))).unwrap_err();
    assert_eq!(err.code, 101);

    let err = block_on(engine.quote_route(request("", "Makati", "10", &[]))).unwrap_err();
    assert_eq!(err, missing_field_error("origin"));

    assert_eq!(maps.remote_calls(), 0);
}

#[test]
fn sums_distance_and_duration_across_all_legs() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new()
        .with_address("Pasig", 14.57, 121.08)
        .with_legs(&[(4_000, 1_800), (3_500, 1_500), (2_500, 900)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let quote = block_on(engine.quote_route(request(
        "14.5995,120.9842",
        "14.6760,121.0437",
        "50",
        &["Pasig", "14.60,121.00"],
    )))
    .unwrap();

    assert_eq!(quote.distance_meters, 10_000);
    assert_eq!(quote.duration_seconds, 4_200);
    assert_eq!(quote.duration_text, "1 hour 10 mins");
    assert_eq!(quote.fees.total, 10.0 * 220.0 + 50.0 * 7.0);
    assert_eq!(quote.markers.len(), 4);
    assert_eq!(quote.markers[2].label, "1");

    assert_eq!(maps.geocoded(), vec!["Pasig"]);
    assert_eq!(maps.directions_requests()[0].waypoints.len(), 2);
}

#[test]
fn origin_geocoding_failure_aborts_before_routing() {
    use super::fake::FakeMaps;
    use crate::external::GeocodeStatus;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new()
        .with_geocode_status("Atlantis", GeocodeStatus::OverQueryLimit)
        .with_legs(&[(1_000, 60)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let err = block_on(engine.quote_route(request("Atlantis", "Makati", "10", &[]))).unwrap_err();

    assert_eq!(err.code, 121);
    assert!(err.message.contains("origin"));
    assert_eq!(maps.geocoded(), vec!["Atlantis"]);
    assert!(maps.directions_requests().is_empty());
}

#[test]
fn failed_waypoints_are_skipped_with_a_warning() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new()
        .with_address("Pasig", 14.57, 121.08)
        .with_legs(&[(2_000, 300), (3_000, 400)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let quote = block_on(engine.quote_route(request(
        "14.5995,120.9842",
        "14.6760,121.0437",
        "10",
        &["Nowhere Special", "", "Pasig"],
    )))
    .unwrap();

    assert_eq!(quote.waypoints.len(), 1);
    assert_eq!(quote.warnings.len(), 1);
    assert!(quote.warnings[0].contains("waypoint 1"));
    assert_eq!(maps.geocoded(), vec!["Nowhere Special", "Pasig"]);
    assert_eq!(maps.directions_requests()[0].waypoints.len(), 1);
}

#[test]
fn directions_failure_maps_to_a_routing_error() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_directions_status(DirectionsStatus::MaxWaypointsExceeded);
    let engine = Engine::new(maps, Pricing::default());

    let err = block_on(engine.quote_route(request("1,1", "2,2", "10", &[]))).unwrap_err();

    assert_eq!(err, directions_error(&DirectionsStatus::MaxWaypointsExceeded));
    assert!(err.is_directions_error());
}

#[test]
fn deserialized_requests_never_carry_more_than_three_waypoints() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new()
        .with_address("a", 14.1, 121.1)
        .with_address("b", 14.2, 121.2)
        .with_address("c", 14.3, 121.3)
        .with_address("d", 14.4, 121.4)
        .with_address("e", 14.5, 121.5)
        .with_legs(&[(1_000, 60), (1_000, 60), (1_000, 60), (1_000, 60)]);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let request: RouteRequest = serde_json::from_value(serde_json::json!({
        "origin": "14.5995,120.9842",
        "destination": "14.6760,121.0437",
        "weight": "10",
        "waypoints": ["a", "b", "c", "d", "e"],
    }))
    .unwrap();
    assert_eq!(request.waypoints.len(), 3);

    block_on(engine.quote_route(request)).unwrap();

    assert_eq!(maps.geocoded(), vec!["a", "b", "c"]);
    assert_eq!(maps.directions_requests()[0].waypoints.len(), 3);
}
