use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{CostAPI, CostRequest},
    entities::FeeBreakdown,
    error::{
        distance_unavailable_error, invalid_input_error, missing_field_error, upstream_error,
        Error,
    },
    external::DirectionsStatus,
};

#[async_trait]
impl CostAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn calculate_cost(&self, request: CostRequest) -> Result<FeeBreakdown, Error> {
        if request.origin.trim().is_empty() {
            return Err(missing_field_error("origin"));
        }
        if request.destination.trim().is_empty() {
            return Err(missing_field_error("destination"));
        }

        let pricing = match request.rate_per_km {
            Some(rate) => self.pricing.with_rate_per_km(rate),
            None => self.pricing,
        };
        pricing.validate()?;

        let weight_kg = request.weight_kg.unwrap_or(0.0);
        if !(weight_kg.is_finite() && weight_kg >= 0.0) {
            return Err(invalid_input_error("Weight must be a non-negative number."));
        }

        let data = self
            .maps
            .distance_matrix(&request.origin, &request.destination)
            .await?;

        if data.status != DirectionsStatus::Ok {
            return Err(upstream_error(format!("distance matrix status {}", data.status)));
        }

        let element = data
            .first_element()
            .ok_or_else(|| upstream_error("distance matrix returned no elements"))?;

        if element.status != DirectionsStatus::Ok {
            tracing::warn!(status = %element.status, "distance unavailable");
            return Err(distance_unavailable_error());
        }

        let distance = element
            .distance
            .ok_or_else(|| upstream_error("distance matrix element has no distance"))?;

        let distance_km = distance.value as f64 / 1000.0;
        let fees = pricing.quote(distance_km, weight_kg)?;

        tracing::info!(
            distance_km = fees.distance_km,
            distance_fee = fees.distance_fee,
            total = fees.total,
            "computed cost"
        );

        Ok(fees)
    }
}

#[cfg(test)]
fn request(origin: &str, destination: &str) -> CostRequest {
    CostRequest {
        origin: origin.into(),
        destination: destination.into(),
        rate_per_km: None,
        weight_kg: None,
    }
}

#[test]
fn converts_meters_and_applies_the_default_rate() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_matrix_distance(14_700);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let fees = block_on(engine.calculate_cost(request("Manila", "Quezon City"))).unwrap();

    assert_eq!(format!("{:.2}", fees.distance_km), "14.70");
    assert_eq!(format!("{:.2}", fees.distance_fee), "3234.00");
    assert_eq!(fees.total, fees.distance_fee);
    assert_eq!(maps.matrix_calls(), 1);
}

#[test]
fn rate_override_and_weight_are_applied() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let engine = Engine::new(FakeMaps::new().with_matrix_distance(10_000), Pricing::default());

    let fees = block_on(engine.calculate_cost(CostRequest {
        rate_per_km: Some(100.0),
        weight_kg: Some(50.0),
        ..request("a", "b")
    }))
    .unwrap();

    assert_eq!(fees.distance_fee, 1000.0);
    assert_eq!(fees.weight_fee, 350.0);
    assert_eq!(fees.total, 1350.0);
}

#[test]
fn non_ok_element_is_a_distance_unavailable_error() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_matrix_element_status(DirectionsStatus::NotFound);
    let engine = Engine::new(maps, Pricing::default());

    let err = block_on(engine.calculate_cost(request("nowhere", "elsewhere"))).unwrap_err();

    assert_eq!(err, distance_unavailable_error());
}

#[test]
fn non_ok_response_status_is_an_internal_error() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_matrix_status(DirectionsStatus::RequestDenied);
    let engine = Engine::new(maps, Pricing::default());

    let err = block_on(engine.calculate_cost(request("a", "b"))).unwrap_err();

    assert!(err.is_internal());
}

#[test]
fn negative_overrides_are_rejected_before_calling_the_provider() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_matrix_distance(1_000);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let err = block_on(engine.calculate_cost(CostRequest {
        rate_per_km: Some(-1.0),
        ..request("a", "b")
    }))
    .unwrap_err();
    assert_eq!(err.code, 100);

    let err = block_on(engine.calculate_cost(CostRequest {
        weight_kg: Some(-1.0),
        ..request("a", "b")
    }))
    .unwrap_err();
    assert_eq!(err.code, 100);

    assert_eq!(maps.matrix_calls(), 0);
}

#[test]
fn blank_locations_are_rejected_before_calling_the_provider() {
    use super::fake::FakeMaps;
    use crate::entities::Pricing;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_matrix_distance(1_000);
    let engine = Engine::new(maps.clone(), Pricing::default());

    let err = block_on(engine.calculate_cost(request("", "b"))).unwrap_err();
    assert_eq!(err, missing_field_error("origin"));

    let err = block_on(engine.calculate_cost(request("a", "  "))).unwrap_err();
    assert_eq!(err, missing_field_error("destination"));

    assert_eq!(maps.matrix_calls(), 0);
}
