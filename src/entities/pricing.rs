use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

pub const RATE_PER_KM: f64 = 220.0;
pub const FEE_PER_BLOCK: f64 = 350.0;
pub const BLOCK_SIZE_KG: f64 = 50.0;

/// Tariff applied to every quote. The block fee is prorated per kilogram
/// rather than charged per whole block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub rate_per_km: f64,
    pub fee_per_block: f64,
    pub block_size_kg: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            rate_per_km: RATE_PER_KM,
            fee_per_block: FEE_PER_BLOCK,
            block_size_kg: BLOCK_SIZE_KG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub distance_km: f64,
    pub weight_kg: f64,
    pub rate_per_km: f64,
    pub fee_per_kg: f64,
    pub distance_fee: f64,
    pub weight_fee: f64,
    pub total: f64,
}

impl Pricing {
    pub fn with_rate_per_km(self, rate_per_km: f64) -> Self {
        Self {
            rate_per_km,
            ..self
        }
    }

    pub fn fee_per_kg(&self) -> f64 {
        self.fee_per_block / self.block_size_kg
    }

    pub fn validate(&self) -> Result<(), Error> {
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !non_negative(self.rate_per_km) || !non_negative(self.fee_per_block) {
            return Err(invalid_input_error("Rates must be non-negative numbers."));
        }
        if !(self.block_size_kg.is_finite() && self.block_size_kg > 0.0) {
            return Err(invalid_input_error("Block size must be a positive number."));
        }

        Ok(())
    }

    pub fn quote(&self, distance_km: f64, weight_kg: f64) -> Result<FeeBreakdown, Error> {
        self.validate()?;

        if !(distance_km.is_finite() && distance_km >= 0.0) {
            return Err(invalid_input_error("Distance must be a non-negative number."));
        }
        if !(weight_kg.is_finite() && weight_kg >= 0.0) {
            return Err(invalid_input_error("Weight must be a non-negative number."));
        }

        let fee_per_kg = self.fee_per_kg();
        let distance_fee = distance_km * self.rate_per_km;
        let weight_fee = weight_kg * fee_per_kg;

        Ok(FeeBreakdown {
            distance_km,
            weight_kg,
            rate_per_km: self.rate_per_km,
            fee_per_kg,
            distance_fee,
            weight_fee,
            total: distance_fee + weight_fee,
        })
    }
}

#[test]
fn default_tariff_is_220_per_km_and_7_per_kg() {
    let pricing = Pricing::default();
    assert_eq!(pricing.rate_per_km, 220.0);
    assert_eq!(pricing.fee_per_kg(), 7.0);
}

#[test]
fn total_is_distance_times_rate_plus_weight_times_seven() {
    let pricing = Pricing::default();

    for &(weight, distance) in &[
        (0.0, 0.0),
        (100.0, 10.0),
        (12.5, 3.3),
        (0.1, 1234.567),
        (999.99, 0.001),
    ] {
        let fees = pricing.quote(distance, weight).unwrap();
        assert_eq!(fees.total, distance * 220.0 + weight * 7.0);
        assert_eq!(fees.total, fees.distance_fee + fees.weight_fee);
    }
}

#[test]
fn scenario_100kg_over_10km() {
    let fees = Pricing::default().quote(10.0, 100.0).unwrap();

    assert_eq!(format!("{:.2}", fees.weight_fee), "700.00");
    assert_eq!(format!("{:.2}", fees.distance_fee), "2200.00");
    assert_eq!(format!("{:.2}", fees.total), "2900.00");
}

#[test]
fn two_decimal_total_round_trips_within_half_a_cent() {
    let pricing = Pricing::default();

    for &(weight, distance) in &[(1.234, 5.678), (73.3, 14.7), (0.001, 0.333)] {
        let fees = pricing.quote(distance, weight).unwrap();
        let parsed: f64 = format!("{:.2}", fees.total).parse().unwrap();
        assert!((parsed - fees.total).abs() <= 0.005);
    }
}

#[test]
fn rejects_negative_inputs() {
    let pricing = Pricing::default();
    assert!(pricing.quote(-1.0, 10.0).is_err());
    assert!(pricing.quote(1.0, -10.0).is_err());
    assert!(pricing.with_rate_per_km(-5.0).quote(1.0, 1.0).is_err());
    assert!(pricing.quote(f64::NAN, 1.0).is_err());
}

#[test]
fn rate_override_only_touches_distance_fee() {
    let fees = Pricing::default()
        .with_rate_per_km(100.0)
        .quote(14.7, 0.0)
        .unwrap();

    assert_eq!(format!("{:.2}", fees.distance_fee), "1470.00");
    assert_eq!(fees.total, fees.distance_fee);
}
