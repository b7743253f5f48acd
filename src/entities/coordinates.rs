use geo_types::{coord, Coord};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_coordinates_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        if !Self::in_range(lat, lng) {
            return Err(invalid_coordinates_error(lat, lng));
        }

        Ok(Self { lat, lng })
    }

    pub fn in_range(lat: f64, lng: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
    }

    /// Parses a literal `"lat,lng"` pair. Returns `None` unless the input has
    /// exactly one comma and both tokens are in-range numbers.
    pub fn parse_literal(input: &str) -> Option<Self> {
        let mut parts = input.split(',');
        let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
            _ => return None,
        };

        let lat: f64 = lat.parse().ok()?;
        let lng: f64 = lng.parse().ok()?;

        Self::new(lat, lng).ok()
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        coord! { x: coordinates.lng, y: coordinates.lat }
    }
}

#[test]
fn parses_literal_pairs() {
    let parsed = Coordinates::parse_literal("14.5995,120.9842").unwrap();
    assert_eq!(parsed, Coordinates { lat: 14.5995, lng: 120.9842 });

    let padded = Coordinates::parse_literal("  14.6760 ,  121.0437 ").unwrap();
    assert_eq!(padded, Coordinates { lat: 14.676, lng: 121.0437 });
}

#[test]
fn rejects_anything_but_one_comma_and_two_numbers() {
    assert!(Coordinates::parse_literal("Makati City").is_none());
    assert!(Coordinates::parse_literal("Makati, Metro Manila").is_none());
    assert!(Coordinates::parse_literal("1,2,3").is_none());
    assert!(Coordinates::parse_literal("14.5,").is_none());
    assert!(Coordinates::parse_literal("").is_none());
}

#[test]
fn rejects_out_of_range_pairs() {
    assert!(Coordinates::parse_literal("91,0").is_none());
    assert!(Coordinates::parse_literal("0,-180.5").is_none());
    assert!(Coordinates::new(-90.0, 180.0).is_ok());
    assert_eq!(Coordinates::new(100.0, 0.0).unwrap_err().code, 103);
}

#[test]
fn converts_to_geometry_in_lng_lat_order() {
    let point: Coord<f64> = Coordinates { lat: 14.5, lng: 121.0 }.into();
    assert_eq!(point.x, 121.0);
    assert_eq!(point.y, 14.5);

    let query: String = Coordinates { lat: 14.5, lng: 121.0 }.into();
    assert_eq!(query, "14.5,121");
}
