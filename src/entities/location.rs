use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// A location as typed by the user: either a literal coordinate pair or a
/// free-text address that still needs geocoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationInput {
    Coordinates(Coordinates),
    Address { text: String },
}

impl LocationInput {
    pub fn parse(input: &str) -> Self {
        match Coordinates::parse_literal(input) {
            Some(coordinates) => Self::Coordinates(coordinates),
            None => Self::Address {
                text: input.trim().to_string(),
            },
        }
    }
}

/// A location after resolution, keeping what the user typed for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub input: String,
    pub coordinates: Coordinates,
    pub formatted_address: Option<String>,
}

impl Location {
    pub fn new(input: String, coordinates: Coordinates, formatted_address: Option<String>) -> Self {
        Self {
            input,
            coordinates,
            formatted_address,
        }
    }

    pub fn description(&self) -> String {
        match &self.formatted_address {
            Some(address) => address.clone(),
            None => self.coordinates.into(),
        }
    }
}

#[test]
fn literal_pairs_skip_geocoding() {
    let input = LocationInput::parse("14.5995,120.9842");
    assert!(matches!(input, LocationInput::Coordinates(_)));
}

#[test]
fn everything_else_is_an_address() {
    for text in ["SM Megamall", "1,2,3", "95,120", "Ortigas, Pasig", "north, south"] {
        let input = LocationInput::parse(text);
        assert!(
            matches!(input, LocationInput::Address { .. }),
            "{} should be geocoded",
            text
        );
    }
}
