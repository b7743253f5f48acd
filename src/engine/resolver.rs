use crate::{
    entities::{Location, LocationInput},
    error::{geocode_error, Error},
    external::{GeocodeStatus, MapsProvider},
};

/// Resolves user input to a location. Literal coordinates never reach the
/// provider; addresses use the first geocoding result.
#[tracing::instrument(skip(maps))]
pub async fn resolve_location(
    maps: &(dyn MapsProvider + Send + Sync),
    label: &str,
    input: &str,
) -> Result<Location, Error> {
    let address = match LocationInput::parse(input) {
        LocationInput::Coordinates(coordinates) => {
            return Ok(Location::new(input.trim().into(), coordinates, None));
        }
        LocationInput::Address { text } => text,
    };

    let data = maps.geocode(&address).await?;

    if data.status != GeocodeStatus::Ok {
        tracing::warn!(status = %data.status, "geocoding failed");
        return Err(geocode_error(label, &data.status));
    }

    let result = data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| geocode_error(label, &GeocodeStatus::ZeroResults))?;

    Ok(Location::new(
        address,
        result.geometry.location,
        result.formatted_address,
    ))
}

#[test]
fn literal_coordinates_are_never_geocoded() {
    use super::fake::FakeMaps;
    use crate::entities::Coordinates;
    use tokio_test::block_on;

    let maps = FakeMaps::new();
    let location = block_on(resolve_location(&maps, "origin", "14.5995,120.9842")).unwrap();

    assert_eq!(location.coordinates, Coordinates { lat: 14.5995, lng: 120.9842 });
    assert!(location.formatted_address.is_none());
    assert!(maps.geocoded().is_empty());
}

#[test]
fn addresses_are_always_geocoded() {
    use super::fake::FakeMaps;
    use tokio_test::block_on;

    let maps = FakeMaps::new()
        .with_address("Intramuros", 14.59, 120.97)
        .with_address("95,120", 1.0, 2.0);

    let location = block_on(resolve_location(&maps, "origin", "Intramuros")).unwrap();
    assert_eq!(location.coordinates.lat, 14.59);
    assert_eq!(location.description(), "Intramuros, Philippines");

    block_on(resolve_location(&maps, "destination", "95,120")).unwrap();

    assert_eq!(maps.geocoded(), vec!["Intramuros", "95,120"]);
}

#[test]
fn provider_status_maps_to_a_location_specific_error() {
    use super::fake::FakeMaps;
    use tokio_test::block_on;

    let maps = FakeMaps::new().with_geocode_status("Atlantis", GeocodeStatus::RequestDenied);

    let err = block_on(resolve_location(&maps, "destination", "Atlantis")).unwrap_err();
    assert_eq!(err.code, 122);
    assert!(err.message.contains("destination"));

    let err = block_on(resolve_location(&maps, "origin", "Lemuria")).unwrap_err();
    assert_eq!(err.code, 120);
}
