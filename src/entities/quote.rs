use chrono::{DateTime, Utc};
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, FeeBreakdown, Location, Route};
use crate::presentation::{format_distance, format_duration, format_money};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: String,
    pub position: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    pub token: Uuid,
    pub quoted_at: DateTime<Utc>,
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Location>,
    pub waypoint_order: Vec<usize>,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub distance_text: String,
    pub duration_text: String,
    pub total_text: String,
    pub fees: FeeBreakdown,
    pub markers: Vec<Marker>,
    /// Route geometry in `(lng, lat)` order, ready for a map layer.
    pub path: LineString<f64>,
    pub warnings: Vec<String>,
}

impl RouteQuote {
    pub fn new(
        origin: Location,
        destination: Location,
        waypoints: Vec<Location>,
        route: Route,
        fees: FeeBreakdown,
        warnings: Vec<String>,
    ) -> Self {
        let markers = markers(&origin, &destination, &waypoints);

        Self {
            token: Uuid::new_v4(),
            quoted_at: Utc::now(),
            distance_meters: route.distance_meters(),
            duration_seconds: route.duration_seconds(),
            distance_text: format_distance(route.distance_km()),
            duration_text: format_duration(route.duration_seconds()),
            total_text: format_money(fees.total),
            path: route.line_string(),
            waypoint_order: route.waypoint_order,
            origin,
            destination,
            waypoints,
            fees,
            markers,
            warnings,
        }
    }
}

fn markers(origin: &Location, destination: &Location, waypoints: &[Location]) -> Vec<Marker> {
    let mut markers = vec![
        Marker {
            label: "A".into(),
            position: origin.coordinates,
        },
        Marker {
            label: "B".into(),
            position: destination.coordinates,
        },
    ];

    markers.extend(waypoints.iter().enumerate().map(|(i, waypoint)| Marker {
        label: (i + 1).to_string(),
        position: waypoint.coordinates,
    }));

    markers
}
