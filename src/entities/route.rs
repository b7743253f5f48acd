use geo_types::LineString;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub path: Vec<Coordinates>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
    /// Visiting order of the waypoints chosen by the provider.
    pub waypoint_order: Vec<usize>,
}

impl Route {
    pub fn new(legs: Vec<RouteLeg>, waypoint_order: Vec<usize>) -> Self {
        Self {
            legs,
            waypoint_order,
        }
    }

    pub fn distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters() as f64 / 1000.0
    }

    /// Concatenated path of every leg, without repeating the shared stop
    /// between consecutive legs.
    pub fn path(&self) -> Vec<Coordinates> {
        let mut path: Vec<Coordinates> = Vec::new();

        for leg in &self.legs {
            for point in &leg.path {
                if path.last() != Some(point) {
                    path.push(*point);
                }
            }
        }

        path
    }

    pub fn line_string(&self) -> LineString<f64> {
        self.path().into_iter().map(geo_types::Coord::from).collect()
    }
}

#[cfg(test)]
fn leg(distance_meters: u64, duration_seconds: u64, path: &[(f64, f64)]) -> RouteLeg {
    RouteLeg {
        distance_meters,
        duration_seconds,
        path: path.iter().map(|&(lat, lng)| Coordinates { lat, lng }).collect(),
    }
}

#[test]
fn sums_every_leg() {
    let route = Route::new(
        vec![
            leg(4_200, 600, &[(0.0, 0.0), (0.0, 1.0)]),
            leg(5_800, 900, &[(0.0, 1.0), (1.0, 1.0)]),
        ],
        vec![0],
    );

    assert_eq!(route.distance_meters(), 10_000);
    assert_eq!(route.duration_seconds(), 1_500);
    assert_eq!(route.distance_km(), 10.0);
}

#[test]
fn path_joins_legs_at_shared_stops() {
    let route = Route::new(
        vec![
            leg(1, 1, &[(0.0, 0.0), (0.0, 1.0)]),
            leg(1, 1, &[(0.0, 1.0), (1.0, 1.0)]),
        ],
        vec![],
    );

    assert_eq!(route.path().len(), 3);
    assert_eq!(route.line_string().0.len(), 3);
}

#[test]
fn empty_route_has_zero_distance() {
    let route = Route::new(vec![], vec![]);
    assert_eq!(route.distance_km(), 0.0);
    assert!(route.path().is_empty());
}
