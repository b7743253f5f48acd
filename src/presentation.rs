//! Display strings for a computed quote.

use crate::entities::{FeeBreakdown, RouteQuote};

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn format_distance(distance_km: f64) -> String {
    format!("{:.1} km", distance_km)
}

/// Renders seconds as hours and minutes, e.g. `"1 hour 5 mins"` or `"22 mins"`.
pub fn format_duration(duration_seconds: u64) -> String {
    let total_minutes = (duration_seconds + 30) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (hours, minutes) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "min")),
    }
}

pub fn breakdown_lines(fees: &FeeBreakdown) -> Vec<String> {
    vec![
        format!(
            "Distance fee: {} km x {}/km = {}",
            format_money(fees.distance_km),
            format_money(fees.rate_per_km),
            format_money(fees.distance_fee)
        ),
        format!(
            "Weight fee: {} kg x {}/kg = {}",
            format_money(fees.weight_kg),
            format_money(fees.fee_per_kg),
            format_money(fees.weight_fee)
        ),
        format!("Total: {}", format_money(fees.total)),
    ]
}

pub fn summary_lines(quote: &RouteQuote, with_breakdown: bool) -> Vec<String> {
    let mut lines = vec![
        format!("From: {}", quote.origin.description()),
        format!("To: {}", quote.destination.description()),
    ];
    lines.extend(
        quote
            .waypoints
            .iter()
            .map(|waypoint| format!("Via: {}", waypoint.description())),
    );
    lines.extend([
        format!("Distance: {}", quote.distance_text),
        format!("Duration: {}", quote.duration_text),
        format!("Total Cost: {}", quote.total_text),
    ]);

    if with_breakdown {
        lines.extend(breakdown_lines(&quote.fees));
    }

    lines.extend(quote.warnings.iter().map(|warning| format!("Warning: {}", warning)));

    lines
}

#[test]
fn formats_durations_like_a_trip_planner() {
    assert_eq!(format_duration(0), "0 mins");
    assert_eq!(format_duration(60), "1 min");
    assert_eq!(format_duration(22 * 60 + 10), "22 mins");
    assert_eq!(format_duration(3600), "1 hour");
    assert_eq!(format_duration(3600 + 5 * 60), "1 hour 5 mins");
    assert_eq!(format_duration(2 * 3600 + 60 + 40), "2 hours 2 mins");
}

#[test]
fn formats_money_and_distance() {
    assert_eq!(format_money(1838.4), "1838.40");
    assert_eq!(format_money(0.0), "0.00");
    assert_eq!(format_distance(6.9), "6.9 km");
    assert_eq!(format_distance(14.76), "14.8 km");
}

#[test]
fn breakdown_ends_with_total() {
    let fees = crate::entities::Pricing::default().quote(10.0, 100.0).unwrap();
    let lines = breakdown_lines(&fees);

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Distance fee: 10.00 km x 220.00/km = 2200.00");
    assert_eq!(lines[1], "Weight fee: 100.00 kg x 7.00/kg = 700.00");
    assert_eq!(lines[2], "Total: 2900.00");
}

#[test]
fn summary_names_each_stop_before_the_totals() {
    use crate::entities::{Coordinates, Location, Pricing, Route, RouteLeg};

    let start = Coordinates { lat: 14.5995, lng: 120.9842 };
    let end = Coordinates { lat: 14.676, lng: 121.0437 };
    let origin = Location::new("14.5995,120.9842".into(), start, None);
    let destination = Location::new("QC".into(), end, Some("Quezon City, Philippines".into()));
    let route = Route::new(
        vec![RouteLeg {
            distance_meters: 10_000,
            duration_seconds: 1_320,
            path: vec![start, end],
        }],
        vec![],
    );
    let fees = Pricing::default().quote(route.distance_km(), 100.0).unwrap();

    let quote = RouteQuote::new(origin, destination, vec![], route, fees, vec![]);
    let lines = summary_lines(&quote, false);

    assert_eq!(
        lines,
        vec![
            "From: 14.5995,120.9842",
            "To: Quezon City, Philippines",
            "Distance: 10.0 km",
            "Duration: 22 mins",
            "Total Cost: 2900.00",
        ]
    );
    assert_eq!(quote.path.0.len(), 2);
    assert_eq!(quote.path.0[1].x, 121.0437);
}
