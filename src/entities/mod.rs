mod coordinates;
mod location;
mod pricing;
mod quote;
mod route;
mod waypoints;

pub use coordinates::Coordinates;
pub use location::{Location, LocationInput};
pub use pricing::{FeeBreakdown, Pricing, BLOCK_SIZE_KG, FEE_PER_BLOCK, RATE_PER_KM};
pub use quote::{Marker, RouteQuote};
pub use route::{Route, RouteLeg};
pub use waypoints::{Waypoints, MAX_WAYPOINTS};
