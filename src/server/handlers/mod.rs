pub mod cost;
pub mod routes;
