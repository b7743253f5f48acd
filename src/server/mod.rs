mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::post, Router};
use tower_http::cors::CorsLayer;

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{cost, routes};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/calculate-cost", post(cost::calculate))
        .route("/routes/quote", post(routes::quote))
        .layer(Extension(api))
        .layer(CorsLayer::permissive())
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    let server = axum::Server::try_bind(&addr).map_err(unexpected_error)?;

    tracing::info!("listening on {}", addr);

    server
        .serve(app.into_make_service())
        .await
        .map_err(unexpected_error)
}
