//! The web module for handling the Axum API.
//! This file declares the other files in this directory as sub-modules.

pub mod api;
pub mod models;

use std::path::Path;

use axum::Router;
use axum::http::{HeaderValue, header::CACHE_CONTROL};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use api::AppState;

/// Static assets are cached for one year.
const STATIC_CACHE_CONTROL: &str = "public, max-age=31557600";

/// Full application: API routes, permissive CORS, request tracing and an
/// optional static asset directory answering every unmatched path.
pub fn app(api: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = api::create_router(api);
    if let Some(dir) = static_dir {
        tracing::info!("Serving static files from {}", dir.display());
        let assets = SetResponseHeader::overriding(
            ServeDir::new(dir),
            CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        );
        router = router.fallback_service(assets);
    }
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process exits.
pub async fn serve(config: &ServerConfig, api: AppState) -> std::io::Result<()> {
    let app = app(api, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("App is running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
