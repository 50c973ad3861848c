use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, torrents};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Torrent search
        .route("/torrents/search", get(torrents::search_by_query))
        .route("/torrents/search/{id}", get(torrents::search_by_id))
        .route("/torrents/movies", get(torrents::search_movies))
        .route("/torrents/series", get(torrents::search_series))
        .route("/torrents/anime", get(torrents::search_anime))
        .route("/torrents/seasons", get(torrents::available_seasons))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
