mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::region::{RegionResolver, RegionStore};
use crate::registry::ConnectionRegistry;

pub fn build_router(store: Arc<RegionStore>) -> Router {
    let state = Arc::new(AppState {
        resolver: RegionResolver::new(store),
        registry: Arc::new(ConnectionRegistry::new()),
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/resolve", post(handlers::resolve))
        .route("/api/divisions", get(handlers::division_list))
        .route("/api/divisions/{id}/districts", get(handlers::district_list))
        .route("/api/districts/{id}/upazilas", get(handlers::upazila_list))
        .route("/api/upazilas/{id}", get(handlers::upazila_detail))
        .route("/api/stats", get(handlers::stats))
        .route("/api/subscribe/{user}", get(handlers::subscribe))
        .route("/api/notify", post(handlers::notify))
        .route("/api/presence/{user}", get(handlers::presence))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, store: Arc<RegionStore>) {
    let app = build_router(store);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Rokto server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
