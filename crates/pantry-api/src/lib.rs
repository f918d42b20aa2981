//! Pantry API /v1: REST endpoints around the expiry predictor
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;
pub mod store;
pub mod weather;

use axum::{
    middleware::from_fn,
    routing::{get, patch},
    Router,
};
use config::ApiConfig;
use state::AppState;
use tower_http::trace::TraceLayer;

pub use state::USER_HEADER;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/products", get(handlers::list_products))
        .route("/v1/storage-methods", get(handlers::list_storage_methods))
        .route(
            "/v1/inventory",
            get(handlers::list_inventory).post(handlers::create_inventory),
        )
        .route(
            "/v1/inventory/{id}",
            patch(handlers::update_inventory).delete(handlers::delete_inventory),
        )
        .route(
            "/v1/feedback",
            get(handlers::list_feedback).post(handlers::create_feedback),
        )
        .route("/v1/dashboard", get(handlers::dashboard))
        .route("/v1/insights", get(handlers::insights))
        .route(
            "/v1/profile",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route("/v1/weather", get(handlers::current_weather))
        .route("/v1/export/shelf-life", get(handlers::export_shelf_life))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(middleware::log_requests))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

    tracing::info!("Pantry API listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
