use super::{
    errors::AppError,
    handlers::{calculate, health},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router,
    http::Uri,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let prefix = state.config.route_prefix.clone();

    Router::new()
        // Health
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        // Calculator
        .route(&prefix, post(calculate::run))
        .route(&format!("{}/", prefix), post(calculate::run))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
