//! HTTP prediction service
//!
//! A small axum app: `POST /predict` classifies an article with every
//! persisted model, `GET /health` reports liveness. CORS is wide open so
//! browser frontends on other origins can call the API directly.

mod handlers;
mod state;

pub use handlers::{ErrorResponse, HealthResponse, PredictRequest, PredictResponse};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router over the shared artifact state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
