//! # Routes
//!
//! Axum router configuration for the MIPS integration.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Admin API:
///   - GET  /api/v1/settings - Settings without secrets
///   - POST /api/v1/settings/register-callback - Register IMN callback
///   - GET  /api/v1/payment-url - Build a checkout URL
///   - POST /api/v1/payment-requests - Create payment request(s) for an order
///
/// - Checkout:
///   - GET /mips_checkout - Checkout-result page
///   - GET /assets/* - Compiled wasm redirector
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&state.config.assets_dir);

    let api_routes = Router::new()
        .route("/settings", get(handlers::get_settings))
        .route(
            "/settings/register-callback",
            post(handlers::register_callback),
        )
        .route("/payment-url", get(handlers::payment_url))
        .route("/payment-requests", post(handlers::create_payment_requests));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/mips_checkout", get(handlers::mips_checkout))
        .nest("/api/v1", api_routes)
        .nest_service("/assets", assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
