//! # mips-api
//!
//! HTTP API layer for mips-connect-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The "Register IMN Callback" admin action
//! - The `/mips_checkout` result page consumed by the wasm redirector
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/settings` | Settings (secrets omitted) |
//! | POST | `/api/v1/settings/register-callback` | Register IMN callback |
//! | GET | `/api/v1/payment-url` | Checkout URL for query params |
//! | POST | `/api/v1/payment-requests` | Create payment request(s) |
//! | GET | `/mips_checkout` | Checkout-result page |

pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
