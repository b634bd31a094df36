//! # MIPS Connect
//!
//! MIPS payment gateway integration service.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: override gateway endpoints
//! export MIPS_SANDBOX_URL=https://stoplight.io/mocks/mips/merchant-api/36020489
//! export MIPS_PRODUCTION_URL=https://api.mips.mu/api
//! export MIPS_SETTINGS_PATH=config/mips_settings.toml
//! export BASE_URL=https://erp.example.mu
//!
//! # Run the server
//! mips-connect
//! ```

use mips_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    let settings = state.settings.load().await?;
    info!("Environment: {}", state.config.environment);
    info!(
        "MIPS gateway: {} ({})",
        settings.environment(),
        state.urls.base_url(settings.environment())
    );
    info!("IMN callback registered: {}", settings.is_callback_registered);

    let app = routes::create_router(state);

    info!("MIPS Connect v{} starting on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Register callback: POST http://{}/api/v1/settings/register-callback", addr);
        info!("Checkout page: GET http://{}/mips_checkout?amount=&order_id=", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
