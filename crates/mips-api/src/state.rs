//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the gateway client, the settings store and the callback registrar.

use mips_core::{
    CallbackRegistrar, FileSettingsStore, GatewayUrls, MipsResult, SharedGatewayClient,
    SharedSettingsStore, SiteAddress,
};
use mips_gateway::MipsHttpClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public origin of this deployment; the IMN callback is always built from it
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// TOML file holding the MIPS settings record
    pub settings_path: PathBuf,
    /// Directory with the compiled wasm bundle, served under `/assets`
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            settings_path: std::env::var("MIPS_SETTINGS_PATH")
                .unwrap_or_else(|_| "config/mips_settings.toml".to_string())
                .into(),
            assets_dir: std::env::var("MIPS_ASSETS_DIR")
                .unwrap_or_else(|_| "crates/mips-wasm/pkg".to_string())
                .into(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Configured public origin
    pub fn site_address(&self) -> MipsResult<SiteAddress> {
        SiteAddress::parse(&self.base_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Outbound MIPS API
    pub gateway: SharedGatewayClient,
    /// Settings record owned by the host
    pub settings: SharedSettingsStore,
    /// IMN callback registrar (holds the in-flight guard)
    pub registrar: Arc<CallbackRegistrar>,
    /// Gateway base URLs
    pub urls: GatewayUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the MIPS HTTP client and a TOML settings file
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let client = MipsHttpClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize MIPS client: {}", e))?;
        let urls = client.urls().clone();

        let store = Arc::new(FileSettingsStore::new(&config.settings_path));
        tracing::info!("Using MIPS settings at {}", config.settings_path.display());

        Ok(Self::from_parts(config, Arc::new(client), store, urls))
    }

    /// Assemble state from explicit parts (for testing)
    pub fn from_parts(
        config: AppConfig,
        gateway: SharedGatewayClient,
        settings: SharedSettingsStore,
        urls: GatewayUrls,
    ) -> Self {
        let registrar = Arc::new(CallbackRegistrar::new(
            gateway.clone(),
            settings.clone(),
            urls.clone(),
        ));

        Self {
            gateway,
            settings,
            registrar,
            urls,
            config,
        }
    }
}
