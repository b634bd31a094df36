//! # MIPS Configuration
//!
//! Configuration management for the MIPS client.
//! Gateway base URLs and transport settings come from environment variables;
//! credentials live on the settings record, not here.

use mips_core::environment::{DEFAULT_PRODUCTION_URL, DEFAULT_SANDBOX_URL};
use mips_core::{GatewayUrls, MipsError, MipsResult};
use std::env;
use std::time::Duration;

/// Default request timeout for gateway calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent, as the host framework identifies itself to MIPS
pub const DEFAULT_USER_AGENT: &str = "ERPNext";

/// MIPS client configuration
#[derive(Debug, Clone)]
pub struct MipsConfig {
    /// Sandbox and production base URLs
    pub urls: GatewayUrls,

    /// Timeout applied to every outbound request
    pub timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl MipsConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `MIPS_SANDBOX_URL`
    /// - `MIPS_PRODUCTION_URL`
    /// - `MIPS_HTTP_TIMEOUT_SECS`
    /// - `MIPS_USER_AGENT`
    pub fn from_env() -> MipsResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let sandbox =
            env::var("MIPS_SANDBOX_URL").unwrap_or_else(|_| DEFAULT_SANDBOX_URL.to_string());
        let production =
            env::var("MIPS_PRODUCTION_URL").unwrap_or_else(|_| DEFAULT_PRODUCTION_URL.to_string());

        validate_base_url("MIPS_SANDBOX_URL", &sandbox)?;
        validate_base_url("MIPS_PRODUCTION_URL", &production)?;

        let timeout = match env::var("MIPS_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                MipsError::Configuration(format!(
                    "MIPS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let user_agent =
            env::var("MIPS_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            urls: GatewayUrls::new(sandbox, production),
            timeout: Duration::from_secs(timeout),
            user_agent,
        })
    }

    /// Create config with explicit URLs (for testing)
    pub fn new(urls: GatewayUrls) -> Self {
        Self {
            urls,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for MipsConfig {
    fn default() -> Self {
        Self::new(GatewayUrls::default())
    }
}

fn validate_base_url(var: &str, value: &str) -> MipsResult<()> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(MipsError::Configuration(format!(
            "{} must be an http(s) URL, got '{}'",
            var, value
        )))
    }
}
