//! # Gateway Environments
//!
//! The MIPS API is reachable in two environments. Which one a deployment
//! talks to is decided by the `sandbox` flag on the settings record; the
//! base URLs themselves are injected configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Live MIPS merchant API
pub const DEFAULT_PRODUCTION_URL: &str = "https://api.mips.mu/api";

/// Hosted mock of the MIPS merchant API
pub const DEFAULT_SANDBOX_URL: &str = "https://stoplight.io/mocks/mips/merchant-api/36020489";

/// Path of the IMN callback registration endpoint, relative to the base URL
pub const IMN_CALLBACK_ENDPOINT: &str = "IMN_CALLBACK_ARCH";

/// Path of the payment request endpoint, relative to the base URL
pub const PAYMENT_REQUEST_ENDPOINT: &str = "create_payment_request";

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            GatewayEnvironment::Sandbox
        } else {
            GatewayEnvironment::Production
        }
    }
}

impl fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayEnvironment::Sandbox => write!(f, "SANDBOX"),
            GatewayEnvironment::Production => write!(f, "PRODUCTION"),
        }
    }
}

/// Base URLs for both gateway environments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayUrls {
    sandbox: String,
    production: String,
}

impl GatewayUrls {
    /// Trailing slashes are stripped so endpoint joins stay canonical.
    pub fn new(sandbox: impl Into<String>, production: impl Into<String>) -> Self {
        Self {
            sandbox: sandbox.into().trim_end_matches('/').to_string(),
            production: production.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL for the given environment
    pub fn base_url(&self, environment: GatewayEnvironment) -> &str {
        match environment {
            GatewayEnvironment::Sandbox => &self.sandbox,
            GatewayEnvironment::Production => &self.production,
        }
    }

    /// `{base_url}/IMN_CALLBACK_ARCH`
    pub fn callback_registration_url(&self, environment: GatewayEnvironment) -> String {
        format!("{}/{}", self.base_url(environment), IMN_CALLBACK_ENDPOINT)
    }

    /// `{base_url}/create_payment_request`
    pub fn payment_request_url(&self, environment: GatewayEnvironment) -> String {
        format!("{}/{}", self.base_url(environment), PAYMENT_REQUEST_ENDPOINT)
    }
}

impl Default for GatewayUrls {
    fn default() -> Self {
        Self::new(DEFAULT_SANDBOX_URL, DEFAULT_PRODUCTION_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_flag_selects_environment() {
        let urls = GatewayUrls::new("https://sandbox.test/api", "https://live.test/api");

        for sandbox in [true, false] {
            let env = GatewayEnvironment::from_sandbox_flag(sandbox);
            let expected = if sandbox {
                "https://sandbox.test/api"
            } else {
                "https://live.test/api"
            };
            assert_eq!(urls.base_url(env), expected);
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let urls = GatewayUrls::new("https://sandbox.test/api/", "https://live.test/api");

        assert_eq!(
            urls.callback_registration_url(GatewayEnvironment::Sandbox),
            "https://sandbox.test/api/IMN_CALLBACK_ARCH"
        );
        assert_eq!(
            urls.payment_request_url(GatewayEnvironment::Production),
            "https://live.test/api/create_payment_request"
        );
    }

    #[test]
    fn test_defaults() {
        let urls = GatewayUrls::default();
        assert_eq!(
            urls.base_url(GatewayEnvironment::Production),
            DEFAULT_PRODUCTION_URL
        );
        assert_eq!(urls.base_url(GatewayEnvironment::Sandbox), DEFAULT_SANDBOX_URL);
        assert_eq!(GatewayEnvironment::Sandbox.to_string(), "SANDBOX");
    }
}
