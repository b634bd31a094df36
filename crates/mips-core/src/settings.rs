//! # MIPS Settings
//!
//! The settings record owned by the host framework. Credentials, the
//! sandbox flag and the registration outcome all live here.

use crate::environment::GatewayEnvironment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted MIPS settings record
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MipsSettings {
    /// Name the payment gateway is registered under (e.g. "Default")
    pub payment_gateway_name: String,

    /// Talk to the sandbox environment instead of production
    pub sandbox: bool,

    /// API username (HTTP Basic)
    pub username: String,

    /// API password (HTTP Basic)
    pub password: String,

    /// Set once the gateway has accepted our IMN callback URL
    pub is_callback_registered: bool,

    /// When the callback was last accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_registered_at: Option<DateTime<Utc>>,

    pub merchant_id: String,
    pub entity_id: String,
    pub operator_id: String,
    pub operator_password: String,

    /// Largest single payment request, in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_limit: Option<i64>,
}

impl MipsSettings {
    pub fn environment(&self) -> GatewayEnvironment {
        GatewayEnvironment::from_sandbox_flag(self.sandbox)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    /// Gateway name as registered with the host (`MIPS-{name}`)
    pub fn gateway_label(&self) -> String {
        format!("MIPS-{}", self.payment_gateway_name)
    }
}

impl fmt::Debug for MipsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MipsSettings")
            .field("payment_gateway_name", &self.payment_gateway_name)
            .field("sandbox", &self.sandbox)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("is_callback_registered", &self.is_callback_registered)
            .field("callback_registered_at", &self.callback_registered_at)
            .field("merchant_id", &self.merchant_id)
            .field("entity_id", &self.entity_id)
            .field("operator_id", &self.operator_id)
            .field("operator_password", &"[redacted]")
            .field("transaction_limit", &self.transaction_limit)
            .finish()
    }
}

/// Username/password pair used for HTTP Basic auth against the gateway
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// An empty username means no Authorization header is sent
    pub fn is_present(&self) -> bool {
        !self.username.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MipsSettings {
        MipsSettings {
            payment_gateway_name: "Default".into(),
            sandbox: true,
            username: "merchant".into(),
            password: "hunter2".into(),
            operator_password: "op-secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("op-secret"));
        assert!(rendered.contains("merchant"));

        let creds = format!("{:?}", sample().credentials());
        assert!(!creds.contains("hunter2"));
    }

    #[test]
    fn test_environment_and_label() {
        let settings = sample();
        assert_eq!(settings.environment(), GatewayEnvironment::Sandbox);
        assert_eq!(settings.gateway_label(), "MIPS-Default");
        assert!(!Credentials::new("", "x").is_present());
    }
}
