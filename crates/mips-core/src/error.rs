//! # MIPS Error Types
//!
//! Typed error handling for the MIPS integration.
//! All gateway and settings operations return `Result<T, MipsError>`.

use thiserror::Error;

/// Core error type for all MIPS operations
#[derive(Debug, Error)]
pub enum MipsError {
    /// Configuration errors (missing env vars, bad base URLs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Currency not supported by MIPS
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Transport failure talking to the gateway (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered, but not with the expected success shape
    #[error("Gateway rejected request (HTTP {status}): {body}")]
    GatewayRejected { status: u16, body: String },

    /// A callback registration is already running
    #[error("Callback registration already in progress")]
    RegistrationInFlight,

    /// Settings record could not be read or persisted
    #[error("Settings storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MipsError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MipsError::Configuration(_) => 500,
            MipsError::InvalidRequest(_) => 400,
            MipsError::UnsupportedCurrency { .. } => 400,
            MipsError::Network(_) => 503,
            MipsError::GatewayRejected { .. } => 502,
            MipsError::RegistrationInFlight => 409,
            MipsError::Storage(_) => 500,
            MipsError::Serialization(_) => 500,
        }
    }

    /// Short machine-readable kind, used in API error bodies and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            MipsError::Configuration(_) => "configuration",
            MipsError::InvalidRequest(_) => "invalid_request",
            MipsError::UnsupportedCurrency { .. } => "unsupported_currency",
            MipsError::Network(_) => "network",
            MipsError::GatewayRejected { .. } => "gateway_rejected",
            MipsError::RegistrationInFlight => "registration_in_flight",
            MipsError::Storage(_) => "storage",
            MipsError::Serialization(_) => "serialization",
        }
    }
}

/// Result type alias for MIPS operations
pub type MipsResult<T> = Result<T, MipsError>;
