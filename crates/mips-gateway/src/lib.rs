//! # mips-gateway
//!
//! HTTP client for the MIPS merchant API.
//!
//! Two calls are supported:
//!
//! 1. **IMN callback registration** - `POST {base}/IMN_CALLBACK_ARCH`
//!    - JSON body `{"crypted_callback": "<url>"}`
//!    - HTTP Basic auth from the settings record
//!    - Accepted only on a bare `success` body
//!
//! 2. **Payment request** - `POST {base}/create_payment_request`
//!    - Produces the values injected into the checkout-result page
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mips_gateway::MipsHttpClient;
//! use mips_core::{CallbackRegistrar, FileSettingsStore, SiteAddress};
//!
//! let client = MipsHttpClient::from_env()?;
//! let urls = client.urls().clone();
//! let registrar = CallbackRegistrar::new(
//!     Arc::new(client),
//!     Arc::new(FileSettingsStore::new("mips_settings.toml")),
//!     urls,
//! );
//!
//! registrar.register(&SiteAddress::parse("https://erp.example.mu")?).await?;
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod payment;

// Re-exports
pub use callback::{evaluate_registration_response, CallbackRegistration, REGISTRATION_ACCEPTED};
pub use client::MipsHttpClient;
pub use config::MipsConfig;
pub use payment::{build_payment_payload, interpret_payment_response};
