//! # mips-core
//!
//! Core types and traits for the MIPS payment gateway integration.
//!
//! This crate provides:
//! - `GatewayClient` trait for the outbound MIPS API
//! - `CallbackRegistrar` for IMN callback registration
//! - `MipsSettings` and the `SettingsStore` contract with the host
//! - `decide_redirect` / `run_redirector` for the checkout-result page
//! - `MipsError` for typed error handling
//!
//! The `runtime` feature (default) carries everything async; without it
//! only the pure checkout and addressing types remain, for wasm builds.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mips_core::{CallbackRegistrar, GatewayUrls, SiteAddress};
//!
//! let registrar = CallbackRegistrar::new(client, store, GatewayUrls::default());
//! let site = SiteAddress::parse("https://erp.example.mu")?;
//!
//! // Flips `is_callback_registered` only on a literal "success"
//! let receipt = registrar.register(&site).await?;
//! ```

pub mod checkout;
pub mod environment;
pub mod error;
pub mod payment;
#[cfg(feature = "runtime")]
pub mod registrar;
pub mod settings;
pub mod site;
#[cfg(feature = "runtime")]
pub mod store;

// Re-exports for convenience
pub use checkout::{
    decide_redirect, parse_status_code, run_redirector, CheckoutRenderContext, CheckoutSurface,
    RedirectDecision, RedirectInputs, RedirectState, ERROR_ELEMENT_ID,
    FETCH_FAILED_MESSAGE, LOADING_INDICATOR_CLASS, LOADING_INDICATOR_SELECTOR,
};
pub use environment::{GatewayEnvironment, GatewayUrls};
pub use error::{MipsError, MipsResult};
pub use payment::{
    parse_amount_minor, split_request_amount, validate_transaction_currency, ClientDetails,
    PaymentRequest, MAX_SPLIT_REQUESTS, SUPPORTED_CURRENCIES,
};
#[cfg(feature = "runtime")]
pub use registrar::{CallbackRegistrar, GatewayClient, RegistrationReceipt, SharedGatewayClient};
pub use settings::{Credentials, MipsSettings};
pub use site::{SiteAddress, CHECKOUT_PAGE_PATH, IMN_CALLBACK_PATH};
#[cfg(feature = "runtime")]
pub use store::{FileSettingsStore, InMemorySettingsStore, SettingsStore, SharedSettingsStore};
