//! # MIPS HTTP Client
//!
//! reqwest implementation of [`GatewayClient`].

use crate::callback::{evaluate_registration_response, CallbackRegistration};
use crate::config::MipsConfig;
use crate::payment::{build_payment_payload, interpret_payment_response};
use async_trait::async_trait;
use chrono::Utc;
use mips_core::{
    CheckoutRenderContext, Credentials, GatewayClient, GatewayUrls, MipsError, MipsResult,
    MipsSettings, PaymentRequest,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info, instrument};

/// HTTP client for the MIPS merchant API
pub struct MipsHttpClient {
    config: MipsConfig,
    client: Client,
}

impl MipsHttpClient {
    /// Create a new client; the configured timeout applies to every call
    pub fn new(config: MipsConfig) -> MipsResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MipsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> MipsResult<Self> {
        let config = MipsConfig::from_env()?;
        Self::new(config)
    }

    pub fn urls(&self) -> &GatewayUrls {
        &self.config.urls
    }

    fn authenticated(&self, builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        if credentials.is_present() {
            builder.basic_auth(credentials.username(), Some(credentials.password()))
        } else {
            builder
        }
    }
}

#[async_trait]
impl GatewayClient for MipsHttpClient {
    #[instrument(skip(self, credentials, crypted_callback))]
    async fn register_callback(
        &self,
        endpoint: &str,
        credentials: &Credentials,
        crypted_callback: &str,
    ) -> MipsResult<()> {
        let body = CallbackRegistration { crypted_callback };

        let request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body);

        let response = self
            .authenticated(request, credentials)
            .send()
            .await
            .map_err(|e| MipsError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MipsError::Network(e.to_string()))?;

        debug!("IMN registration response: status={}, body={}", status, text);

        evaluate_registration_response(status.as_u16(), &text)
    }

    #[instrument(skip(self, settings, request), fields(order_id = %request.order_id))]
    async fn create_payment_request(
        &self,
        endpoint: &str,
        settings: &MipsSettings,
        request: &PaymentRequest,
    ) -> MipsResult<CheckoutRenderContext> {
        request.validate()?;

        let payload = build_payment_payload(settings, request, Utc::now().date_naive());

        let builder = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload);

        let response = self
            .authenticated(builder, &settings.credentials())
            .send()
            .await
            .map_err(|e| MipsError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MipsError::Network(e.to_string()))?;

        let context = interpret_payment_response(status.as_u16(), &body)?;

        info!(
            "MIPS payment request: order={}, status={:?}, operation_status={}",
            request.order_id, context.fetch_code, context.status
        );

        Ok(context)
    }
}
