//! # Request Handlers
//!
//! Axum request handlers for the MIPS integration: the admin action that
//! registers the IMN callback, the checkout-result page, and helpers.

use crate::page::render_checkout_page;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};
use mips_core::{
    parse_amount_minor, split_request_amount, CheckoutRenderContext, ClientDetails,
    GatewayEnvironment, MipsError, MipsSettings, PaymentRequest, SiteAddress,
    SUPPORTED_CURRENCIES,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Settings as exposed over the API. Secrets are never included.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub payment_gateway_name: String,
    pub gateway: String,
    pub sandbox: bool,
    pub environment: GatewayEnvironment,
    pub gateway_base_url: String,
    pub username: String,
    pub is_callback_registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_registered_at: Option<DateTime<Utc>>,
    pub merchant_id: String,
    pub entity_id: String,
    pub operator_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_limit: Option<i64>,
    pub supported_currencies: &'static [&'static str],
}

impl SettingsView {
    fn new(settings: MipsSettings, base_url: &str) -> Self {
        Self {
            gateway: settings.gateway_label(),
            environment: settings.environment(),
            gateway_base_url: base_url.to_string(),
            payment_gateway_name: settings.payment_gateway_name,
            sandbox: settings.sandbox,
            username: settings.username,
            is_callback_registered: settings.is_callback_registered,
            callback_registered_at: settings.callback_registered_at,
            merchant_id: settings.merchant_id,
            entity_id: settings.entity_id,
            operator_id: settings.operator_id,
            transaction_limit: settings.transaction_limit,
            supported_currencies: SUPPORTED_CURRENCIES,
        }
    }
}

/// Register callback response
#[derive(Debug, Serialize)]
pub struct RegisterCallbackResponse {
    pub registered: bool,
    pub attempt_id: Uuid,
    pub environment: GatewayEnvironment,
    pub callback_url: String,
    pub registered_at: DateTime<Utc>,
}

/// Query of the checkout-result page
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub amount: String,
    pub order_id: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Create payment requests for an order
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub client: ClientDetails,
}

/// One payment request per transaction-limit chunk
#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    pub order_id: String,
    pub requests: Vec<PaymentRequestResult>,
}

#[derive(Debug, Serialize)]
pub struct PaymentRequestResult {
    pub amount: i64,
    #[serde(flatten)]
    pub context: CheckoutRenderContext,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn mips_error_to_response(err: MipsError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code).with_details(err.kind());
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Site the callback is registered for.
///
/// Always the configured base URL. An `Origin` header naming any other site
/// is rejected.
fn request_site_address(state: &AppState, headers: &HeaderMap) -> Result<SiteAddress, MipsError> {
    let site = state.config.site_address()?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null");

    if let Some(origin) = origin {
        if SiteAddress::parse(origin)? != site {
            return Err(MipsError::InvalidRequest(format!(
                "Origin {} does not match site {}",
                origin, site
            )));
        }
    }

    Ok(site)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mips-connect",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Current settings, without secrets
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, ApiError> {
    let settings = state.settings.load().await.map_err(mips_error_to_response)?;
    let base_url = state.urls.base_url(settings.environment()).to_string();
    Ok(Json(SettingsView::new(settings, &base_url)))
}

/// "Register IMN Callback" admin action
#[instrument(skip(state, headers))]
pub async fn register_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RegisterCallbackResponse>, ApiError> {
    let site = request_site_address(&state, &headers).map_err(|e| {
        warn!("Refusing IMN callback registration: {}", e);
        mips_error_to_response(e)
    })?;

    let receipt = state
        .registrar
        .register(&site)
        .await
        .map_err(mips_error_to_response)?;

    Ok(Json(RegisterCallbackResponse {
        registered: true,
        attempt_id: receipt.attempt_id,
        environment: receipt.environment,
        callback_url: receipt.callback_url,
        registered_at: receipt.registered_at,
    }))
}

/// Checkout URL for the given query parameters
pub async fn payment_url(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let site = state.config.site_address().map_err(mips_error_to_response)?;
    Ok(Json(serde_json::json!({ "url": site.payment_url(&params) })))
}

/// Create one payment request per transaction-limit chunk
#[instrument(skip(state, request), fields(order_id = %request.order_id, amount = request.amount))]
pub async fn create_payment_requests(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, ApiError> {
    let settings = state.settings.load().await.map_err(mips_error_to_response)?;
    let endpoint = state.urls.payment_request_url(settings.environment());

    let template = PaymentRequest::new(&request.order_id, request.amount, request.client)
        .with_currency(request.currency.unwrap_or_else(|| "MUR".to_string()))
        .with_title(request.title.unwrap_or_else(|| "Your Purchase".to_string()));
    template.validate().map_err(mips_error_to_response)?;

    let chunks = split_request_amount(request.amount, settings.transaction_limit)
        .map_err(mips_error_to_response)?;
    info!("Creating {} MIPS payment request(s)", chunks.len());

    let mut requests = Vec::with_capacity(chunks.len());
    for amount in chunks {
        let chunk = PaymentRequest {
            amount,
            ..template.clone()
        };
        let context = state
            .gateway
            .create_payment_request(&endpoint, &settings, &chunk)
            .await
            .map_err(|e| {
                error!("Failed to create payment request: {}", e);
                mips_error_to_response(e)
            })?;
        requests.push(PaymentRequestResult { amount, context });
    }

    Ok(Json(CreatePaymentResponse {
        order_id: request.order_id,
        requests,
    }))
}

/// Checkout-result page.
///
/// Always renders; failures are reported to the shopper by the redirector.
#[instrument(skip(state, query), fields(order_id = %query.order_id))]
pub async fn mips_checkout(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> impl IntoResponse {
    let context = match checkout_context(&state, query).await {
        Ok(context) => context,
        Err(e @ (MipsError::InvalidRequest(_) | MipsError::UnsupportedCurrency { .. })) => {
            warn!("Rejected checkout request: {}", e);
            CheckoutRenderContext {
                status: "error".to_string(),
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
        Err(e) => {
            error!("MIPS payment request failed: {}", e);
            CheckoutRenderContext::failed(None)
        }
    };

    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_checkout_page(&context)),
    )
}

async fn checkout_context(
    state: &AppState,
    query: CheckoutQuery,
) -> Result<CheckoutRenderContext, MipsError> {
    let settings = state.settings.load().await?;
    let amount = parse_amount_minor(&query.amount)?;

    let client = ClientDetails {
        first_name: query.first_name,
        last_name: query.last_name,
        email: query.email,
        phone_number: query.phone,
    };
    let mut request = PaymentRequest::new(query.order_id, amount, client);
    if let Some(currency) = query.currency {
        request = request.with_currency(currency);
    }
    request.validate()?;

    let endpoint = state.urls.payment_request_url(settings.environment());
    state
        .gateway
        .create_payment_request(&endpoint, &settings, &request)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400).with_details("invalid_request");
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert_eq!(err.details.as_deref(), Some("invalid_request"));
    }

    #[test]
    fn test_mips_error_conversion() {
        let (status, _json) = mips_error_to_response(MipsError::RegistrationInFlight);
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = mips_error_to_response(MipsError::GatewayRejected {
            status: 200,
            body: "failed".into(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json.error.contains("failed"));
    }

    #[test]
    fn test_settings_view_has_no_secrets() {
        let settings = MipsSettings {
            username: "merchant".into(),
            password: "hunter2".into(),
            operator_password: "op-secret".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&SettingsView::new(settings, "https://api.mips.mu/api")).unwrap();

        assert!(json.contains("merchant"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("op-secret"));
    }
}
