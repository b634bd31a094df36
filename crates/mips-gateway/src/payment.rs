//! # MIPS Payment Requests
//!
//! Wire types for `POST {base}/create_payment_request` and the mapping from
//! its answer to the values injected into the checkout-result page.

use chrono::{Duration, NaiveDate};
use mips_core::{CheckoutRenderContext, MipsError, MipsResult, MipsSettings, PaymentRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the request payload. `today` anchors the expiry dates.
pub fn build_payment_payload<'a>(
    settings: &'a MipsSettings,
    request: &'a PaymentRequest,
    today: NaiveDate,
) -> MipsPaymentPayload<'a> {
    let expiry = (today + Duration::days(1)).format(DATE_FORMAT).to_string();
    let amount = request.amount_major();

    MipsPaymentPayload {
        authentify: Authentify {
            id_merchant: &settings.merchant_id,
            id_entity: &settings.entity_id,
            id_operator: &settings.operator_id,
            operator_password: &settings.operator_password,
        },
        request: MipsRequestDetails {
            request_mode: "simple",
            options: "warranty",
            sending_mode: "mail",
            request_title: &request.title,
            exp_date: expiry.clone(),
            client_details: MipsClientDetails {
                first_name: &request.client.first_name,
                last_name: &request.client.last_name,
                client_email: &request.client.email,
                phone_number: &request.client.phone_number,
            },
            max_amount_total: amount,
            max_amount_per_claim: 0,
            max_frequency: 0,
            max_date: expiry.clone(),
            deposit_amount: amount,
            balance_pattern: vec![BalancePattern {
                balance_number: 1,
                balance_mode: "auto",
                condition: format!("\"Upon request\" or {}", expiry),
            }],
        },
        initial_payment: InitialPayment {
            id_order: &request.order_id,
            currency: &request.currency,
            amount,
        },
    }
}

/// Map a gateway answer onto the checkout page context.
///
/// A non-200 status is not an error here: the page still renders and the
/// redirector reports the failure to the shopper.
pub fn interpret_payment_response(status: u16, body: &str) -> MipsResult<CheckoutRenderContext> {
    if status != 200 {
        error!("MIPS payment request failed: status={}, body={}", status, body);
        return Ok(CheckoutRenderContext::failed(Some(status)));
    }

    let response: MipsPaymentResponse = serde_json::from_str(body).map_err(|e| {
        MipsError::Serialization(format!("Failed to parse MIPS response: {}", e))
    })?;

    match response.operation_status.as_str() {
        "success" => {
            let link = response.payment_link.ok_or_else(|| {
                MipsError::Serialization("MIPS success response has no payment_link".to_string())
            })?;
            Ok(CheckoutRenderContext {
                qr_code: link.qr_code,
                ..CheckoutRenderContext::success(link.url)
            })
        }
        "error" => {
            let detail = response.operation_status_details.map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
            warn!("MIPS rejected payment request: {:?}", detail);
            Ok(CheckoutRenderContext::gateway_error(status, detail))
        }
        other => {
            warn!("Unexpected MIPS operation_status: {}", other);
            Ok(CheckoutRenderContext {
                fetch_code: Some(status),
                status: other.to_string(),
                ..Default::default()
            })
        }
    }
}

// =============================================================================
// MIPS API Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MipsPaymentPayload<'a> {
    authentify: Authentify<'a>,
    request: MipsRequestDetails<'a>,
    initial_payment: InitialPayment<'a>,
}

#[derive(Debug, Serialize)]
struct Authentify<'a> {
    id_merchant: &'a str,
    id_entity: &'a str,
    id_operator: &'a str,
    operator_password: &'a str,
}

#[derive(Debug, Serialize)]
struct MipsRequestDetails<'a> {
    request_mode: &'static str,
    options: &'static str,
    sending_mode: &'static str,
    request_title: &'a str,
    exp_date: String,
    client_details: MipsClientDetails<'a>,
    max_amount_total: f64,
    max_amount_per_claim: i64,
    max_frequency: i64,
    max_date: String,
    deposit_amount: f64,
    balance_pattern: Vec<BalancePattern>,
}

#[derive(Debug, Serialize)]
struct MipsClientDetails<'a> {
    first_name: &'a str,
    last_name: &'a str,
    client_email: &'a str,
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
struct BalancePattern {
    balance_number: u32,
    balance_mode: &'static str,
    condition: String,
}

#[derive(Debug, Serialize)]
struct InitialPayment<'a> {
    id_order: &'a str,
    currency: &'a str,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct MipsPaymentResponse {
    operation_status: String,
    #[serde(default)]
    operation_status_details: Option<serde_json::Value>,
    #[serde(default)]
    payment_link: Option<MipsPaymentLink>,
}

#[derive(Debug, Deserialize)]
struct MipsPaymentLink {
    url: String,
    #[serde(default)]
    qr_code: Option<String>,
}
