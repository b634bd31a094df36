//! # Payment Requests
//!
//! Inputs for a MIPS payment request, currency rules and amount splitting.

use crate::error::{MipsError, MipsResult};
use serde::{Deserialize, Serialize};

/// Currencies MIPS accepts
pub const SUPPORTED_CURRENCIES: &[&str] = &["MUR"];

/// Reject any currency MIPS cannot settle
pub fn validate_transaction_currency(currency: &str) -> MipsResult<()> {
    if SUPPORTED_CURRENCIES.contains(&currency) {
        Ok(())
    } else {
        Err(MipsError::UnsupportedCurrency {
            currency: currency.to_string(),
        })
    }
}

/// Most payment requests a single order may be split into
pub const MAX_SPLIT_REQUESTS: i64 = 100;

/// Split an amount into chunks no larger than the transaction limit.
///
/// 480 with a limit of 150 becomes `[150, 150, 150, 30]`. Without a limit
/// (or with a non-positive one) the amount is returned whole. More than
/// [`MAX_SPLIT_REQUESTS`] chunks is rejected.
pub fn split_request_amount(amount: i64, transaction_limit: Option<i64>) -> MipsResult<Vec<i64>> {
    match transaction_limit {
        Some(limit) if limit > 0 && amount > limit => {
            let requests = amount / limit + i64::from(amount % limit != 0);
            if requests > MAX_SPLIT_REQUESTS {
                return Err(MipsError::InvalidRequest(format!(
                    "Amount {} needs {} requests at limit {} (max {})",
                    amount, requests, limit, MAX_SPLIT_REQUESTS
                )));
            }

            Ok((0..requests)
                .map(|i| {
                    if i == requests - 1 {
                        amount - limit * i
                    } else {
                        limit
                    }
                })
                .collect())
        }
        _ => Ok(vec![amount]),
    }
}

/// Parse a decimal major-unit amount ("1500.50") into minor units
pub fn parse_amount_minor(raw: &str) -> MipsResult<i64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| MipsError::InvalidRequest(format!("Invalid amount: {}", raw)))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(MipsError::InvalidRequest(format!(
            "Amount must be positive: {}",
            raw
        )));
    }

    let minor = (value * 100.0).round();
    if minor >= i64::MAX as f64 {
        return Err(MipsError::InvalidRequest(format!(
            "Amount out of range: {}",
            raw
        )));
    }

    Ok(minor as i64)
}

/// Shopper details sent with a payment request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientDetails {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// A payment request for a single order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Host order reference
    pub order_id: String,

    /// Amount in minor units
    pub amount: i64,

    pub currency: String,

    pub client: ClientDetails,

    /// Title shown to the shopper in the MIPS mail
    pub title: String,
}

impl PaymentRequest {
    pub fn new(order_id: impl Into<String>, amount: i64, client: ClientDetails) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency: "MUR".to_string(),
            client,
            title: "Your Purchase".to_string(),
        }
    }

    /// Builder: set request title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Amount in major units, as MIPS expects on the wire
    pub fn amount_major(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    pub fn validate(&self) -> MipsResult<()> {
        validate_transaction_currency(&self.currency)?;

        if self.order_id.trim().is_empty() {
            return Err(MipsError::InvalidRequest("Missing order_id".to_string()));
        }
        if self.amount <= 0 {
            return Err(MipsError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_above_limit() {
        assert_eq!(
            split_request_amount(480, Some(150)).unwrap(),
            vec![150, 150, 150, 30]
        );
        assert_eq!(split_request_amount(300, Some(150)).unwrap(), vec![150, 150]);
    }

    #[test]
    fn test_split_within_limit() {
        assert_eq!(split_request_amount(100, Some(150)).unwrap(), vec![100]);
        assert_eq!(split_request_amount(150, Some(150)).unwrap(), vec![150]);
        assert_eq!(split_request_amount(480, None).unwrap(), vec![480]);
        assert_eq!(split_request_amount(480, Some(0)).unwrap(), vec![480]);
    }

    #[test]
    fn test_split_near_i64_max_does_not_overflow() {
        let limit = i64::MAX / 2 + 1;
        let chunks = split_request_amount(i64::MAX, Some(limit)).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.iter().sum::<i64>(), i64::MAX);

        assert!(matches!(
            split_request_amount(i64::MAX, Some(150)),
            Err(MipsError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_split_rejects_too_many_requests() {
        let at_cap = split_request_amount(150 * MAX_SPLIT_REQUESTS, Some(150)).unwrap();
        assert_eq!(at_cap.len() as i64, MAX_SPLIT_REQUESTS);

        assert!(matches!(
            split_request_amount(150 * MAX_SPLIT_REQUESTS + 1, Some(150)),
            Err(MipsError::InvalidRequest(_))
        ));
        assert!(split_request_amount(1_000_000_000_000, Some(1)).is_err());
    }

    #[test]
    fn test_currency_validation() {
        assert!(validate_transaction_currency("MUR").is_ok());
        assert!(matches!(
            validate_transaction_currency("USD"),
            Err(MipsError::UnsupportedCurrency { currency }) if currency == "USD"
        ));
    }

    #[test]
    fn test_parse_amount_minor() {
        assert_eq!(parse_amount_minor("1500").unwrap(), 150_000);
        assert_eq!(parse_amount_minor("19.99").unwrap(), 1999);
        assert!(parse_amount_minor("-5").is_err());
        assert!(parse_amount_minor("abc").is_err());
        assert!(parse_amount_minor("1e300").is_err());
    }

    #[test]
    fn test_request_validation() {
        let client = ClientDetails {
            first_name: "Ada".into(),
            email: "ada@example.mu".into(),
            ..Default::default()
        };
        let request = PaymentRequest::new("SO-1", 1999, client.clone());
        assert!(request.validate().is_ok());
        assert_eq!(request.amount_major(), 19.99);

        let usd = PaymentRequest::new("SO-1", 1999, client).with_currency("USD");
        assert!(usd.validate().is_err());
    }
}
