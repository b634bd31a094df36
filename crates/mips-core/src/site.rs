//! # Site Address
//!
//! The externally reachable origin of this deployment. The gateway is told
//! to call back into `{origin}/api/method/...imn_callback`, and shoppers are
//! sent to `{origin}/mips_checkout?...`.

use crate::error::{MipsError, MipsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::{form_urlencoded, Url};

/// Fixed path of the inbound IMN webhook handler on the host framework
pub const IMN_CALLBACK_PATH: &str =
    "/api/method/mips_payments.mips_payments.mips_payments.doctype.mips_settings.imn_callback";

/// Path of the checkout-result page
pub const CHECKOUT_PAGE_PATH: &str = "/mips_checkout";

/// Deployment origin, `scheme://host`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteAddress(String);

impl SiteAddress {
    /// Parse any absolute URL into `scheme://host`.
    ///
    /// Port, path, query and credentials are discarded.
    pub fn parse(raw: &str) -> MipsResult<Self> {
        let parsed = Url::parse(raw.trim()).map_err(|e| {
            MipsError::InvalidRequest(format!("Invalid site address '{}': {}", raw, e))
        })?;

        let host = parsed.host_str().ok_or_else(|| {
            MipsError::InvalidRequest(format!("Site address '{}' has no host", raw))
        })?;

        Ok(Self(format!("{}://{}", parsed.scheme(), host)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL the gateway should deliver IMN notifications to
    pub fn imn_callback_url(&self) -> String {
        format!("{}{}", self.0, IMN_CALLBACK_PATH)
    }

    /// Checkout page URL with the given query parameters
    pub fn payment_url<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        if query.is_empty() {
            format!("{}{}", self.0, CHECKOUT_PAGE_PATH)
        } else {
            format!("{}{}?{}", self.0, CHECKOUT_PAGE_PATH, query)
        }
    }
}

impl fmt::Display for SiteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SiteAddress {
    type Error = MipsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SiteAddress> for String {
    fn from(value: SiteAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discards_port_and_path() {
        let site = SiteAddress::parse("https://erp.example.mu:8443/app/mips-settings?x=1").unwrap();
        assert_eq!(site.as_str(), "https://erp.example.mu");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(SiteAddress::parse("/orders/42").is_err());
        assert!(SiteAddress::parse("not a url").is_err());
    }

    #[test]
    fn test_imn_callback_url() {
        let site = SiteAddress::parse("http://localhost:8000").unwrap();
        let callback = site.imn_callback_url();

        assert!(callback.starts_with("http://localhost/api/method/"));
        assert!(callback.ends_with(IMN_CALLBACK_PATH));
        assert!(Url::parse(&callback).is_ok());
    }

    #[test]
    fn test_payment_url_encodes_params() {
        let site = SiteAddress::parse("https://shop.example.mu").unwrap();
        let url = site.payment_url([("amount", "1500.00"), ("order_id", "SO 0042")]);

        assert_eq!(
            url,
            "https://shop.example.mu/mips_checkout?amount=1500.00&order_id=SO+0042"
        );
    }

    #[test]
    fn test_payment_url_without_params() {
        let site = SiteAddress::parse("https://shop.example.mu").unwrap();
        let url = site.payment_url(Vec::<(String, String)>::new());
        assert_eq!(url, "https://shop.example.mu/mips_checkout");
    }
}
