//! # IMN Callback Registration
//!
//! Wire format of `POST {base}/IMN_CALLBACK_ARCH` and the rule for reading
//! its answer. MIPS replies with a bare `success` text body; anything else,
//! including a JSON-wrapped `"success"`, is a rejection.

use mips_core::{MipsError, MipsResult};
use serde::Serialize;

/// Literal body MIPS sends when it accepts a callback URL
pub const REGISTRATION_ACCEPTED: &str = "success";

/// Registration request body. Exactly one key.
#[derive(Debug, Serialize)]
pub struct CallbackRegistration<'a> {
    pub crypted_callback: &'a str,
}

/// Decide whether a registration response means "registered"
pub fn evaluate_registration_response(status: u16, body: &str) -> MipsResult<()> {
    if (200..300).contains(&status) && body == REGISTRATION_ACCEPTED {
        Ok(())
    } else {
        Err(MipsError::GatewayRejected {
            status,
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_has_single_key() {
        let body = serde_json::to_value(CallbackRegistration {
            crypted_callback: "https://erp.example.mu/api/method/x.imn_callback",
        })
        .unwrap();

        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(
            obj["crypted_callback"],
            "https://erp.example.mu/api/method/x.imn_callback"
        );
    }

    #[test]
    fn test_only_literal_success_is_accepted() {
        assert!(evaluate_registration_response(200, "success").is_ok());
        assert!(evaluate_registration_response(204, "success").is_ok());

        assert!(evaluate_registration_response(200, "\"success\"").is_err());
        assert!(evaluate_registration_response(200, "{\"status\":\"success\"}").is_err());
        assert!(evaluate_registration_response(200, "success\n").is_err());
        assert!(evaluate_registration_response(200, "Success").is_err());
        assert!(evaluate_registration_response(500, "success").is_err());
    }
}
