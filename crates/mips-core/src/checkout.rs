//! # Checkout Result Redirect
//!
//! The checkout-result page is rendered with three literal values (status
//! code, status string, redirect target). Once the page loads, the
//! redirector decides what the browser does next:
//!
//! ```text
//!                 ┌──────────────┐
//!                 │   Loading    │
//!                 └──────┬───────┘
//!      200 + "success"   │ "error"            anything else
//!        ┌───────────────┼──────────────────────┐
//!        ▼               ▼                      ▼
//!  ┌───────────┐ ┌─────────────────────┐ ┌────────────────┐
//!  │Redirecting│ │ AwaitingUserOnError │ │ FailureAlerted │
//!  └───────────┘ └─────────────────────┘ └────────────────┘
//! ```
//!
//! All three are terminal. The decision is pure; the DOM side effects go
//! through [`CheckoutSurface`] so the browser binding and tests share it.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// CSS class of the loading spinner; removing it stops the animation
pub const LOADING_INDICATOR_CLASS: &str = "lds-dual-ring";

/// Selector matching the loading spinner
pub const LOADING_INDICATOR_SELECTOR: &str = ".lds-dual-ring";

/// Element that receives the gateway error detail
pub const ERROR_ELEMENT_ID: &str = "mips-error";

/// Blocking alert text for unrecognized outcomes
pub const FETCH_FAILED_MESSAGE: &str = "Fetch failed";

/// Status string for a favorable outcome
pub const STATUS_SUCCESS: &str = "success";

/// Status string for a gateway-reported failure
pub const STATUS_ERROR: &str = "error";

/// Values the server injects into the checkout-result page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRenderContext {
    /// HTTP status of the payment request, if one was made
    pub fetch_code: Option<u16>,

    /// `operation_status` reported by the gateway
    #[serde(default)]
    pub status: String,

    /// Where to send the shopper on success
    #[serde(default)]
    pub redirect_to: String,

    /// Gateway-provided failure detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// QR code for the payment link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl CheckoutRenderContext {
    pub fn success(redirect_to: impl Into<String>) -> Self {
        Self {
            fetch_code: Some(200),
            status: STATUS_SUCCESS.to_string(),
            redirect_to: redirect_to.into(),
            ..Default::default()
        }
    }

    pub fn gateway_error(fetch_code: u16, detail: Option<String>) -> Self {
        Self {
            fetch_code: Some(fetch_code),
            status: STATUS_ERROR.to_string(),
            error: detail,
            ..Default::default()
        }
    }

    /// The gateway could not be reached or answered with a non-200 status
    pub fn failed(fetch_code: Option<u16>) -> Self {
        Self {
            fetch_code,
            ..Default::default()
        }
    }

    pub fn redirect_inputs(&self) -> RedirectInputs {
        RedirectInputs {
            status_code: self.fetch_code.map(i64::from),
            status: self.status.clone(),
            redirect_target: self.redirect_to.clone(),
            error_detail: self.error.clone(),
        }
    }
}

/// Redirector inputs as seen from the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectInputs {
    pub status_code: Option<i64>,
    pub status: String,
    pub redirect_target: String,
    pub error_detail: Option<String>,
}

impl RedirectInputs {
    pub fn new(
        status_code: Option<i64>,
        status: impl Into<String>,
        redirect_target: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            status: status.into(),
            redirect_target: redirect_target.into(),
            error_detail: None,
        }
    }

    pub fn with_error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }
}

/// Parse a status code the way `parseInt` does: optional leading
/// whitespace and sign, then digits; trailing garbage is ignored.
pub fn parse_status_code(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}

/// What the page should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Stop the spinner and navigate away
    Redirect { target: String },
    /// Stop the spinner and leave the shopper on the page
    StopOnError { detail: Option<String> },
    /// Show a blocking alert
    Alert { message: &'static str },
}

/// Redirector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectState {
    Loading,
    Redirecting,
    AwaitingUserOnError,
    FailureAlerted,
}

impl RedirectState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RedirectState::Loading)
    }
}

pub fn decide_redirect(inputs: &RedirectInputs) -> RedirectDecision {
    if inputs.status_code == Some(200) && inputs.status == STATUS_SUCCESS {
        RedirectDecision::Redirect {
            target: inputs.redirect_target.clone(),
        }
    } else if inputs.status == STATUS_ERROR {
        RedirectDecision::StopOnError {
            detail: inputs.error_detail.clone(),
        }
    } else {
        RedirectDecision::Alert {
            message: FETCH_FAILED_MESSAGE,
        }
    }
}

/// Side effects the redirector can perform on the page.
///
/// Every method must tolerate missing elements.
pub trait CheckoutSurface {
    /// Stop the loading animation. Returns false if no indicator exists.
    fn stop_loading(&mut self) -> bool;

    /// Navigate the browser; nothing after this is expected to run.
    fn navigate(&mut self, target: &str);

    /// Reveal a non-blocking error message, if the page has a slot for it
    fn show_error(&mut self, detail: Option<&str>);

    /// Blocking alert
    fn alert(&mut self, message: &str);
}

/// Run the redirector once against a page
pub fn run_redirector<S>(inputs: &RedirectInputs, surface: &mut S) -> RedirectState
where
    S: CheckoutSurface + ?Sized,
{
    let decision = decide_redirect(inputs);
    debug!(?decision, "checkout redirect decision");

    match decision {
        RedirectDecision::Redirect { target } => {
            surface.stop_loading();
            surface.navigate(&target);
            RedirectState::Redirecting
        }
        RedirectDecision::StopOnError { detail } => {
            surface.stop_loading();
            surface.show_error(detail.as_deref());
            RedirectState::AwaitingUserOnError
        }
        RedirectDecision::Alert { message } => {
            surface.alert(message);
            RedirectState::FailureAlerted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        has_indicator: bool,
        spinner_stopped: bool,
        navigated_to: Option<String>,
        errors_shown: Vec<Option<String>>,
        alerts: Vec<String>,
    }

    impl RecordingSurface {
        fn with_indicator() -> Self {
            Self {
                has_indicator: true,
                ..Default::default()
            }
        }
    }

    impl CheckoutSurface for RecordingSurface {
        fn stop_loading(&mut self) -> bool {
            if self.has_indicator {
                self.spinner_stopped = true;
            }
            self.has_indicator
        }

        fn navigate(&mut self, target: &str) {
            self.navigated_to = Some(target.to_string());
        }

        fn show_error(&mut self, detail: Option<&str>) {
            self.errors_shown.push(detail.map(String::from));
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    #[test]
    fn test_success_redirects() {
        let mut page = RecordingSurface::with_indicator();
        let inputs = RedirectInputs::new(Some(200), "success", "/orders/42");

        let state = run_redirector(&inputs, &mut page);

        assert_eq!(state, RedirectState::Redirecting);
        assert_eq!(page.navigated_to.as_deref(), Some("/orders/42"));
        assert!(page.spinner_stopped);
        assert!(page.alerts.is_empty());
    }

    #[test]
    fn test_success_without_indicator_still_redirects() {
        let mut page = RecordingSurface::default();
        let inputs = RedirectInputs::new(Some(200), "success", "/orders/42");

        run_redirector(&inputs, &mut page);

        assert_eq!(page.navigated_to.as_deref(), Some("/orders/42"));
        assert!(!page.spinner_stopped);
    }

    #[test]
    fn test_error_stops_spinner_without_navigating() {
        let mut page = RecordingSurface::with_indicator();
        let inputs =
            RedirectInputs::new(Some(200), "error", "/orders/42").with_error_detail("Card expired");

        let state = run_redirector(&inputs, &mut page);

        assert_eq!(state, RedirectState::AwaitingUserOnError);
        assert!(page.spinner_stopped);
        assert!(page.navigated_to.is_none());
        assert!(page.alerts.is_empty());
        assert_eq!(page.errors_shown, vec![Some("Card expired".to_string())]);
    }

    #[test]
    fn test_unrecognized_outcome_alerts() {
        let mut page = RecordingSurface::with_indicator();
        let inputs = RedirectInputs::new(Some(500), "", "/orders/42");

        let state = run_redirector(&inputs, &mut page);

        assert_eq!(state, RedirectState::FailureAlerted);
        assert_eq!(page.alerts, vec![FETCH_FAILED_MESSAGE.to_string()]);
        assert!(page.navigated_to.is_none());
    }

    #[test]
    fn test_status_code_alone_is_not_success() {
        let decision = decide_redirect(&RedirectInputs::new(Some(200), "", "/x"));
        assert_eq!(
            decision,
            RedirectDecision::Alert {
                message: FETCH_FAILED_MESSAGE
            }
        );

        let decision = decide_redirect(&RedirectInputs::new(Some(201), "success", "/x"));
        assert!(matches!(decision, RedirectDecision::Alert { .. }));
    }

    #[test]
    fn test_parse_status_code() {
        assert_eq!(parse_status_code("200"), Some(200));
        assert_eq!(parse_status_code("  404 Not Found"), Some(404));
        assert_eq!(parse_status_code("-1"), Some(-1));
        assert_eq!(parse_status_code("None"), None);
        assert_eq!(parse_status_code(""), None);
    }

    #[test]
    fn test_render_context_inputs() {
        let ctx = CheckoutRenderContext::success("https://pay.mips.mu/link/abc");
        let inputs = ctx.redirect_inputs();
        assert_eq!(inputs.status_code, Some(200));
        assert_eq!(inputs.status, "success");

        let failed = CheckoutRenderContext::failed(Some(502)).redirect_inputs();
        assert!(matches!(
            decide_redirect(&failed),
            RedirectDecision::Alert { .. }
        ));
        assert!(RedirectState::FailureAlerted.is_terminal());
        assert!(!RedirectState::Loading.is_terminal());
    }
}
