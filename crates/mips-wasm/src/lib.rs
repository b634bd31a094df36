//! # mips-wasm
//!
//! WebAssembly checkout-result redirector for mips-connect-rs.
//!
//! The `/mips_checkout` page embeds the server-computed outcome and calls
//! into this module once it loads:
//!
//! ```javascript
//! import init, { run_checkout_redirect } from '/assets/mips_wasm.js';
//!
//! await init();
//! run_checkout_redirect(ctx.fetch_code, ctx.status, ctx.redirect_to, ctx.error);
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build crates/mips-wasm --target web
//! ```

use mips_core::{
    parse_status_code, run_redirector, CheckoutSurface, RedirectInputs, RedirectState,
    ERROR_ELEMENT_ID, LOADING_INDICATOR_CLASS, LOADING_INDICATOR_SELECTOR,
};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

/// Shown when the gateway reported an error without detail
const DEFAULT_ERROR_TEXT: &str = "Payment request failed";

/// The live page
struct DomSurface {
    window: Window,
    document: Option<Document>,
}

impl DomSurface {
    fn new(window: Window) -> Self {
        let document = window.document();
        Self { window, document }
    }
}

impl CheckoutSurface for DomSurface {
    fn stop_loading(&mut self) -> bool {
        let Some(indicator) = self
            .document
            .as_ref()
            .and_then(|d| d.query_selector(LOADING_INDICATOR_SELECTOR).ok().flatten())
        else {
            return false;
        };
        indicator.class_list().remove_1(LOADING_INDICATOR_CLASS).is_ok()
    }

    fn navigate(&mut self, target: &str) {
        if let Err(e) = self.window.location().set_href(target) {
            web_sys::console::error_2(&JsValue::from_str("Redirect failed:"), &e);
        }
    }

    fn show_error(&mut self, detail: Option<&str>) {
        let Some(slot) = self
            .document
            .as_ref()
            .and_then(|d| d.get_element_by_id(ERROR_ELEMENT_ID))
        else {
            return;
        };
        slot.set_text_content(Some(detail.unwrap_or(DEFAULT_ERROR_TEXT)));
        let _ = slot.remove_attribute("hidden");
    }

    fn alert(&mut self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

/// Coerce the injected status code the way the page script would
fn status_code_from_parts(number: Option<f64>, text: Option<String>) -> Option<i64> {
    match (number, text) {
        (Some(n), _) if n.is_finite() => Some(n.trunc() as i64),
        (_, Some(s)) => parse_status_code(&s),
        _ => None,
    }
}

/// Terminal state name reported back to the page
fn state_label(state: RedirectState) -> &'static str {
    match state {
        RedirectState::Loading => "loading",
        RedirectState::Redirecting => "redirecting",
        RedirectState::AwaitingUserOnError => "awaiting_user_on_error",
        RedirectState::FailureAlerted => "failure_alerted",
    }
}

/// Run the checkout redirector once against the current document.
///
/// Returns the terminal state name.
#[wasm_bindgen]
pub fn run_checkout_redirect(
    status_code: JsValue,
    status: &str,
    redirect_to: &str,
    error_detail: Option<String>,
) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

    let code = status_code_from_parts(status_code.as_f64(), status_code.as_string());
    let mut inputs = RedirectInputs::new(code, status, redirect_to);
    if let Some(detail) = error_detail {
        inputs = inputs.with_error_detail(detail);
    }

    let mut surface = DomSurface::new(window);
    let state = run_redirector(&inputs, &mut surface);
    Ok(state_label(state).to_string())
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(html: &str) -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(html);
        document
    }

    #[wasm_bindgen_test]
    fn error_stops_spinner_and_shows_detail() {
        let document = mount(r#"<div class="lds-dual-ring"></div><p id="mips-error" hidden></p>"#);

        let state = run_checkout_redirect(
            JsValue::from_f64(200.0),
            "error",
            "/orders/42",
            Some("Card expired".into()),
        )
        .unwrap();

        assert_eq!(state, "awaiting_user_on_error");
        assert!(document.query_selector(".lds-dual-ring").unwrap().is_none());
        let slot = document.get_element_by_id("mips-error").unwrap();
        assert_eq!(slot.text_content().as_deref(), Some("Card expired"));
        assert!(!slot.has_attribute("hidden"));
    }

    #[wasm_bindgen_test]
    fn missing_indicator_is_tolerated() {
        mount("");

        let state = run_checkout_redirect(JsValue::from_str("200"), "error", "", None).unwrap();

        assert_eq!(state, "awaiting_user_on_error");
    }
}
