//! # Checkout Result Page
//!
//! Server-side rendering of `/mips_checkout`. The render context is embedded
//! as a JSON literal; the wasm redirector reads it once the module loads.

use mips_core::{
    CheckoutRenderContext, ERROR_ELEMENT_ID, FETCH_FAILED_MESSAGE, LOADING_INDICATOR_CLASS,
};

/// Bundle built by `wasm-pack` from `mips-wasm`
pub const REDIRECTOR_MODULE: &str = "/assets/mips_wasm.js";

/// Serialize the context for a `<script>` block.
///
/// `</` is escaped so no injected value can close the script element.
pub fn script_literal(ctx: &CheckoutRenderContext) -> String {
    serde_json::to_string(ctx)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

pub fn render_checkout_page(ctx: &CheckoutRenderContext) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>MIPS Checkout</title>
<style>
.{spinner} {{ display: inline-block; width: 64px; height: 64px; }}
.{spinner}:after {{
    content: " "; display: block; width: 46px; height: 46px; margin: 8px; border-radius: 50%;
    border: 6px solid #1a1a2e; border-color: #1a1a2e transparent #1a1a2e transparent;
    animation: {spinner} 1.2s linear infinite;
}}
@keyframes {spinner} {{ 0% {{ transform: rotate(0deg); }} 100% {{ transform: rotate(360deg); }} }}
#{error_id}[hidden] {{ display: none; }}
</style>
</head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="text-align: center;">
        <div class="{spinner}"></div>
        <p>Redirecting you to MIPS&hellip;</p>
        <p id="{error_id}" role="alert" hidden style="color: #b00020;"></p>
    </div>
    <script type="module">
        const ctx = {ctx};
        try {{
            const {{ default: init, run_checkout_redirect }} = await import("{module}");
            await init();
            run_checkout_redirect(ctx.fetch_code ?? null, ctx.status ?? "", ctx.redirect_to ?? "", ctx.error ?? null);
        }} catch (e) {{
            console.error("MIPS redirector failed to load", e);
            document.querySelector(".{spinner}")?.classList.remove("{spinner}");
            alert({fetch_failed});
        }}
    </script>
</body>
</html>
"#,
        spinner = LOADING_INDICATOR_CLASS,
        error_id = ERROR_ELEMENT_ID,
        ctx = script_literal(ctx),
        module = REDIRECTOR_MODULE,
        fetch_failed = serde_json::Value::from(FETCH_FAILED_MESSAGE),
    )
}
