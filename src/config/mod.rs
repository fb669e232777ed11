use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;

/// Optional override object the hosting page may define before calling
/// `initialize`, e.g. `window.PANEL_UX = { ALERT_DISMISS_MS: 8000 }`.
const CONFIG_GLOBAL: &str = "PANEL_UX";

/// Fallback delay before a submit button is restored, in milliseconds.
pub const DEFAULT_SUBMIT_RESTORE_MS: i32 = 10_000;
/// Delay before an alert banner is dismissed, in milliseconds.
pub const DEFAULT_ALERT_DISMISS_MS: i32 = 5_000;
/// Status label shown next to the spinner while a form submits.
pub const DEFAULT_PROCESSING_LABEL: &str = "Procesando...";

/// Tunables for both feedback behaviors.
///
/// The defaults reproduce the panel's historical timings exactly; the
/// hosting page can override individual values through `window.PANEL_UX`
/// without rebuilding the module.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackConfig {
    pub submit_restore_ms: i32,
    pub alert_dismiss_ms: i32,
    pub processing_label: String,
}

impl FeedbackConfig {
    /// Read overrides from `window.PANEL_UX`, falling back to the
    /// defaults for anything missing or unusable.
    pub fn from_window() -> Self {
        let mut cfg = Self::default();

        // We support BOTH SCREAMING_CASE keys (documented) and snake_case
        // ones (matching the Rust field names) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get(CONFIG_GLOBAL) {
                if !env.is_undefined() && env.is_object() {
                    if let Some(ms) = read_delay(&env, "SUBMIT_RESTORE_MS", "submit_restore_ms") {
                        cfg.submit_restore_ms = ms;
                    }
                    if let Some(ms) = read_delay(&env, "ALERT_DISMISS_MS", "alert_dismiss_ms") {
                        cfg.alert_dismiss_ms = ms;
                    }
                    if let Some(label) = read_key(&env, "PROCESSING_LABEL")
                        .or_else(|| read_key(&env, "processing_label"))
                        .and_then(|v| v.as_string())
                    {
                        cfg.processing_label = label;
                    }
                }
            }
        }

        cfg
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            submit_restore_ms: DEFAULT_SUBMIT_RESTORE_MS,
            alert_dismiss_ms: DEFAULT_ALERT_DISMISS_MS,
            processing_label: DEFAULT_PROCESSING_LABEL.to_string(),
        }
    }
}

fn read_key(env: &Object, key: &str) -> Option<JsValue> {
    Reflect::get(env, &JsValue::from_str(key)).ok()
}

fn read_delay(env: &Object, primary: &str, fallback: &str) -> Option<i32> {
    read_key(env, primary)
        .and_then(|v| v.as_f64())
        .or_else(|| read_key(env, fallback).and_then(|v| v.as_f64()))
        .and_then(sanitize_delay)
}

/// Delays cross into `setTimeout` as `i32` milliseconds; zero, negative,
/// fractional-garbage, and oversized overrides are discarded so the
/// caller falls back to the default.
pub(crate) fn sanitize_delay(raw: f64) -> Option<i32> {
    if !raw.is_finite() || raw < 1.0 || raw > i32::MAX as f64 {
        return None;
    }
    Some(raw as i32)
}
