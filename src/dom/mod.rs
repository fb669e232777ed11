use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement};

/// Collect every element under `root` matching `selector`.
///
/// Failures (bad selector, detached root) surface as an empty list; the
/// caller never observes a DOM error.
pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    let mut found = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            found.push(el);
        }
    }
    found
}

/// The panel only decorates buttons that declare `type="submit"`
/// explicitly; buttons submitting through the implicit default type are
/// left alone, matching the markup the server templates emit.
pub(crate) fn submit_button_of(form: &Element) -> Option<HtmlButtonElement> {
    form.query_selector("button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
}

/// Run `f` once after `delay_ms`, returning the timer handle so the
/// caller can cancel it. `None` when there is no window to schedule
/// against (or the browser refuses the timer).
pub(crate) fn schedule_once(delay_ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let win = web_sys::window()?;
    let cb = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms)
        .ok()
}

/// Cancel a handle returned by [`schedule_once`]. Handles that already
/// fired or were cleared earlier are ignored by the browser.
pub(crate) fn cancel_scheduled(handle: i32) {
    if let Some(win) = web_sys::window() {
        win.clear_timeout_with_handle(handle);
    }
}
