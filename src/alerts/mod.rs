use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::dom::{query_all, schedule_once};

/// Narrow dismissal capability injected into the scheduler.
///
/// Implementations must tolerate elements that are already gone by the
/// time the timer fires (idempotent dismiss): there is no cancellation
/// path, so a user closing an alert by hand races every scheduled call.
pub trait DismissAlert {
    fn dismiss(&self, alert: &Element);
}

/// Production capability driving the page's Bootstrap toolkit, the same
/// way the old inline script did: `new bootstrap.Alert(el)` followed by
/// `close()`. This crate never reimplements the dismissal animation.
pub struct BootstrapAlerts;

impl DismissAlert for BootstrapAlerts {
    fn dismiss(&self, alert: &Element) {
        // The user may have closed the alert before the timer fired;
        // handing a detached element back to Bootstrap would throw.
        if !alert.is_connected() {
            return;
        }

        if close_with_bootstrap(alert).is_err() {
            log::warn!("panel-feedback: bootstrap.Alert unavailable, leaving alert in place");
        }
    }
}

/// `new bootstrap.Alert(el).close()` through `Reflect`, so a page that
/// never loaded the toolkit degrades to a logged no-op instead of an
/// uncaught exception.
fn close_with_bootstrap(alert: &Element) -> Result<(), JsValue> {
    let toolkit = Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap"))?;
    if toolkit.is_undefined() {
        return Err(JsValue::from_str("bootstrap global missing"));
    }

    let ctor: Function = Reflect::get(&toolkit, &JsValue::from_str("Alert"))?.dyn_into()?;
    let instance = Reflect::construct(&ctor, &Array::of1(alert.as_ref()))?;

    let close: Function = Reflect::get(&instance, &JsValue::from_str("close"))?.dyn_into()?;
    close.call0(&instance)?;
    Ok(())
}

/// Schedule one dismissal per `.alert` element currently under `root`,
/// each after `delay_ms`. Returns how many alerts were scheduled.
///
/// Fire-and-forget: no handle is retained, so a dismissal cannot be
/// cancelled once scheduled. Alerts inserted later are not observed.
pub fn schedule_dismissals(root: &Element, delay_ms: i32, dismisser: Rc<dyn DismissAlert>) -> usize {
    let alerts = query_all(root, ".alert");
    let count = alerts.len();

    for alert in alerts {
        let dismisser = Rc::clone(&dismisser);
        let _ = schedule_once(delay_ms, move || {
            dismisser.dismiss(&alert);
        });
    }

    count
}
