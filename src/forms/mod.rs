use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement};

use crate::config::FeedbackConfig;
use crate::dom::{cancel_scheduled, query_all, schedule_once, submit_button_of};

/// Bootstrap spinner glyph, kept byte-identical to the markup the
/// panel's stylesheets expect.
const SPINNER_GLYPH: &str = "<span class=\"spinner-border spinner-border-sm\" role=\"status\" \
                             aria-hidden=\"true\"></span>";

/// Keys for the restoration ledger, handed out at bind time. Global so
/// two `initialize` calls can never alias each other's entries.
static NEXT_FORM_KEY: AtomicUsize = AtomicUsize::new(1);

/// Compose the processing indicator: spinner glyph, a space, then the
/// status label.
pub(crate) fn processing_markup(label: &str) -> String {
    format!("{SPINNER_GLYPH} {label}")
}

/// A restoration that has been scheduled but has not fired yet.
///
/// `original_html` is the snapshot taken on the FIRST submission of the
/// current processing window. Re-entrant submissions must reuse it: by
/// the time they run, the button already displays the spinner, and
/// re-capturing would destroy the snapshot for good.
#[derive(Clone, Debug, PartialEq)]
struct PendingRestore {
    timer_id: i32,
    original_html: String,
}

/// Pending-restoration bookkeeping shared between submit handlers and
/// their timer callbacks. The only shared mutable state in the crate.
#[derive(Clone, Default)]
struct RestoreLedger {
    inner: Arc<Mutex<HashMap<usize, PendingRestore>>>,
}

impl RestoreLedger {
    /// Remove and return the pending restoration for `key`, if any.
    fn take(&self, key: usize) -> Option<PendingRestore> {
        match self.inner.lock() {
            Ok(mut map) => map.remove(&key),
            Err(_) => None,
        }
    }

    /// Record the pending restoration for `key`, replacing any earlier
    /// entry.
    fn put(&self, key: usize, entry: PendingRestore) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key, entry);
        }
    }

    /// Drop the entry for `key` once its restoration fired.
    fn complete(&self, key: usize) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(&key);
        }
    }
}

/// Submit-time spinner feedback for every form under a root.
///
/// Responsibilities:
/// - swap a form's submit button to the processing indicator on submit
/// - restore it unconditionally after the configured fallback delay
/// - collapse re-entrant submissions into a single pending restoration
///
/// Non-responsibilities:
/// - submission outcome (never observed; the fallback is a blind timer)
/// - blocking or intercepting native submission
#[derive(Clone)]
pub struct FormFeedback {
    restore_ms: i32,
    processing_html: String,
    ledger: RestoreLedger,
}

impl FormFeedback {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            restore_ms: config.submit_restore_ms,
            processing_html: processing_markup(&config.processing_label),
            ledger: RestoreLedger::default(),
        }
    }

    /// Attach a submit observer to every form currently under `root`.
    /// Returns how many forms were bound.
    ///
    /// Forms inserted after this call are not observed.
    pub fn bind_all(&self, root: &Element) -> usize {
        let forms = query_all(root, "form");
        for form in &forms {
            self.bind_form(form);
        }
        forms.len()
    }

    fn bind_form(&self, form: &Element) {
        let key = NEXT_FORM_KEY.fetch_add(1, Ordering::SeqCst);
        let feedback = self.clone();
        let observed = form.clone();

        let cb = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            feedback.on_submit(key, &observed);
        }) as Box<dyn FnMut(web_sys::Event)>);

        if form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            // Listeners live for the page lifetime; no cleanup path.
            cb.forget();
        }
    }

    /// Swap in the processing indicator and (re)arm the fallback.
    ///
    /// The submission itself proceeds untouched: no `preventDefault`,
    /// no outcome detection. If the page navigates away the timer dies
    /// with it; if it does not, the restoration guarantees the button
    /// never stays disabled for good.
    fn on_submit(&self, key: usize, form: &Element) {
        let Some(button) = submit_button_of(form) else {
            // Forms without an explicit submit button submit untouched.
            return;
        };

        let original_html = match self.ledger.take(key) {
            Some(prior) => {
                // Re-entry before the fallback fired: one pending
                // restoration per button, so the earlier timer goes away
                // and the earlier snapshot stays authoritative.
                cancel_scheduled(prior.timer_id);
                prior.original_html
            }
            None => button.inner_html(),
        };

        button.set_inner_html(&self.processing_html);
        button.set_disabled(true);

        self.arm_restore(key, button, original_html);
    }

    fn arm_restore(&self, key: usize, button: HtmlButtonElement, original_html: String) {
        let ledger = self.ledger.clone();
        let restore_html = original_html.clone();

        let timer_id = schedule_once(self.restore_ms, move || {
            button.set_inner_html(&restore_html);
            button.set_disabled(false);
            ledger.complete(key);
        });

        // No window, no timer: leave no ledger entry behind.
        let Some(timer_id) = timer_id else {
            return;
        };

        self.ledger.put(
            key,
            PendingRestore {
                timer_id,
                original_html,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_markup_matches_panel_contract() {
        assert_eq!(
            processing_markup("Procesando..."),
            "<span class=\"spinner-border spinner-border-sm\" role=\"status\" \
             aria-hidden=\"true\"></span> Procesando..."
        );
    }

    #[test]
    fn test_processing_markup_custom_label() {
        assert!(processing_markup("Cargando").ends_with("</span> Cargando"));
    }

    #[test]
    fn test_ledger_take_empties_the_entry() {
        let ledger = RestoreLedger::default();
        ledger.put(
            7,
            PendingRestore {
                timer_id: 41,
                original_html: "Save".to_string(),
            },
        );

        let taken = ledger.take(7).expect("entry");
        assert_eq!(taken.timer_id, 41);
        assert_eq!(taken.original_html, "Save");
        assert_eq!(ledger.take(7), None);
    }

    #[test]
    fn test_ledger_put_replaces_prior_entry() {
        let ledger = RestoreLedger::default();
        ledger.put(
            3,
            PendingRestore {
                timer_id: 1,
                original_html: "first".to_string(),
            },
        );
        ledger.put(
            3,
            PendingRestore {
                timer_id: 2,
                original_html: "second".to_string(),
            },
        );

        assert_eq!(ledger.take(3).expect("entry").timer_id, 2);
    }

    #[test]
    fn test_ledger_complete_drops_the_entry() {
        let ledger = RestoreLedger::default();
        ledger.put(
            9,
            PendingRestore {
                timer_id: 5,
                original_html: "Go".to_string(),
            },
        );
        ledger.complete(9);
        assert_eq!(ledger.take(9), None);

        // Completing an absent key is a no-op.
        ledger.complete(9);
    }
}
