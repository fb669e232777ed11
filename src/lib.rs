//! Progressive-enhancement layer for the panel's server-rendered pages:
//! spinner feedback on submitted forms, and alert banners that dismiss
//! themselves after a few seconds.
//!
//! The hosting page loads the wasm module and calls [`initialize`] once
//! with the container to enhance (usually `document.body`). Nothing is
//! bound implicitly; pages that never call `initialize` are untouched.

mod alerts;
mod config;
mod dom;
mod forms;

pub use alerts::{schedule_dismissals, BootstrapAlerts, DismissAlert};
pub use config::FeedbackConfig;
pub use forms::FormFeedback;

use std::rc::Rc;

use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Element;

/// What one [`initialize`] call wired up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindSummary {
    pub forms_bound: usize,
    pub alerts_scheduled: usize,
}

/// Attach submit feedback and alert auto-dismissal to everything under
/// `root`, honoring `window.PANEL_UX` overrides when the page defines
/// them.
///
/// Call once per page load. A second call binds a second set of
/// handlers; nothing deduplicates them.
#[wasm_bindgen]
pub fn initialize(root: &Element) {
    let summary = initialize_with(root, FeedbackConfig::from_window(), Rc::new(BootstrapAlerts));
    log::debug!(
        "panel-feedback: bound {} form(s), scheduled {} alert(s)",
        summary.forms_bound,
        summary.alerts_scheduled
    );
}

/// [`initialize`] with the config and dismiss capability made explicit.
///
/// This is the seam the browser tests use to shorten delays and observe
/// dismissals; hosts embedding the crate as a Rust library can use it to
/// plug in a non-Bootstrap toolkit.
pub fn initialize_with(
    root: &Element,
    config: FeedbackConfig,
    dismisser: Rc<dyn DismissAlert>,
) -> BindSummary {
    let forms = FormFeedback::new(&config);
    BindSummary {
        forms_bound: forms.bind_all(root),
        alerts_scheduled: schedule_dismissals(root, config.alert_dismiss_ms, dismisser),
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    struct RecordingDismisser {
        hits: RefCell<usize>,
    }

    impl DismissAlert for RecordingDismisser {
        fn dismiss(&self, _alert: &Element) {
            *self.hits.borrow_mut() += 1;
        }
    }

    async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = web_sys::window()
                .expect("window")
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn mounted_root() -> Element {
        let document = web_sys::window()
            .expect("window")
            .document()
            .expect("document");
        let root = document.create_element("div").expect("root div");
        document
            .body()
            .expect("body")
            .append_child(&root)
            .expect("mount root");
        root
    }

    #[wasm_bindgen_test]
    async fn test_initialize_with_binds_forms_and_alerts() {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = mounted_root();

        let form = document.create_element("form").unwrap();
        let button = document.create_element("button").unwrap();
        button.set_attribute("type", "submit").unwrap();
        button.set_inner_html("Guardar");
        form.append_child(&button).unwrap();
        root.append_child(&form).unwrap();

        let alert = document.create_element("div").unwrap();
        alert.set_class_name("alert alert-success");
        root.append_child(&alert).unwrap();

        let dismisser = Rc::new(RecordingDismisser {
            hits: RefCell::new(0),
        });
        let config = FeedbackConfig {
            submit_restore_ms: 150,
            alert_dismiss_ms: 100,
            ..FeedbackConfig::default()
        };

        let summary = initialize_with(&root, config, dismisser.clone());
        assert_eq!(
            summary,
            BindSummary {
                forms_bound: 1,
                alerts_scheduled: 1,
            }
        );

        form.dispatch_event(&web_sys::Event::new("submit").unwrap())
            .unwrap();
        assert!(button.inner_html().contains("spinner-border"));

        sleep_ms(400).await;
        assert_eq!(button.inner_html(), "Guardar");
        assert_eq!(*dismisser.hits.borrow(), 1);

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_initialize_with_on_empty_root_binds_nothing() {
        let root = mounted_root();

        let dismisser = Rc::new(RecordingDismisser {
            hits: RefCell::new(0),
        });
        let summary = initialize_with(&root, FeedbackConfig::default(), dismisser);
        assert_eq!(summary, BindSummary::default());

        root.remove();
    }
}
