use log::{info, warn};
use wasm_bindgen::JsValue;
use web_sys::{window, Document, Event, Window};

mod anchors;
mod clock;
mod config;
mod counter;
mod cursor;
mod dom;
mod estimate;
mod reveal;
mod typing;

use config::PageConfig;

/// Wires every effect onto an already parsed page. Each component guards on
/// its own elements; one failing to attach does not stop the rest.
pub fn init(window: &Window, document: &Document) {
    let config = PageConfig::from_document(document);

    report("cursor", cursor::attach(window, document));
    report("navbar", reveal::attach_navbar(window, document, config.nav_threshold_px));
    report("reveal", reveal::attach_reveal(document, &config));
    report("estimate", estimate::attach(window, document, &config.estimate));
    report("anchors", anchors::attach(document));
    typing::attach(document, &config.typing);

    info!("Landing effects attached");
}

fn report(component: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        warn!("{component} not attached: {err:?}");
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        warn!("No document, nothing to attach to");
        return;
    };

    if document.ready_state() == "loading" {
        let (win, doc) = (window.clone(), document.clone());
        let attached = dom::listen(&document, "DOMContentLoaded", move |_: Event| {
            init(&win, &doc);
        });
        report("DOMContentLoaded", attached);
    } else {
        init(&window, &document);
    }
}
