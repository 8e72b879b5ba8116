use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, MouseEvent, ScrollBehavior, ScrollIntoViewOptions};

use crate::dom;

pub const IN_PAGE_ANCHORS: &str = r##"a[href^="#"]"##;

/// Where an in-page link points. A bare `#` points nowhere.
pub fn fragment_selector(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() => Some(href),
        _ => None,
    }
}

pub trait ScrollSurface {
    type Target;

    fn find(&self, selector: &str) -> Option<Self::Target>;
    fn scroll_smoothly(&self, target: &Self::Target);
}

/// Returns whether anything was scrolled. An unknown or malformed fragment
/// is not an error, just nothing to do.
pub fn follow<S: ScrollSurface>(surface: &S, href: &str) -> bool {
    let Some(target) = fragment_selector(href).and_then(|selector| surface.find(selector)) else {
        return false;
    };
    surface.scroll_smoothly(&target);
    true
}

impl ScrollSurface for Document {
    type Target = Element;

    fn find(&self, selector: &str) -> Option<Element> {
        // `#1st` and friends are not valid selectors; treat them as misses.
        self.query_selector(selector).ok().flatten()
    }

    fn scroll_smoothly(&self, target: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

pub fn attach(document: &Document) -> Result<(), JsValue> {
    let anchors = dom::query_all(document, IN_PAGE_ANCHORS)?;
    debug!("Smooth scrolling {} in-page links", anchors.len());

    for anchor in anchors {
        let document = document.clone();
        let link = anchor.clone();
        dom::listen(&anchor, "click", move |e: MouseEvent| {
            e.prevent_default();
            if let Some(href) = link.get_attribute("href") {
                follow(&document, &href);
            }
        })?;
    }
    Ok(())
}
