//! Scroll-driven effects: the navbar's `scrolled` state and one-shot reveal
//! of `[data-reveal]` elements, which also kicks off stat counters.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::config::PageConfig;
use crate::counter;
use crate::dom;

pub const NAVBAR_SELECTOR: &str = ".navbar";
pub const REVEAL_SELECTOR: &str = "[data-reveal]";
pub const STAT_CLASS: &str = "stat-item";
pub const STAT_NUMBER_SELECTOR: &str = ".stat-number";
pub const ACTIVE_CLASS: &str = "active";

pub fn nav_scrolled(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

/// Elements still waiting for their first appearance. Leaving the set is
/// permanent, which is what makes a reveal one-shot.
#[derive(Debug)]
pub struct RevealSet<K> {
    pending: Vec<K>,
}

impl<K: PartialEq> RevealSet<K> {
    pub fn new(elements: impl IntoIterator<Item = K>) -> Self {
        Self {
            pending: elements.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Feeds one visibility observation. Returns true exactly once per
    /// element: on its first intersecting entry.
    pub fn observe(&mut self, key: &K, intersecting: bool) -> bool {
        if !intersecting {
            return false;
        }
        match self.pending.iter().position(|k| k == key) {
            Some(idx) => {
                self.pending.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

/// An element that can be revealed, and may carry a stat number.
pub trait RevealTarget {
    type Number;

    fn add_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn stat_number(&self) -> Option<Self::Number>;
}

impl RevealTarget for Element {
    type Number = Element;

    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn stat_number(&self) -> Option<Element> {
        self.query_selector(STAT_NUMBER_SELECTOR).ok().flatten()
    }
}

/// Handles one observer entry. On the first intersecting entry for a
/// watched element it adds `active` and, for a stat item with a number,
/// hands the number to `start_count`. Returns whether the element should
/// now be unobserved.
pub fn on_entry<T: RevealTarget + PartialEq>(
    pending: &mut RevealSet<T>,
    target: &T,
    intersecting: bool,
    start_count: impl FnOnce(T::Number),
) -> bool {
    if !pending.observe(target, intersecting) {
        return false;
    }
    target.add_class(ACTIVE_CLASS);
    if target.has_class(STAT_CLASS) {
        if let Some(number) = target.stat_number() {
            start_count(number);
        }
    }
    true
}

pub fn attach_navbar(window: &Window, document: &Document, threshold_px: f64) -> Result<(), JsValue> {
    let Some(navbar) = document.query_selector(NAVBAR_SELECTOR)? else {
        debug!("No {NAVBAR_SELECTOR}, skipping scroll state");
        return Ok(());
    };

    let apply = {
        let window = window.clone();
        move || -> Result<(), JsValue> {
            let scrolled = nav_scrolled(window.scroll_y()?, threshold_px);
            dom::set_class(&navbar, "scrolled", scrolled)
        }
    };
    apply()?;

    dom::listen(window, "scroll", move |_: Event| {
        let _ = apply();
    })
}

pub fn attach_reveal(document: &Document, config: &PageConfig) -> Result<(), JsValue> {
    let elements = dom::query_all(document, REVEAL_SELECTOR)?;
    if elements.is_empty() {
        return Ok(());
    }
    let pending = RevealSet::new(elements.iter().cloned());
    debug!("Watching {} reveal elements", pending.len());
    let pending = Rc::new(RefCell::new(pending));
    let counter_config = config.counter;

    let on_entries = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let revealed = on_entry(
                    &mut *pending.borrow_mut(),
                    &target,
                    entry.is_intersecting(),
                    |number| counter::start_count(number, counter_config),
                );
                if revealed {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal.threshold));
    options.set_root_margin(&config.reveal.root_margin);
    let observer =
        IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &options)?;
    on_entries.forget();

    for el in &elements {
        observer.observe(el);
    }
    Ok(())
}
