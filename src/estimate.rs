//! The "estimate calculator" on the landing page. It is a mockup: the only
//! check is that no field is empty, and the price is a base figure plus a
//! random add-on.

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Math;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, MouseEvent, Window};

use crate::clock::{self, Machine, Step};
use crate::config::EstimateConfig;
use crate::dom;

pub const BUTTON_ID: &str = "calc-btn";
pub const RESULT_ID: &str = "estimate-result";
pub const INPUTS_SELECTOR: &str = ".estimate-form-mockup input";
pub const PRICE_SELECTOR: &str = ".price-tag";

/// What the mockup needs from the page.
pub trait EstimateSurface {
    fn input_values(&self) -> Vec<String>;
    fn alert(&self, message: &str);
    fn set_label(&self, label: &str);
    fn show_result(&self, price: &str);
}

pub fn quote(base_price: u32, jitter: u32) -> String {
    format!("€ {}.00", base_price + jitter)
}

/// Maps a unit-interval sample onto `[0, spread)`.
pub fn jitter_from_unit(sample: f64, spread: u32) -> u32 {
    let jitter = (sample * f64::from(spread)).floor() as u32;
    jitter.min(spread.saturating_sub(1))
}

/// The fake delay between pressing the button and seeing a price.
pub struct Calculation<S> {
    surface: S,
    config: EstimateConfig,
    jitter: u32,
    busy: bool,
}

impl<S: EstimateSurface> Machine for Calculation<S> {
    fn advance(&mut self) -> Step {
        if !self.busy {
            self.busy = true;
            self.surface.set_label(&self.config.busy_label);
            return Step::Wait(self.config.delay_ms);
        }
        self.surface.set_label(&self.config.idle_label);
        self.surface
            .show_result(&quote(self.config.base_price, self.jitter));
        Step::Done
    }
}

/// Handles a click. An empty field raises the warning and yields nothing;
/// otherwise the returned calculation still has to be driven. Clicks during
/// a running calculation start another one; each restores the idle label
/// from config, never whatever the button shows at that moment.
pub fn submit<S: EstimateSurface>(
    surface: S,
    config: &EstimateConfig,
    jitter: u32,
) -> Option<Calculation<S>> {
    if surface.input_values().iter().any(String::is_empty) {
        surface.alert(&config.incomplete_message);
        return None;
    }
    Some(Calculation {
        surface,
        config: config.clone(),
        jitter,
        busy: false,
    })
}

#[derive(Clone)]
struct MockupElements {
    window: Window,
    document: Document,
    button: HtmlElement,
    result: Element,
}

impl EstimateSurface for MockupElements {
    fn input_values(&self) -> Vec<String> {
        dom::query_all(&self.document, INPUTS_SELECTOR)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .collect()
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn set_label(&self, label: &str) {
        self.button.set_inner_text(label);
    }

    fn show_result(&self, price: &str) {
        let _ = self.result.class_list().remove_1("hidden");
        if let Ok(Some(tag)) = self.result.query_selector(PRICE_SELECTOR) {
            tag.set_text_content(Some(price));
        }
    }
}

pub fn attach(window: &Window, document: &Document, config: &EstimateConfig) -> Result<(), JsValue> {
    let (Some(button), Some(result)) = (
        dom::html_element_by_id(document, BUTTON_ID),
        document.get_element_by_id(RESULT_ID),
    ) else {
        debug!("No estimate mockup on this page");
        return Ok(());
    };

    let elements = MockupElements {
        window: window.clone(),
        document: document.clone(),
        button: button.clone(),
        result,
    };
    let config = config.clone();
    dom::listen(&button, "click", move |e: MouseEvent| {
        e.prevent_default();
        let jitter = jitter_from_unit(Math::random(), config.spread);
        if let Some(calculation) = submit(elements.clone(), &config, jitter) {
            clock::spawn(calculation);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Page {
        inputs: Vec<String>,
        label: String,
        alerts: Vec<String>,
        labels_seen: Vec<String>,
        price: Option<String>,
        result_hidden: bool,
    }

    #[derive(Clone)]
    struct FakeSurface(Rc<RefCell<Page>>);

    impl FakeSurface {
        fn new(inputs: &[&str]) -> Self {
            Self(Rc::new(RefCell::new(Page {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                label: "Calculate Estimate".to_string(),
                result_hidden: true,
                ..Page::default()
            })))
        }
    }

    impl EstimateSurface for FakeSurface {
        fn input_values(&self) -> Vec<String> {
            self.0.borrow().inputs.clone()
        }
        fn alert(&self, message: &str) {
            self.0.borrow_mut().alerts.push(message.to_string());
        }
        fn set_label(&self, label: &str) {
            let mut page = self.0.borrow_mut();
            page.label = label.to_string();
            page.labels_seen.push(label.to_string());
        }
        fn show_result(&self, price: &str) {
            let mut page = self.0.borrow_mut();
            page.result_hidden = false;
            page.price = Some(price.to_string());
        }
    }

    fn price_in_range(price: &str) -> bool {
        let Some(amount) = price.strip_prefix("€ ").and_then(|p| p.strip_suffix(".00")) else {
            return false;
        };
        matches!(amount.parse::<u32>(), Ok(140..=159))
    }

    #[test]
    fn filled_form_shows_price_after_delay() {
        let surface = FakeSurface::new(&["Dublin", "Cork", "12"]);
        let config = EstimateConfig::default();
        let mut calculation = submit(surface.clone(), &config, 7).unwrap();

        let clock = VirtualClock::new();
        clock.run(&mut calculation);

        let page = surface.0.borrow();
        assert_eq!(clock.now(), 800);
        assert!(!page.result_hidden);
        assert_eq!(page.price.as_deref(), Some("€ 147.00"));
        assert_eq!(page.labels_seen, vec!["Calculating...", "Calculate Estimate"]);
        assert_eq!(page.label, "Calculate Estimate");
        assert!(page.alerts.is_empty());
    }

    #[test]
    fn result_stays_hidden_during_the_delay() {
        let surface = FakeSurface::new(&["a"]);
        let mut calculation = submit(surface.clone(), &EstimateConfig::default(), 0).unwrap();

        assert_eq!(calculation.advance(), Step::Wait(800));
        assert!(surface.0.borrow().result_hidden);
        assert_eq!(surface.0.borrow().label, "Calculating...");

        assert_eq!(calculation.advance(), Step::Done);
        assert!(!surface.0.borrow().result_hidden);
    }

    #[test]
    fn second_click_while_calculating_restores_idle_label() {
        let surface = FakeSurface::new(&["Dublin", "Cork", "12"]);
        let config = EstimateConfig::default();
        let clock = VirtualClock::new();

        let mut first = submit(surface.clone(), &config, 1).unwrap();
        assert_eq!(first.advance(), Step::Wait(800));
        assert_eq!(surface.0.borrow().label, "Calculating...");

        let mut second = submit(surface.clone(), &config, 2).unwrap();
        clock.run(&mut first);
        clock.run(&mut second);

        let page = surface.0.borrow();
        assert_eq!(page.label, "Calculate Estimate");
        assert_eq!(page.labels_seen.last().map(String::as_str), Some("Calculate Estimate"));
        assert_eq!(page.price.as_deref(), Some("€ 142.00"));
    }

    #[test]
    fn empty_field_warns_and_changes_nothing() {
        let surface = FakeSurface::new(&["Dublin", "", "12"]);
        let config = EstimateConfig::default();

        assert!(submit(surface.clone(), &config, 3).is_none());

        let page = surface.0.borrow();
        assert_eq!(page.alerts, vec![config.incomplete_message.clone()]);
        assert!(page.result_hidden);
        assert_eq!(page.label, "Calculate Estimate");
        assert!(page.labels_seen.is_empty());
    }

    #[test]
    fn every_jitter_gives_a_price_in_range() {
        let config = EstimateConfig::default();
        for sample in [0.0, 0.25, 0.5, 0.999_999, 1.0] {
            let jitter = jitter_from_unit(sample, config.spread);
            assert!(jitter < 20);
            assert!(price_in_range(&quote(config.base_price, jitter)));
        }
        assert_eq!(quote(140, 19), "€ 159.00");
    }
}
