use std::rc::Rc;

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Object, Reflect};
use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};

use crate::dom;

pub const DOT_ID: &str = "cursor-dot";
pub const OUTLINE_ID: &str = "cursor-outline";
pub const HOVER_TRIGGERS: &str = "a, button, [data-hover-trigger]";
pub const HOVER_CLASS: &str = "hovering";
pub const OUTLINE_LAG_MS: f64 = 500.0;
/// The outline keeps its last keyframe once the animation ends.
pub const OUTLINE_FILL: &str = "forwards";

pub fn px(v: i32) -> String {
    format!("{v}px")
}

pub trait PointerSurface {
    /// Both the dot and the outline marker are on the page.
    fn has_markers(&self) -> bool;
    fn place_dot(&self, left: &str, top: &str);
    fn glide_outline(&self, left: &str, top: &str, duration_ms: f64, fill: &str);
    fn set_hovering(&self, on: bool);
}

/// Dot snaps to the pointer; the outline eases toward it. Touch layouts
/// drop the two markers, and then there is no tracker at all, so hover
/// triggers never get wired either.
pub struct PointerTracker<S> {
    surface: S,
}

impl<S: PointerSurface> PointerTracker<S> {
    pub fn new(surface: S) -> Option<Self> {
        surface.has_markers().then(|| Self { surface })
    }

    pub fn on_move(&self, x: i32, y: i32) {
        let (left, top) = (px(x), px(y));
        self.surface.place_dot(&left, &top);
        self.surface
            .glide_outline(&left, &top, OUTLINE_LAG_MS, OUTLINE_FILL);
    }

    pub fn on_enter(&self) {
        self.surface.set_hovering(true);
    }

    pub fn on_leave(&self) {
        self.surface.set_hovering(false);
    }
}

struct CursorElements {
    dot: Option<HtmlElement>,
    outline: Option<HtmlElement>,
    root: Option<HtmlElement>,
}

impl CursorElements {
    fn find(document: &Document) -> Self {
        Self {
            dot: dom::html_element_by_id(document, DOT_ID),
            outline: dom::html_element_by_id(document, OUTLINE_ID),
            root: document.body(),
        }
    }
}

impl PointerSurface for CursorElements {
    fn has_markers(&self) -> bool {
        self.dot.is_some() && self.outline.is_some()
    }

    fn place_dot(&self, left: &str, top: &str) {
        if let Some(dot) = &self.dot {
            let style = dot.style();
            let _ = style.set_property("left", left);
            let _ = style.set_property("top", top);
        }
    }

    fn glide_outline(&self, left: &str, top: &str, duration_ms: f64, fill: &str) {
        if let Some(outline) = &self.outline {
            let _ = animate(outline, left, top, duration_ms, fill);
        }
    }

    fn set_hovering(&self, on: bool) {
        if let Some(root) = &self.root {
            let _ = dom::set_class(root, HOVER_CLASS, on);
        }
    }
}

/// `el.animate({ left, top }, { duration, fill })`, called through `Reflect`
/// so the keyframes stay plain objects.
fn animate(el: &HtmlElement, left: &str, top: &str, duration_ms: f64, fill: &str) -> Result<(), JsValue> {
    let keyframes = Object::new();
    Reflect::set(&keyframes, &"left".into(), &left.into())?;
    Reflect::set(&keyframes, &"top".into(), &top.into())?;

    let options = Object::new();
    Reflect::set(&options, &"duration".into(), &duration_ms.into())?;
    Reflect::set(&options, &"fill".into(), &fill.into())?;

    let animate: Function = Reflect::get(el, &"animate".into())?.dyn_into()?;
    animate.call2(el, &keyframes, &options)?;
    Ok(())
}

pub fn attach(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(tracker) = PointerTracker::new(CursorElements::find(document)) else {
        debug!("No cursor markers, skipping pointer tracking");
        return Ok(());
    };
    let tracker = Rc::new(tracker);

    let mover = tracker.clone();
    dom::listen(window, "mousemove", move |e: MouseEvent| {
        mover.on_move(e.client_x(), e.client_y());
    })?;

    for trigger in dom::query_all(document, HOVER_TRIGGERS)? {
        attach_hover(&trigger, &tracker)?;
    }
    Ok(())
}

fn attach_hover(trigger: &Element, tracker: &Rc<PointerTracker<CursorElements>>) -> Result<(), JsValue> {
    let entered = tracker.clone();
    dom::listen(trigger, "mouseenter", move |_: MouseEvent| entered.on_enter())?;
    let left = tracker.clone();
    dom::listen(trigger, "mouseleave", move |_: MouseEvent| left.on_leave())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Dot(String, String),
        Outline(String, String, f64, String),
        Hovering(bool),
    }

    #[derive(Default)]
    struct FakeCursor {
        missing_dot: bool,
        missing_outline: bool,
        calls: RefCell<Vec<Call>>,
    }

    impl PointerSurface for &FakeCursor {
        fn has_markers(&self) -> bool {
            !self.missing_dot && !self.missing_outline
        }

        fn place_dot(&self, left: &str, top: &str) {
            self.calls
                .borrow_mut()
                .push(Call::Dot(left.to_string(), top.to_string()));
        }

        fn glide_outline(&self, left: &str, top: &str, duration_ms: f64, fill: &str) {
            self.calls.borrow_mut().push(Call::Outline(
                left.to_string(),
                top.to_string(),
                duration_ms,
                fill.to_string(),
            ));
        }

        fn set_hovering(&self, on: bool) {
            self.calls.borrow_mut().push(Call::Hovering(on));
        }
    }

    #[test]
    fn test_px() {
        assert_eq!(px(0), "0px");
        assert_eq!(px(412), "412px");
        assert_eq!(px(-3), "-3px");
    }

    #[test]
    fn missing_marker_skips_everything() {
        let no_dot = FakeCursor {
            missing_dot: true,
            ..FakeCursor::default()
        };
        let no_outline = FakeCursor {
            missing_outline: true,
            ..FakeCursor::default()
        };

        assert!(PointerTracker::new(&no_dot).is_none());
        assert!(PointerTracker::new(&no_outline).is_none());
        assert!(no_dot.calls.borrow().is_empty());
        assert!(no_outline.calls.borrow().is_empty());
    }

    #[test]
    fn dot_snaps_and_outline_glides() {
        let cursor = FakeCursor::default();
        let tracker = PointerTracker::new(&cursor).unwrap();

        tracker.on_move(120, 48);

        assert_eq!(
            *cursor.calls.borrow(),
            vec![
                Call::Dot("120px".into(), "48px".into()),
                Call::Outline("120px".into(), "48px".into(), 500.0, "forwards".into()),
            ]
        );
    }

    #[test]
    fn hover_adds_then_removes() {
        let cursor = FakeCursor::default();
        let tracker = PointerTracker::new(&cursor).unwrap();

        tracker.on_enter();
        tracker.on_leave();

        assert_eq!(
            *cursor.calls.borrow(),
            vec![Call::Hovering(true), Call::Hovering(false)]
        );
    }
}
