//! Hero typing effect: the title and then the subtitle are typed one
//! character at a time behind a blinking caret, after which the caret fades
//! away and the call-to-action is revealed.
//!
//! The sequence is a plain state machine; `advance` performs one transition
//! and says how long to wait before the next. There is exactly one caret,
//! owned by the sequencer and moved from the title to the subtitle.

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

use crate::clock::{Machine, Step};
use crate::config::TypingConfig;

pub const TITLE_ID: &str = "hero-title";
pub const SUBTITLE_ID: &str = "hero-subtitle";
pub const CTA_ID: &str = "hero-cta";
pub const BRAND_ID: &str = "hero-brand";
pub const CARET_CLASS: &str = "typing-cursor";
pub const REVEAL_CLASS: &str = "reveal-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Title,
    Subtitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    WaitInitial,
    TypingTitle,
    PauseBetween,
    TypingSubtitle,
    FadingCaret,
    Revealed,
}

pub trait HeroSurface {
    type Caret;

    /// Both text containers are present.
    fn has_containers(&self) -> bool;
    fn clear(&mut self);
    fn create_caret(&mut self) -> Option<Self::Caret>;
    fn attach_caret(&mut self, caret: &Self::Caret, slot: Slot);
    fn detach_caret(&mut self, caret: &Self::Caret, slot: Slot);
    /// Inserts `ch` immediately before the caret.
    fn type_char(&mut self, caret: &Self::Caret, ch: char);
    /// Stops the blink and starts fading the caret out over `fade_ms`.
    fn fade_caret(&mut self, caret: &Self::Caret, fade_ms: u32);
    fn reveal_cta(&mut self);
    fn reveal_brand(&mut self);
}

pub struct TypingSequencer<S: HeroSurface> {
    surface: S,
    config: TypingConfig,
    phase: Phase,
    caret: Option<S::Caret>,
    text: Vec<char>,
    typed: usize,
    cta_reasserted: bool,
}

impl<S: HeroSurface> TypingSequencer<S> {
    pub fn new(surface: S, config: TypingConfig) -> Self {
        Self {
            surface,
            config,
            phase: Phase::Idle,
            caret: None,
            text: Vec::new(),
            typed: 0,
            cta_reasserted: false,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn begin(&mut self, phase: Phase) {
        let text = match phase {
            Phase::TypingTitle => &self.config.title,
            _ => &self.config.subtitle,
        };
        self.text = text.chars().collect();
        self.typed = 0;
        self.phase = phase;
    }

    fn type_next(&mut self) -> Step {
        let Some(caret) = self.caret.as_ref() else {
            return Step::Done;
        };

        if let Some(&ch) = self.text.get(self.typed) {
            self.surface.type_char(caret, ch);
            self.typed += 1;
            return Step::Wait(match self.phase {
                Phase::TypingTitle => self.config.title_char_ms,
                _ => self.config.subtitle_char_ms,
            });
        }

        if self.phase == Phase::TypingTitle {
            self.phase = Phase::PauseBetween;
            Step::Wait(self.config.pause_ms)
        } else {
            self.surface.fade_caret(caret, self.config.fade_ms);
            self.phase = Phase::FadingCaret;
            Step::Wait(self.config.fade_ms)
        }
    }
}

impl<S: HeroSurface> Machine for TypingSequencer<S> {
    fn advance(&mut self) -> Step {
        match self.phase {
            Phase::Idle => {
                if !self.surface.has_containers() {
                    return Step::Done;
                }
                self.surface.clear();
                let Some(caret) = self.surface.create_caret() else {
                    return Step::Done;
                };
                self.surface.attach_caret(&caret, Slot::Title);
                self.caret = Some(caret);
                self.phase = Phase::WaitInitial;
                Step::Wait(self.config.initial_delay_ms)
            }
            Phase::WaitInitial => {
                self.begin(Phase::TypingTitle);
                self.type_next()
            }
            Phase::TypingTitle | Phase::TypingSubtitle => self.type_next(),
            Phase::PauseBetween => {
                if let Some(caret) = self.caret.as_ref() {
                    self.surface.detach_caret(caret, Slot::Title);
                    self.surface.attach_caret(caret, Slot::Subtitle);
                }
                self.begin(Phase::TypingSubtitle);
                self.type_next()
            }
            Phase::FadingCaret => {
                if let Some(caret) = self.caret.take() {
                    self.surface.detach_caret(&caret, Slot::Subtitle);
                }
                self.surface.reveal_cta();
                self.surface.reveal_brand();
                self.phase = Phase::Revealed;
                Step::Wait(self.config.cta_reassert_ms)
            }
            Phase::Revealed => {
                if !self.cta_reasserted {
                    self.cta_reasserted = true;
                    self.surface.reveal_cta();
                }
                Step::Done
            }
        }
    }
}

/// The hero section as found in the document.
pub struct HeroElements {
    document: Document,
    title: Option<Element>,
    subtitle: Option<Element>,
    cta: Option<Element>,
}

impl HeroElements {
    pub fn find(document: &Document) -> Self {
        Self {
            document: document.clone(),
            title: document.get_element_by_id(TITLE_ID),
            subtitle: document.get_element_by_id(SUBTITLE_ID),
            cta: document.get_element_by_id(CTA_ID),
        }
    }

    fn slot(&self, slot: Slot) -> Option<&Element> {
        match slot {
            Slot::Title => self.title.as_ref(),
            Slot::Subtitle => self.subtitle.as_ref(),
        }
    }
}

impl HeroSurface for HeroElements {
    type Caret = HtmlElement;

    fn has_containers(&self) -> bool {
        self.title.is_some() && self.subtitle.is_some()
    }

    fn clear(&mut self) {
        for el in [&self.title, &self.subtitle].into_iter().flatten() {
            el.set_inner_html("");
        }
    }

    fn create_caret(&mut self) -> Option<HtmlElement> {
        let caret = self
            .document
            .create_element("span")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        caret.set_class_name(CARET_CLASS);
        Some(caret)
    }

    fn attach_caret(&mut self, caret: &HtmlElement, slot: Slot) {
        if let Some(container) = self.slot(slot) {
            let _ = container.append_child(caret);
        }
    }

    fn detach_caret(&mut self, caret: &HtmlElement, slot: Slot) {
        if let Some(container) = self.slot(slot) {
            let node: &Node = caret;
            if container.contains(Some(node)) {
                let _ = container.remove_child(caret);
            }
        }
    }

    fn type_char(&mut self, caret: &HtmlElement, ch: char) {
        let Some(parent) = caret.parent_node() else {
            return;
        };
        let text = self.document.create_text_node(ch.encode_utf8(&mut [0; 4]));
        let before: &Node = caret;
        let _ = parent.insert_before(&text, Some(before));
    }

    fn fade_caret(&mut self, caret: &HtmlElement, fade_ms: u32) {
        let style = caret.style();
        let _ = style.set_property("animation", "none");
        let _ = style.set_property(
            "transition",
            &format!("opacity {}s ease-out", f64::from(fade_ms) / 1000.0),
        );
        let _ = style.set_property("opacity", "0");
    }

    fn reveal_cta(&mut self) {
        if let Some(cta) = &self.cta {
            let _ = cta.class_list().add_1(REVEAL_CLASS);
        }
    }

    fn reveal_brand(&mut self) {
        if let Some(brand) = self.document.get_element_by_id(BRAND_ID) {
            let _ = brand.class_list().add_1(REVEAL_CLASS);
        }
    }
}

pub fn attach(document: &Document, config: &TypingConfig) {
    let hero = HeroElements::find(document);
    if !hero.has_containers() {
        debug!("No hero title/subtitle, skipping typing effect");
        return;
    }
    crate::clock::spawn(TypingSequencer::new(hero, config.clone()));
}
