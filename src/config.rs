use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional `<script type="application/json">` block that
/// overrides any of the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "landing-fx-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Local builds via `trunk serve`
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub typing: TypingConfig,
    pub nav_threshold_px: f64,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub estimate: EstimateConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            typing: TypingConfig::default(),
            nav_threshold_px: 50.0,
            reveal: RevealConfig::default(),
            counter: CounterConfig::default(),
            estimate: EstimateConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub title: String,
    pub subtitle: String,
    pub initial_delay_ms: u32,
    pub title_char_ms: u32,
    pub pause_ms: u32,
    pub subtitle_char_ms: u32,
    pub fade_ms: u32,
    pub cta_reassert_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            title: "Reliable Logistics in Ireland.".to_string(),
            subtitle: "Connecting businesses with speed, precision, and trust across the Emerald Isle."
                .to_string(),
            initial_delay_ms: 3000,
            title_char_ms: 50,
            pause_ms: 300,
            subtitle_char_ms: 30,
            fade_ms: 500,
            cta_reassert_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: u32,
    pub tick_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            tick_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    pub delay_ms: u32,
    pub base_price: u32,
    /// Width of the random add-on, drawn from `[0, spread)`.
    pub spread: u32,
    pub busy_label: String,
    /// What the button reads once a calculation is done.
    pub idle_label: String,
    pub incomplete_message: String,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            delay_ms: 800,
            base_price: 140,
            spread: 20,
            busy_label: "Calculating...".to_string(),
            idle_label: "Calculate Estimate".to_string(),
            incomplete_message: "Please fill in all fields (mockup).".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the override block if the page has one. A malformed block is
    /// logged and the defaults are used instead.
    pub fn from_document(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring #{CONFIG_ELEMENT_ID}: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(
            r#"{ "typing": { "title": "Hello." }, "estimate": { "base_price": 90 } }"#,
        )
        .unwrap();

        assert_eq!(config.typing.title, "Hello.");
        assert_eq!(config.typing.subtitle, TypingConfig::default().subtitle);
        assert_eq!(config.typing.title_char_ms, 50);
        assert_eq!(config.estimate.base_price, 90);
        assert_eq!(config.estimate.delay_ms, 800);
        assert_eq!(config.nav_threshold_px, 50.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PageConfig::from_json("{ typing: ").is_err());
    }

    #[test]
    fn defaults_match_page_timings() {
        let config = PageConfig::default();
        assert_eq!(config.typing.initial_delay_ms, 3000);
        assert_eq!(config.typing.pause_ms, 300);
        assert_eq!(config.typing.subtitle_char_ms, 30);
        assert_eq!(config.typing.fade_ms, 500);
        assert_eq!(config.typing.cta_reassert_ms, 400);
        assert_eq!(config.counter, CounterConfig { duration_ms: 2000, tick_ms: 16 });
        assert_eq!(config.reveal.threshold, 0.15);
    }
}
