//! Storefront Configuration
//!
//! Every delay and threshold the page behaviors use. The defaults match the
//! stock storefront; a page can override any field with an inline JSON block:
//!
//! ```html
//! <script type="application/json" id="storefront-config">
//!   { "nav": { "close_delay_ms": 600 }, "log_level": "debug" }
//! </script>
//! ```

use serde::Deserialize;

use crate::dom;
use crate::error::UiResult;

/// Id of the inline JSON element read by [`StorefrontConfig::from_page`]
pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    pub scroll: ScrollConfig,
    pub nav: NavConfig,
    pub tabs: TabsConfig,
    pub counters: CounterConfig,
    pub countdown: CountdownConfig,
    pub search: SearchConfig,
    pub notify: NotifyConfig,
    pub newsletter: NewsletterConfig,
    pub reveal: RevealConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            scroll: ScrollConfig::default(),
            nav: NavConfig::default(),
            tabs: TabsConfig::default(),
            counters: CounterConfig::default(),
            countdown: CountdownConfig::default(),
            search: SearchConfig::default(),
            notify: NotifyConfig::default(),
            newsletter: NewsletterConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_json(json: &str) -> UiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the inline config block; defaults when the page has none.
    pub fn from_page() -> UiResult<Self> {
        let block = dom::document()
            .ok()
            .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty());
        match block {
            Some(json) => Self::from_json(&json),
            None => Ok(Self::default()),
        }
    }

    /// Unknown level names fall back to `info`
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

/// Header behavior thresholds, in pixels of vertical scroll
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub scrolled_class_at: f64,
    pub scroll_top_at: f64,
    pub hide_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrolled_class_at: 50.0,
            scroll_top_at: 300.0,
            hide_threshold: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Viewports at or below this width use click toggling
    pub breakpoint_px: f64,
    pub close_delay_ms: u32,
    pub link_collapse_ms: u32,
    pub link_flash_ms: u32,
    pub resize_debounce_ms: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 768.0,
            close_delay_ms: 400,
            link_collapse_ms: 400,
            link_flash_ms: 300,
            resize_debounce_ms: 250,
        }
    }
}

/// A tab label and the `data-category` value it selects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryTab {
    pub label: String,
    pub key: String,
}

impl CategoryTab {
    fn new(label: &str, key: &str) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    pub fade_ms: u32,
    pub stagger_ms: u32,
    pub categories: Vec<CategoryTab>,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            fade_ms: 300,
            stagger_ms: 100,
            categories: vec![
                CategoryTab::new("Tires & Wheels", "tires-wheels"),
                CategoryTab::new("Headlight", "headlight"),
                CategoryTab::new("Automotive Rims", "automotive-rims"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub cart_revert_ms: u32,
    pub quick_add_revert_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cart_revert_ms: 2000,
            quick_add_revert_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub days: u32,
    pub tick_ms: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            days: 7,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub highlight_ms: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { highlight_ms: 3000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub visible_ms: u32,
    pub exit_ms: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            visible_ms: 3000,
            exit_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub revert_ms: u32,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self { revert_ms: 2000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub stagger_ms: u32,
    pub threshold: f64,
    pub bottom_margin_px: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 100,
            threshold: 0.1,
            bottom_margin_px: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        let config = StorefrontConfig::from_json("{}").unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = StorefrontConfig::from_json(
            r#"{ "nav": { "close_delay_ms": 600 }, "log_level": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.nav.close_delay_ms, 600);
        assert_eq!(config.nav.breakpoint_px, 768.0);
        assert_eq!(config.log_level(), log::Level::Debug);
        assert_eq!(config.tabs.categories.len(), 3);
    }

    #[test]
    fn test_category_override_replaces_map() {
        let config = StorefrontConfig::from_json(
            r#"{ "tabs": { "categories": [ { "label": "Brakes", "key": "brakes" } ] } }"#,
        )
        .unwrap();
        assert_eq!(config.tabs.categories, vec![CategoryTab::new("Brakes", "brakes")]);
        assert_eq!(config.tabs.fade_ms, 300);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = StorefrontConfig::from_json("{ nav: ").unwrap_err();
        assert!(matches!(err, crate::error::UiError::Config(_)));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = StorefrontConfig {
            log_level: "chatty".to_string(),
            ..StorefrontConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
