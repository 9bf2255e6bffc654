//! Search Highlighter
//!
//! Case-insensitive title search over the product cards. Matches get a
//! temporary border and are scrolled into view.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, KeyboardEvent, ScrollLogicalPosition};

use crate::config::SearchConfig;
use crate::dom::{self, Listeners, TimerSlot};
use crate::error::UiResult;

const HIGHLIGHT_BORDER: &str = "2px solid #e74c3c";
const RESTING_BORDER: &str = "1px solid #eee";

/// Lowercased, trimmed query; `None` when blank
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

/// Indices of titles containing `query` (already normalized)
pub fn matching_titles<S: AsRef<str>>(query: &str, titles: &[S]) -> Vec<usize> {
    titles
        .iter()
        .enumerate()
        .filter(|(_, title)| title.as_ref().to_lowercase().contains(query))
        .map(|(i, _)| i)
        .collect()
}

/// A product title and the card it highlights
struct SearchTarget {
    title: Element,
    card: Element,
    clear: TimerSlot,
}

struct SearchShared {
    input: HtmlInputElement,
    targets: Vec<SearchTarget>,
    highlight_ms: u32,
}

impl SearchShared {
    fn perform(&self) {
        let Some(query) = normalize_query(&self.input.value()) else {
            log::debug!("[SEARCH] empty query");
            return;
        };
        let titles: Vec<String> = self.targets.iter().map(|t| dom::text(&t.title)).collect();
        let matches = matching_titles(&query, &titles);
        if matches.is_empty() {
            log::warn!("[SEARCH] no products match {query:?}");
        }
        for index in matches {
            let target = &self.targets[index];
            dom::set_style(&target.card, "border", HIGHLIGHT_BORDER);
            dom::scroll_into_view(&target.card, ScrollLogicalPosition::Center);
            let card = target.card.clone();
            target.clear.schedule(self.highlight_ms, move || {
                dom::set_style(&card, "border", RESTING_BORDER);
            });
        }
    }
}

pub struct SearchBinding {
    _listeners: Listeners,
}

impl SearchBinding {
    /// Inert without both `.search-btn` and `.search-input`
    pub fn attach(config: SearchConfig) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let button = dom::query(&doc, ".search-btn");
        let input = dom::query(&doc, ".search-input").and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let (Some(button), Some(input)) = (button, input) else {
            log::debug!("[SEARCH] search controls missing");
            return Ok(None);
        };

        let targets = dom::query_all(&doc, ".product-card h4")
            .into_iter()
            .filter_map(|title| {
                let card = title.parent_element()?;
                Some(SearchTarget {
                    title,
                    card,
                    clear: TimerSlot::default(),
                })
            })
            .collect();
        let shared = Rc::new(SearchShared {
            input: input.clone(),
            targets,
            highlight_ms: config.highlight_ms,
        });

        let mut listeners = Listeners::default();
        {
            let shared = shared.clone();
            listeners.on(&button, "click", move |_| shared.perform())?;
        }
        listeners.on(&input, "keypress", move |ev| {
            if ev.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Enter") {
                shared.perform();
            }
        })?;
        Ok(Some(Self { _listeners: listeners }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Tire "), Some("tire".to_string()));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_tire_matches_case_insensitively() {
        let titles = ["All-Season TIRE 205/55", "LED Headlight Kit", "Winter tires x4", "Chrome Rim"];
        assert_eq!(matching_titles("tire", &titles), vec![0, 2]);
    }

    #[test]
    fn test_no_matches() {
        let titles = vec!["Chrome Rim".to_string()];
        assert!(matching_titles("wiper", &titles).is_empty());
    }
}
