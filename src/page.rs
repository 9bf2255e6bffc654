//! Page Links
//!
//! In-page anchor scrolling and category tile clicks.

use web_sys::ScrollLogicalPosition;

use crate::dom::{self, Listeners};
use crate::error::UiResult;

/// Element id an in-page `href` points at (`"#deals"` -> `"deals"`)
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub struct PageLinks {
    _listeners: Listeners,
}

impl PageLinks {
    pub fn attach() -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let mut listeners = Listeners::default();

        for anchor in dom::query_all(&doc, r##"a[href^="#"]"##) {
            let href = anchor.get_attribute("href").unwrap_or_default();
            let doc = doc.clone();
            listeners.on(&anchor, "click", move |ev| {
                ev.prevent_default();
                if let Some(target) = anchor_target(&href).and_then(|id| doc.get_element_by_id(id)) {
                    dom::scroll_into_view(&target, ScrollLogicalPosition::Start);
                }
            })?;
        }

        for item in dom::query_all(&doc, ".category-item") {
            let name = dom::query_in(&item, "span").map(|span| dom::text(&span)).unwrap_or_default();
            listeners.on(&item, "click", move |_| {
                log::info!("[CATEGORIES] selected category: {name}");
            })?;
        }

        if listeners.len() == 0 {
            return Ok(None);
        }
        Ok(Some(Self { _listeners: listeners }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_target() {
        assert_eq!(anchor_target("#deals"), Some("deals"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/shop#deals"), None);
    }
}
