//! Scroll Reveal
//!
//! Cards start faded and shifted down, then slide in once they enter the
//! viewport.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::RevealConfig;
use crate::dom;
use crate::error::UiResult;

const REVEAL_SELECTOR: &str = ".product-card, .category-card, .service-card, .testimonial-card, .news-card";

/// Transition for the card at `index`, staggered by `stagger_ms` per card
pub fn staggered_transition(index: usize, stagger_ms: u32) -> String {
    let delay = u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(stagger_ms);
    format!("opacity 0.6s ease {delay}ms, transform 0.6s ease {delay}ms")
}

/// `rootMargin` that shrinks the viewport bottom by `px`
pub fn root_margin(bottom_margin_px: u32) -> String {
    format!("0px 0px -{bottom_margin_px}px 0px")
}

pub struct RevealBinding {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl RevealBinding {
    pub fn attach(config: RevealConfig) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        for img in dom::query_all(&doc, ".product-card img, .news-card img") {
            dom::set_style(&img, "transition", "transform 0.3s ease");
        }

        let elements = dom::query_all(&doc, REVEAL_SELECTOR);
        if elements.is_empty() {
            return Ok(None);
        }

        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        dom::set_style(&target, "opacity", "1");
                        dom::set_style(&target, "transform", "translateY(0)");
                    }
                }
            },
        );
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(&root_margin(config.bottom_margin_px));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        for (index, el) in elements.iter().enumerate() {
            dom::set_style(el, "opacity", "0");
            dom::set_style(el, "transform", "translateY(20px)");
            dom::set_style(el, "transition", &staggered_transition(index, config.stagger_ms));
            observer.observe(el);
        }
        Ok(Some(Self {
            observer,
            _callback: callback,
        }))
    }
}

impl Drop for RevealBinding {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staggered_transition() {
        assert_eq!(staggered_transition(0, 100), "opacity 0.6s ease 0ms, transform 0.6s ease 0ms");
        assert_eq!(staggered_transition(3, 100), "opacity 0.6s ease 300ms, transform 0.6s ease 300ms");
    }

    #[test]
    fn test_root_margin() {
        assert_eq!(root_margin(50), "0px 0px -50px 0px");
    }
}
