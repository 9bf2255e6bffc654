//! Counter Badges
//!
//! Wishlist and cart counters. The counts live in signals; an effect mirrors
//! each one into its header badge and pulses the badge when it goes up.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::catalog::Catalog;
use crate::components::QuickAddButton;
use crate::config::CounterConfig;
use crate::dom::{self, Listeners, TimerSlot};
use crate::error::UiResult;

/// A count that never goes below zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter(u32);

impl Counter {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// Reactive counter shown in a header badge
#[derive(Debug, Clone, Copy)]
pub struct CounterBadge {
    count: RwSignal<Counter>,
}

impl Default for CounterBadge {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterBadge {
    pub fn new() -> Self {
        Self {
            count: RwSignal::new(Counter::default()),
        }
    }

    pub fn value(&self) -> u32 {
        self.count.get_untracked().value()
    }

    pub fn count(&self) -> Counter {
        self.count.get_untracked()
    }

    pub fn set(&self, count: Counter) {
        self.count.set(count);
    }

    pub fn increment(&self) {
        self.count.update(|c| *c = c.increment());
    }

    /// Mirror the count into `badge`
    pub fn bind(&self, badge: Element) {
        let count = self.count;
        Effect::new(move |previous: Option<u32>| {
            let value = count.get().value();
            badge.set_text_content(Some(&value.to_string()));
            if previous.is_some_and(|p| value > p) {
                dom::set_style(&badge, "animation", "pulse 0.5s");
            }
            value
        });
    }
}

/// The two page counters
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub wishlist: CounterBadge,
    pub cart: CounterBadge,
}

impl Counters {
    pub fn new() -> Self {
        Self {
            wishlist: CounterBadge::new(),
            cart: CounterBadge::new(),
        }
    }

    /// Bind `.wishlist .badge` and `.cart .badge` when present
    pub fn bind_badges(&self) -> UiResult<()> {
        let doc = dom::document()?;
        match dom::query(&doc, ".wishlist .badge") {
            Some(badge) => self.wishlist.bind(badge),
            None => log::debug!("[COUNTERS] no wishlist badge"),
        }
        match dom::query(&doc, ".cart .badge") {
            Some(badge) => self.cart.bind(badge),
            None => log::debug!("[COUNTERS] no cart badge"),
        }
        Ok(())
    }
}

const FAVORITE_COLOR: &str = "#e74c3c";
const UNFAVORITE_COLOR: &str = "#999";

/// What a heart click does to the icon and the wishlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub add_class: &'static str,
    pub remove_class: &'static str,
    pub color: &'static str,
    pub wishlist: Counter,
}

/// Flip card `order` and derive the icon state and the new wishlist count
pub fn toggle_favorite(catalog: &mut Catalog, order: usize, wishlist: Counter) -> Option<FavoriteToggle> {
    let toggle = if catalog.toggle_favorite(order)? {
        FavoriteToggle {
            add_class: "fas",
            remove_class: "far",
            color: FAVORITE_COLOR,
            wishlist: wishlist.increment(),
        }
    } else {
        FavoriteToggle {
            add_class: "far",
            remove_class: "fas",
            color: UNFAVORITE_COLOR,
            wishlist: wishlist.decrement(),
        }
    };
    Some(toggle)
}

/// Heart icons inside product cards
pub struct FavoriteBinding {
    _listeners: Listeners,
}

impl FavoriteBinding {
    pub fn attach(cards: &[Element], catalog: Rc<RefCell<Catalog>>, wishlist: CounterBadge) -> UiResult<Option<Self>> {
        let mut listeners = Listeners::default();
        for (order, card) in cards.iter().enumerate() {
            let Some(icon) = dom::query_in(card, ".product-favorite i") else {
                continue;
            };
            let catalog = catalog.clone();
            let target = icon.clone();
            listeners.on(&icon, "click", move |ev| {
                ev.stop_propagation();
                let Some(toggle) = toggle_favorite(&mut catalog.borrow_mut(), order, wishlist.count()) else {
                    return;
                };
                dom::set_class(&target, toggle.remove_class, false);
                dom::set_class(&target, toggle.add_class, true);
                dom::set_style(&target, "color", toggle.color);
                wishlist.set(toggle.wishlist);
            })?;
        }
        if listeners.len() == 0 {
            return Ok(None);
        }
        Ok(Some(Self { _listeners: listeners }))
    }
}

/// `.add-to-cart` buttons plus a quick-add button mounted into each card
pub struct CartBinding {
    _reverts: Vec<TimerSlot>,
    _listeners: Listeners,
}

impl CartBinding {
    pub fn attach(cards: &[Element], cart: CounterBadge, config: CounterConfig) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let mut listeners = Listeners::default();
        let mut reverts = Vec::new();

        for button in dom::query_all(&doc, ".add-to-cart") {
            let original = dom::text(&button);
            let revert = TimerSlot::default();
            reverts.push(revert.clone());
            let target = button.clone();
            let revert_ms = config.cart_revert_ms;
            listeners.on(&button, "click", move |ev| {
                ev.stop_propagation();
                target.set_text_content(Some("ADDED!"));
                dom::set_style(&target, "background", "#27ae60");
                cart.increment();
                let target = target.clone();
                let original = original.clone();
                revert.schedule(revert_ms, move || {
                    target.set_text_content(Some(&original));
                    dom::set_style(&target, "background", "#000");
                });
            })?;
        }

        for card in cards {
            let Some(html) = card.dyn_ref::<HtmlElement>().cloned() else {
                continue;
            };
            let (hovered, set_hovered) = signal(false);
            let image = dom::query_in(card, "img");
            {
                let image = image.clone();
                listeners.on(card, "mouseenter", move |_| {
                    set_hovered.set(true);
                    if let Some(img) = &image {
                        dom::set_style(img, "transform", "scale(1.05)");
                    }
                })?;
            }
            listeners.on(card, "mouseleave", move |_| {
                set_hovered.set(false);
                if let Some(img) = &image {
                    dom::set_style(img, "transform", "scale(1)");
                }
            })?;

            dom::set_style(card, "position", "relative");
            let revert_ms = config.quick_add_revert_ms;
            leptos::mount::mount_to(html, move || {
                view! { <QuickAddButton cart=cart hovered=hovered revert_ms=revert_ms /> }
            })
            .forget();
        }

        if listeners.len() == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            _reverts: reverts,
            _listeners: listeners,
        }))
    }
}
