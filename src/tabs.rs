//! Product Tabs
//!
//! Switches the product grid between categories with a fade out, a card
//! swap and a staggered fade in. Clicks during a running switch are dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use web_sys::Element;

use crate::catalog::{CardVisibility, Catalog};
use crate::config::{CategoryTab, TabsConfig};
use crate::dom::{self, Listeners};
use crate::error::UiResult;

/// Outcome of a tab click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRequest {
    /// A switch is already running
    Ignored,
    /// The tab became active but its label maps to no category
    Unmapped,
    /// Swap the grid to this category key
    Switch(String),
}

#[derive(Debug)]
pub struct TabSwitcher {
    categories: Vec<CategoryTab>,
    active: Option<usize>,
    transitioning: bool,
}

impl TabSwitcher {
    pub fn new(categories: Vec<CategoryTab>) -> Self {
        Self {
            categories,
            active: None,
            transitioning: false,
        }
    }

    pub fn category_for(&self, label: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|tab| tab.label == label.trim())
            .map(|tab| tab.key.as_str())
    }

    /// Tab `index` with text `label` was clicked.
    pub fn begin(&mut self, index: usize, label: &str) -> TabRequest {
        if self.transitioning {
            return TabRequest::Ignored;
        }
        self.active = Some(index);
        match self.category_for(label).map(str::to_string) {
            Some(key) => {
                self.transitioning = true;
                TabRequest::Switch(key)
            }
            None => TabRequest::Unmapped,
        }
    }

    pub fn finish(&mut self) {
        self.transitioning = false;
    }

    #[cfg(test)]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<usize> {
        self.active
    }
}

/// Card reveal animation. The delay lives in the shorthand, which would
/// otherwise reset `animation-delay`.
pub fn card_animation(delay_ms: u32) -> String {
    format!("fadeInUp 0.6s ease-out {delay_ms}ms forwards")
}

struct TabsShared {
    tabs: Vec<Element>,
    grid: Element,
    cards: Vec<Element>,
    catalog: Rc<RefCell<Catalog>>,
    switcher: RefCell<TabSwitcher>,
    config: TabsConfig,
    alive: Cell<bool>,
}

impl TabsShared {
    fn mark_active(&self, index: usize) {
        for (i, tab) in self.tabs.iter().enumerate() {
            dom::set_class(tab, "active", i == index);
        }
    }

    fn fade_out(&self) {
        dom::set_style(&self.grid, "transition", "opacity 0.3s ease, transform 0.3s ease");
        dom::set_style(&self.grid, "opacity", "0");
        dom::set_style(&self.grid, "transform", "translateY(20px)");
    }

    fn fade_in(&self) {
        dom::set_style(&self.grid, "opacity", "1");
        dom::set_style(&self.grid, "transform", "translateY(0)");
    }

    fn swap_cards(&self, key: &str) {
        let plan = self.catalog.borrow_mut().show_category(key, self.config.stagger_ms);
        for (card, visibility) in self.cards.iter().zip(plan) {
            match visibility {
                CardVisibility::Shown { delay_ms } => {
                    dom::set_style(card, "display", "block");
                    dom::set_style(card, "animation", &card_animation(delay_ms));
                }
                CardVisibility::Hidden => {
                    dom::set_style(card, "display", "none");
                    dom::set_style(card, "animation", "");
                }
            }
        }
        if self.catalog.borrow().visible_count() == 0 {
            log::warn!("[TABS] no products found for category: {key}");
        }
    }

    /// First tab's category, shown without animation
    fn show_initial(&self) {
        let Some(first) = self.tabs.first() else {
            return;
        };
        let Some(key) = self.switcher.borrow().category_for(&dom::text(first)).map(str::to_string) else {
            return;
        };
        let plan = self.catalog.borrow_mut().show_category(&key, 0);
        for (card, visibility) in self.cards.iter().zip(plan) {
            let shown = matches!(visibility, CardVisibility::Shown { .. });
            dom::set_style(card, "display", if shown { "block" } else { "none" });
            dom::set_style(card, "opacity", if shown { "1" } else { "0" });
        }
        self.fade_in();
    }

    fn on_click(self: &Rc<Self>, index: usize) {
        let label = dom::text(&self.tabs[index]);
        let request = self.switcher.borrow_mut().begin(index, &label);
        match request {
            TabRequest::Ignored => {}
            TabRequest::Unmapped => {
                self.mark_active(index);
                log::warn!("[TABS] tab {label:?} has no category");
            }
            TabRequest::Switch(key) => {
                self.mark_active(index);
                self.fade_out();
                let shared = self.clone();
                spawn_local(async move {
                    TimeoutFuture::new(shared.config.fade_ms).await;
                    if !shared.alive.get() {
                        return;
                    }
                    shared.swap_cards(&key);
                    shared.fade_in();
                    shared.switcher.borrow_mut().finish();
                });
            }
        }
    }
}

pub struct TabsBinding {
    shared: Rc<TabsShared>,
    _listeners: Listeners,
}

impl TabsBinding {
    /// Inert without `.product-tabs .tab` elements or `#productsGrid`
    pub fn attach(config: TabsConfig, catalog: Rc<RefCell<Catalog>>, cards: Vec<Element>) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let tabs = dom::query_all(&doc, ".product-tabs .tab");
        let Some(grid) = doc.get_element_by_id("productsGrid") else {
            log::debug!("[TABS] no #productsGrid, tabs disabled");
            return Ok(None);
        };
        if tabs.is_empty() {
            log::debug!("[TABS] no tabs found, tabs disabled");
            return Ok(None);
        }

        let shared = Rc::new(TabsShared {
            switcher: RefCell::new(TabSwitcher::new(config.categories.clone())),
            tabs,
            grid,
            cards,
            catalog,
            config,
            alive: Cell::new(true),
        });

        let mut listeners = Listeners::default();
        for (index, tab) in shared.tabs.iter().enumerate() {
            let shared = shared.clone();
            listeners.on(tab, "click", move |_| shared.on_click(index))?;
        }

        shared.show_initial();
        Ok(Some(Self {
            shared,
            _listeners: listeners,
        }))
    }
}

impl Drop for TabsBinding {
    fn drop(&mut self) {
        self.shared.alive.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabsConfig;

    fn switcher() -> TabSwitcher {
        TabSwitcher::new(TabsConfig::default().categories)
    }

    #[test]
    fn test_label_maps_to_category() {
        let switcher = switcher();
        assert_eq!(switcher.category_for("Headlight"), Some("headlight"));
        assert_eq!(switcher.category_for("  Tires & Wheels \n"), Some("tires-wheels"));
        assert_eq!(switcher.category_for("Brakes"), None);
    }

    #[test]
    fn test_clicks_ignored_while_transitioning() {
        let mut switcher = switcher();
        assert_eq!(switcher.begin(1, "Headlight"), TabRequest::Switch("headlight".to_string()));
        assert!(switcher.is_transitioning());
        assert_eq!(switcher.begin(2, "Automotive Rims"), TabRequest::Ignored);
        assert_eq!(switcher.active(), Some(1));

        switcher.finish();
        assert_eq!(
            switcher.begin(2, "Automotive Rims"),
            TabRequest::Switch("automotive-rims".to_string())
        );
        assert_eq!(switcher.active(), Some(2));
    }

    #[test]
    fn test_card_animation_carries_stagger_delay() {
        assert_eq!(card_animation(0), "fadeInUp 0.6s ease-out 0ms forwards");
        assert_eq!(card_animation(200), "fadeInUp 0.6s ease-out 200ms forwards");
    }

    #[test]
    fn test_unmapped_tab_activates_without_locking() {
        let mut switcher = switcher();
        assert_eq!(switcher.begin(3, "Brakes"), TabRequest::Unmapped);
        assert_eq!(switcher.active(), Some(3));
        assert!(!switcher.is_transitioning());
    }
}
