//! Storefront Controller
//!
//! Owns every page behavior for one page instance. Each behavior attaches
//! independently; a missing anchor or a failed attach leaves that behavior
//! inert and the rest running. Dropping the controller detaches everything.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::PageTransitionEvent;

use crate::catalog::{Catalog, ProductCard};
use crate::config::StorefrontConfig;
use crate::countdown::CountdownBinding;
use crate::counters::{CartBinding, Counters, FavoriteBinding};
use crate::dom::{self, Listener};
use crate::error::UiResult;
use crate::nav::{CategoriesToggle, NavBinding, SidebarReset};
use crate::newsletter::NewsletterBinding;
use crate::notify::Notifier;
use crate::page::PageLinks;
use crate::reveal::RevealBinding;
use crate::scroll::ScrollBinding;
use crate::search::SearchBinding;
use crate::tabs::TabsBinding;

thread_local! {
    static ACTIVE: RefCell<Option<Storefront>> = const { RefCell::new(None) };
}

pub struct Storefront {
    counters: Counters,
    catalog: Rc<RefCell<Catalog>>,
    scroll: Option<ScrollBinding>,
    tabs: Option<TabsBinding>,
    favorites: Option<FavoriteBinding>,
    cart: Option<CartBinding>,
    countdown: Option<CountdownBinding>,
    nav: Option<NavBinding>,
    categories: Option<CategoriesToggle>,
    sidebar: Option<SidebarReset>,
    search: Option<SearchBinding>,
    newsletter: Option<NewsletterBinding>,
    links: Option<PageLinks>,
    reveal: Option<RevealBinding>,
}

/// Log and swallow an attach failure
fn settle<T>(name: &str, result: UiResult<Option<T>>) -> Option<T> {
    match result {
        Ok(Some(binding)) => {
            log::debug!("[APP] {name} attached");
            Some(binding)
        }
        Ok(None) => None,
        Err(err) => {
            log::warn!("[APP] {name} not attached: {err}");
            None
        }
    }
}

impl Storefront {
    /// Attach to the rendered page. Must run inside a reactive owner.
    pub fn attach(config: StorefrontConfig, notifier: Notifier) -> UiResult<Self> {
        let doc = dom::document()?;
        let card_elements = dom::query_all(&doc, ".product-card");
        let catalog = Rc::new(RefCell::new(Catalog::new(
            card_elements
                .iter()
                .enumerate()
                .map(|(order, card)| {
                    let favorite = dom::query_in(card, ".product-favorite i").is_some_and(|icon| dom::has_class(&icon, "fas"));
                    ProductCard::new(order, card.get_attribute("data-category"), favorite)
                })
                .collect(),
        )));

        let counters = Counters::new();
        if let Err(err) = counters.bind_badges() {
            log::warn!("[APP] counter badges not bound: {err}");
        }

        let tabs = settle("tabs", TabsBinding::attach(config.tabs.clone(), catalog.clone(), card_elements.clone()));
        let storefront = Self {
            scroll: settle("scroll monitor", ScrollBinding::attach(config.scroll)),
            tabs,
            favorites: settle("favorites", FavoriteBinding::attach(&card_elements, catalog.clone(), counters.wishlist)),
            cart: settle("cart", CartBinding::attach(&card_elements, counters.cart, config.counters)),
            countdown: settle("countdown", CountdownBinding::attach(config.countdown)),
            nav: settle("navigation", NavBinding::attach(config.nav, notifier)),
            categories: settle("categories menu", CategoriesToggle::attach()),
            sidebar: settle("sidebar reset", SidebarReset::attach(config.nav)),
            search: settle("search", SearchBinding::attach(config.search)),
            newsletter: settle("newsletter", NewsletterBinding::attach(config.newsletter)),
            links: settle("page links", PageLinks::attach()),
            reveal: settle("scroll reveal", RevealBinding::attach(config.reveal)),
            counters,
            catalog,
        };
        log::info!("[APP] storefront ready, {} behaviors attached", storefront.attached());
        Ok(storefront)
    }

    pub fn attached(&self) -> usize {
        [
            self.scroll.is_some(),
            self.tabs.is_some(),
            self.favorites.is_some(),
            self.cart.is_some(),
            self.countdown.is_some(),
            self.nav.is_some(),
            self.categories.is_some(),
            self.sidebar.is_some(),
            self.search.is_some(),
            self.newsletter.is_some(),
            self.links.is_some(),
            self.reveal.is_some(),
        ]
        .into_iter()
        .filter(|attached| *attached)
        .count()
    }
}

/// A page entering the back/forward cache comes back live, so only a
/// non-persisted `pagehide` ends it.
pub fn detaches_on_hide(persisted: bool) -> bool {
    !persisted
}

/// Keep `storefront` alive until the page is unloaded.
pub fn install(storefront: Storefront) -> UiResult<()> {
    let window = dom::window()?;
    ACTIVE.with(|slot| *slot.borrow_mut() = Some(storefront));
    Listener::new(&window, "pagehide", |ev| {
        let persisted = ev.dyn_ref::<PageTransitionEvent>().is_some_and(PageTransitionEvent::persisted);
        if !detaches_on_hide(persisted) {
            log::debug!("[APP] page cached, storefront kept");
            return;
        }
        let dropped = ACTIVE.with(|slot| slot.borrow_mut().take());
        if let Some(storefront) = dropped {
            log::debug!(
                "[APP] storefront detached: wishlist {}, cart {}, {} favorites",
                storefront.counters.wishlist.value(),
                storefront.counters.cart.value(),
                storefront.catalog.borrow().favorite_count(),
            );
        }
    })?
    .forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_page_keeps_storefront() {
        assert!(!detaches_on_hide(true));
        assert!(detaches_on_hide(false));
    }
}
