//! Header Navigation
//!
//! Connects the `.main-nav` dropdown items to the hover-intent state machine.
//! The machine decides; this module reads pointer events, applies the returned
//! commands to the `active` class and owns the close timer of every item.
//!
//! Also wires the categories dropdown, the HOME link and the resize reset.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use hover_intent::{Command, Delays, Destination, DropdownMenu, ItemId, Mode, TimerToken};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, Node, ScrollLogicalPosition};

use crate::config::NavConfig;
use crate::dom::{self, Listeners, TimerSlot};
use crate::error::UiResult;
use crate::notify::Notifier;

const NAV_SELECTOR: &str = ".main-nav";

/// DOM anchors of one `.has-dropdown` item
struct NavAnchors {
    root: Element,
    trigger: Option<Element>,
    submenu: Option<Element>,
}

impl NavAnchors {
    fn find(root: Element) -> Self {
        let trigger = dom::query_all_in(&root, "a")
            .into_iter()
            .find(|a| a.parent_element().as_ref() == Some(&root));
        let submenu = dom::query_in(&root, ".dropdown-menu");
        Self { root, trigger, submenu }
    }

    /// Where a leave event sent the pointer
    fn destination(&self, ev: &Event) -> Destination {
        let related = ev.dyn_ref::<MouseEvent>().and_then(MouseEvent::related_target);
        let within = self
            .trigger
            .iter()
            .chain(self.submenu.iter())
            .chain(std::iter::once(&self.root))
            .any(|el| dom::contains(el, related.as_ref()));
        if within {
            Destination::WithinItem
        } else {
            Destination::Elsewhere
        }
    }

    fn is_hovered(&self) -> bool {
        dom::is_hovered(&self.root) || self.submenu.as_ref().is_some_and(dom::is_hovered)
    }
}

struct NavShared {
    items: Vec<NavAnchors>,
    menu: RefCell<DropdownMenu>,
    timers: RefCell<HashMap<ItemId, Timeout>>,
}

impl NavShared {
    fn apply(self: &Rc<Self>, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Open(id) => dom::set_class(&self.items[id].root, "active", true),
                Command::Close(id) => dom::set_class(&self.items[id].root, "active", false),
                Command::Schedule { item, token, delay_ms, .. } => {
                    let shared = Rc::downgrade(self);
                    let timeout = Timeout::new(delay_ms, move || Self::on_timer(&shared, item, token));
                    self.timers.borrow_mut().insert(item, timeout);
                }
                Command::Cancel(id) => {
                    let cancelled = self.timers.borrow_mut().remove(&id);
                    drop(cancelled);
                }
            }
        }
    }

    fn on_timer(shared: &Weak<Self>, item: ItemId, token: TimerToken) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let hovering = shared.items[item].is_hovered();
        let commands = shared.menu.borrow_mut().timer_fired(item, token, hovering);
        shared.apply(commands);
    }

    fn dispatch(self: &Rc<Self>, f: impl FnOnce(&mut DropdownMenu) -> Vec<Command>) {
        let commands = f(&mut self.menu.borrow_mut());
        self.apply(commands);
    }

    fn owner_of(&self, el: &Element) -> Option<ItemId> {
        let node: &Node = el;
        self.items.iter().position(|item| item.root.contains(Some(node)))
    }
}

pub struct NavBinding {
    _shared: Rc<NavShared>,
    _resize: TimerSlot,
    _flashes: Vec<TimerSlot>,
    _listeners: Listeners,
}

impl NavBinding {
    pub fn attach(config: NavConfig, notifier: Notifier) -> UiResult<Option<Self>> {
        let window = dom::window()?;
        let doc = dom::document()?;
        let roots = dom::query_all(&doc, ".main-nav .has-dropdown");
        let mode = Mode::for_viewport(dom::viewport_width(), config.breakpoint_px);
        let delays = Delays {
            close_ms: config.close_delay_ms,
            collapse_ms: config.link_collapse_ms,
        };
        let shared = Rc::new(NavShared {
            menu: RefCell::new(DropdownMenu::new(roots.len(), mode, delays)),
            items: roots.into_iter().map(NavAnchors::find).collect(),
            timers: RefCell::new(HashMap::new()),
        });
        log::debug!("[NAV] {} dropdown items in {:?} mode", shared.items.len(), mode);

        let mut listeners = Listeners::default();
        for (id, item) in shared.items.iter().enumerate() {
            if item.submenu.is_none() {
                log::debug!("[NAV] item {id} has no submenu");
                continue;
            }
            if mode == Mode::Hover {
                Self::bind_hover(&shared, id, item, &mut listeners)?;
            }
            if let Some(trigger) = &item.trigger {
                let shared = shared.clone();
                listeners.on(trigger, "click", move |ev| {
                    ev.prevent_default();
                    shared.dispatch(|menu| menu.trigger_clicked(id));
                })?;
            }
        }

        {
            let shared = shared.clone();
            listeners.on(&doc, "click", move |ev| {
                if !dom::inside(ev.target().as_ref(), NAV_SELECTOR) {
                    shared.dispatch(DropdownMenu::close_all);
                }
            })?;
        }

        let flashes = Self::bind_links(&shared, &doc, config, notifier, &mut listeners)?;
        Self::bind_home_link(&doc, &mut listeners)?;

        let resize = TimerSlot::default();
        {
            let shared = shared.clone();
            let resize = resize.clone();
            listeners.on(&window, "resize", move |_| {
                let shared = shared.clone();
                resize.schedule(config.resize_debounce_ms, move || {
                    shared.dispatch(DropdownMenu::close_all);
                });
            })?;
        }

        Ok(Some(Self {
            _shared: shared,
            _resize: resize,
            _flashes: flashes,
            _listeners: listeners,
        }))
    }

    fn bind_hover(shared: &Rc<NavShared>, id: ItemId, item: &NavAnchors, listeners: &mut Listeners) -> UiResult<()> {
        let Some(submenu) = &item.submenu else {
            return Ok(());
        };
        for region in [&item.root, submenu] {
            {
                let shared = shared.clone();
                listeners.on(region, "mouseenter", move |_| {
                    shared.dispatch(|menu| menu.pointer_enter(id));
                })?;
            }
            let shared = shared.clone();
            listeners.on(region, "mouseleave", move |ev| {
                let destination = shared.items[id].destination(&ev);
                shared.dispatch(|menu| menu.pointer_leave(id, destination));
            })?;
        }
        Ok(())
    }

    fn bind_links(
        shared: &Rc<NavShared>,
        doc: &web_sys::Document,
        config: NavConfig,
        notifier: Notifier,
        listeners: &mut Listeners,
    ) -> UiResult<Vec<TimerSlot>> {
        let mut flashes = Vec::new();
        for link in dom::query_all(doc, ".main-nav .dropdown-menu a") {
            let Some(id) = shared.owner_of(&link) else {
                continue;
            };
            dom::set_style(&link, "pointer-events", "auto");
            dom::set_style(&link, "cursor", "pointer");
            dom::set_style(&link, "position", "relative");
            dom::set_style(&link, "z-index", "1002");

            {
                let shared = shared.clone();
                listeners.on(&link, "mousedown", move |ev| {
                    ev.stop_propagation();
                    shared.dispatch(|menu| menu.keep_open(id));
                })?;
            }
            {
                let shared = shared.clone();
                listeners.on(&link, "mouseenter", move |_| {
                    shared.dispatch(|menu| menu.keep_open(id));
                })?;
            }

            let flash = TimerSlot::default();
            flashes.push(flash.clone());
            let shared = shared.clone();
            let target = link.clone();
            let background = dom::inline_style(&link, "background");
            let color = dom::inline_style(&link, "color");
            listeners.on(&link, "click", move |ev| {
                ev.prevent_default();
                ev.stop_propagation();
                let label = dom::text(&target);
                dom::set_style(&target, "background", "#e74c3c");
                dom::set_style(&target, "color", "white");
                let restore = target.clone();
                let (background, color) = (background.clone(), color.clone());
                flash.schedule(config.link_flash_ms, move || {
                    dom::set_style(&restore, "background", &background);
                    dom::set_style(&restore, "color", &color);
                });

                log::info!("[NAV] navigating to: {label}");
                notifier.notify(format!("Navigating to: {label}"));
                shared.dispatch(|menu| menu.link_activated(id));
            })?;
        }
        Ok(flashes)
    }

    /// Top-level links outside dropdowns; only HOME does anything
    fn bind_home_link(doc: &web_sys::Document, listeners: &mut Listeners) -> UiResult<()> {
        let links = Rc::new(dom::query_all(doc, ".main-nav > ul > li > a"));
        for link in links.iter() {
            let is_dropdown = link
                .parent_element()
                .is_some_and(|li| dom::has_class(&li, "has-dropdown"));
            if is_dropdown {
                continue;
            }
            let is_home = dom::text(link).to_uppercase().contains("HOME");
            let links = links.clone();
            let target = link.clone();
            listeners.on(link, "click", move |ev| {
                ev.prevent_default();
                if !is_home {
                    return;
                }
                match dom::document().ok().and_then(|d| d.get_element_by_id("home")) {
                    Some(home) => dom::scroll_into_view(&home, ScrollLogicalPosition::Start),
                    None => dom::scroll_to_top(),
                }
                for other in links.iter() {
                    dom::set_class(other, "active", other == &target);
                }
            })?;
        }
        Ok(())
    }
}

/// The "browse categories" button and its menu
pub struct CategoriesToggle {
    _listeners: Listeners,
}

impl CategoriesToggle {
    pub fn attach() -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let (Some(button), Some(panel)) = (
            dom::query(&doc, ".browse-categories"),
            doc.get_element_by_id("categoriesMenu"),
        ) else {
            log::debug!("[NAV] categories menu elements not found");
            return Ok(None);
        };
        let menu = Rc::new(RefCell::new(DropdownMenu::new(1, Mode::Click, Delays::default())));
        let apply = {
            let (button, panel) = (button.clone(), panel.clone());
            move |commands: Vec<Command>| {
                for command in commands {
                    let open = match command {
                        Command::Open(_) => true,
                        Command::Close(_) => false,
                        Command::Schedule { .. } | Command::Cancel(_) => continue,
                    };
                    dom::set_class(&panel, "show", open);
                    dom::set_class(&button, "active", open);
                }
            }
        };

        let mut listeners = Listeners::default();
        {
            let menu = menu.clone();
            let apply = apply.clone();
            listeners.on(&button, "click", move |ev| {
                ev.stop_propagation();
                let commands = menu.borrow_mut().trigger_clicked(0);
                apply(commands);
            })?;
        }
        {
            let (button, panel) = (button.clone(), panel.clone());
            listeners.on(&doc, "click", move |ev| {
                let target = ev.target();
                if !dom::contains(&panel, target.as_ref()) && !dom::contains(&button, target.as_ref()) {
                    let commands = menu.borrow_mut().close_all();
                    apply(commands);
                }
            })?;
        }
        listeners.on(&panel, "click", |ev| ev.stop_propagation())?;
        Ok(Some(Self { _listeners: listeners }))
    }
}

/// Drops the mobile sidebar state once the viewport is wide again
pub struct SidebarReset {
    _listeners: Listeners,
}

impl SidebarReset {
    pub fn attach(config: NavConfig) -> UiResult<Option<Self>> {
        let window = dom::window()?;
        let mut listeners = Listeners::default();
        listeners.on(&window, "resize", move |_| {
            if dom::viewport_width() <= config.breakpoint_px {
                return;
            }
            if let Some(sidebar) = dom::document().ok().and_then(|d| dom::query(&d, ".categories-sidebar")) {
                dom::set_class(&sidebar, "mobile-open", false);
            }
        })?;
        Ok(Some(Self { _listeners: listeners }))
    }
}
