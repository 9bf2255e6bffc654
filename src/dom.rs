//! DOM Helpers
//!
//! Thin wrappers over web-sys for querying the rendered page, toggling
//! classes and inline styles, and owning event listeners and timers.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, NodeList,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::error::{UiError, UiResult};

pub fn window() -> UiResult<Window> {
    web_sys::window().ok_or(UiError::MissingAnchor("window"))
}

pub fn document() -> UiResult<Document> {
    window()?.document().ok_or(UiError::MissingAnchor("document"))
}

pub fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    doc.query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Trimmed text content, empty when the element has none
pub fn text(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

/// Inline value only; empty when the property comes from a stylesheet
pub fn inline_style(el: &Element, property: &str) -> String {
    el.dyn_ref::<HtmlElement>()
        .and_then(|html| html.style().get_property_value(property).ok())
        .unwrap_or_default()
}

/// Whether `target` is `root` or one of its descendants
pub fn contains(root: &Element, target: Option<&EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_ref::<web_sys::Node>())
        .is_some_and(|node| root.contains(Some(node)))
}

/// Whether `target` sits inside an element matching `selector`
pub fn inside(target: Option<&EventTarget>, selector: &str) -> bool {
    target
        .and_then(|t| t.dyn_ref::<Element>())
        .and_then(|el| el.closest(selector).ok().flatten())
        .is_some()
}

pub fn is_hovered(el: &Element) -> bool {
    el.matches(":hover").unwrap_or(false)
}

pub fn viewport_width() -> f64 {
    window()
        .ok()
        .and_then(|win| win.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_to_top() {
    if let Ok(win) = window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&options);
    }
}

pub fn scroll_into_view(el: &Element, block: ScrollLogicalPosition) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(block);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}

/// An event listener that is removed when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> UiResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }

    /// Same as [`Listener::new`], registered with `{ passive: true }`
    pub fn passive<F>(target: &EventTarget, event: &'static str, handler: F) -> UiResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }

    /// Keep the listener for the lifetime of the page
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Listeners owned by one component
#[derive(Default)]
pub struct Listeners(Vec<Listener>);

impl Listeners {
    pub fn on<F>(&mut self, target: &EventTarget, event: &'static str, handler: F) -> UiResult<()>
    where
        F: FnMut(Event) + 'static,
    {
        self.0.push(Listener::new(target, event, handler)?);
        Ok(())
    }

    pub fn on_passive<F>(&mut self, target: &EventTarget, event: &'static str, handler: F) -> UiResult<()>
    where
        F: FnMut(Event) + 'static,
    {
        self.0.push(Listener::passive(target, event, handler)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Holds at most one pending timeout; scheduling again cancels the previous one.
///
/// Must not be rescheduled or cleared from inside its own callback.
#[derive(Clone, Default)]
pub struct TimerSlot(Rc<RefCell<Option<Timeout>>>);

impl TimerSlot {
    pub fn schedule<F>(&self, millis: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let previous = self.0.borrow_mut().replace(Timeout::new(millis, callback));
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self.0.borrow_mut().take();
        drop(previous);
    }
}
