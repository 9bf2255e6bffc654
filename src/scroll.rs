//! Scroll Monitor
//!
//! Header styling driven by the page scroll position, sampled at most once
//! per animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::config::ScrollConfig;
use crate::dom::{self, Listeners};
use crate::error::UiResult;

/// Classes the header and scroll-to-top control should carry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderState {
    pub scrolled: bool,
    pub show_scroll_top: bool,
    pub hidden: bool,
}

#[derive(Debug)]
pub struct ScrollMonitor {
    config: ScrollConfig,
    last_position: f64,
}

impl ScrollMonitor {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            last_position: 0.0,
        }
    }

    /// Feed the current vertical scroll offset.
    pub fn sample(&mut self, position: f64) -> HeaderState {
        let hidden = position > self.config.hide_threshold && position > self.last_position;
        self.last_position = position.max(0.0);
        HeaderState {
            scrolled: position > self.config.scrolled_class_at,
            show_scroll_top: position > self.config.scroll_top_at,
            hidden,
        }
    }

    #[cfg(test)]
    pub fn last_position(&self) -> f64 {
        self.last_position
    }
}

/// Coalesces bursts of scroll events into one update per frame
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// True when the caller should request a frame
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn complete(&mut self) {
        self.pending = false;
    }
}

struct ScrollShared {
    window: Window,
    header: Element,
    scroll_top: Option<Element>,
    monitor: RefCell<ScrollMonitor>,
    gate: RefCell<FrameGate>,
}

impl ScrollShared {
    fn update(&self) {
        let position = self.window.scroll_y().unwrap_or(0.0);
        let state = self.monitor.borrow_mut().sample(position);
        self.gate.borrow_mut().complete();
        dom::set_class(&self.header, "scrolled", state.scrolled);
        dom::set_class(&self.header, "hidden", state.hidden);
        if let Some(button) = &self.scroll_top {
            dom::set_class(button, "show", state.show_scroll_top);
        }
    }
}

pub struct ScrollBinding {
    _frame: Rc<Closure<dyn FnMut()>>,
    _listeners: Listeners,
}

impl ScrollBinding {
    /// Inert (`None`) when the page has no `.header`
    pub fn attach(config: ScrollConfig) -> UiResult<Option<Self>> {
        let window = dom::window()?;
        let doc = dom::document()?;
        let Some(header) = dom::query(&doc, ".header") else {
            log::debug!("[SCROLL] no .header, scroll monitor disabled");
            return Ok(None);
        };
        if let Some(body) = doc.body() {
            dom::set_class(&body, "has-fixed-header", true);
        }

        let shared = Rc::new(ScrollShared {
            window: window.clone(),
            header,
            scroll_top: doc.get_element_by_id("scrollToTop"),
            monitor: RefCell::new(ScrollMonitor::new(config)),
            gate: RefCell::new(FrameGate::default()),
        });

        let frame = {
            let shared = shared.clone();
            Rc::new(Closure::<dyn FnMut()>::new(move || shared.update()))
        };

        let mut listeners = Listeners::default();
        {
            let shared = shared.clone();
            let frame = frame.clone();
            listeners.on_passive(&window, "scroll", move |_| {
                if shared.gate.borrow_mut().request() {
                    let requested = shared
                        .window
                        .request_animation_frame((*frame).as_ref().unchecked_ref());
                    if requested.is_err() {
                        shared.gate.borrow_mut().complete();
                    }
                }
            })?;
        }

        if let Some(button) = shared.scroll_top.clone() {
            let header = shared.header.clone();
            listeners.on(&button, "click", move |_| {
                dom::scroll_to_top();
                dom::set_class(&header, "hidden", false);
            })?;
        }

        shared.update();
        Ok(Some(Self {
            _frame: frame,
            _listeners: listeners,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_thresholds() {
        let mut monitor = ScrollMonitor::new(ScrollConfig::default());
        assert_eq!(monitor.sample(0.0), HeaderState::default());
        assert_eq!(
            monitor.sample(60.0),
            HeaderState {
                scrolled: true,
                show_scroll_top: false,
                hidden: false,
            }
        );
        assert_eq!(
            monitor.sample(350.0),
            HeaderState {
                scrolled: true,
                show_scroll_top: true,
                hidden: true,
            }
        );
    }

    #[test]
    fn test_scrolling_up_shows_header() {
        let mut monitor = ScrollMonitor::new(ScrollConfig::default());
        assert!(monitor.sample(500.0).hidden);
        assert!(!monitor.sample(450.0).hidden);
        assert!(monitor.sample(480.0).hidden);
    }

    #[test]
    fn test_jump_to_top_shows_header() {
        let mut monitor = ScrollMonitor::new(ScrollConfig::default());
        assert!(monitor.sample(900.0).hidden);
        assert_eq!(monitor.sample(0.0), HeaderState::default());
        assert_eq!(monitor.last_position(), 0.0);
    }

    #[test]
    fn test_near_top_always_shows_header() {
        let mut monitor = ScrollMonitor::new(ScrollConfig::default());
        monitor.sample(40.0);
        assert!(!monitor.sample(90.0).hidden);
    }

    #[test]
    fn test_negative_overscroll_clamps_last_position() {
        let mut monitor = ScrollMonitor::new(ScrollConfig::default());
        monitor.sample(-30.0);
        assert_eq!(monitor.last_position(), 0.0);
    }

    #[test]
    fn test_frame_gate_coalesces() {
        let mut gate = FrameGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        gate.complete();
        assert!(gate.request());
    }
}
