//! Notifications
//!
//! Transient toast messages. A toast is visible for a fixed window, then
//! plays its exit animation and is removed.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::NotifyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub phase: ToastPhase,
}

/// Toasts currently on screen, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            phase: ToastPhase::Visible,
        });
        id
    }

    /// Start the exit animation; false if the toast is gone or already leaving
    pub fn begin_exit(&mut self, id: u64) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if toast.phase == ToastPhase::Visible => {
                toast.phase = ToastPhase::Leaving;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn is_leaving(&self, id: u64) -> bool {
        self.toasts
            .iter()
            .any(|t| t.id == id && t.phase == ToastPhase::Leaving)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

/// Handle used by page behaviors to emit toasts
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    pub toasts: RwSignal<ToastQueue>,
    visible_ms: u32,
    exit_ms: u32,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            toasts: RwSignal::new(ToastQueue::default()),
            visible_ms: config.visible_ms,
            exit_ms: config.exit_ms,
        }
    }

    pub fn notify(&self, message: impl Into<String>) {
        let Some(id) = self.toasts.try_update(|q| q.push(message)) else {
            return;
        };
        let toasts = self.toasts;
        let (visible_ms, exit_ms) = (self.visible_ms, self.exit_ms);
        spawn_local(async move {
            TimeoutFuture::new(visible_ms).await;
            toasts.try_update(|q| q.begin_exit(id));
            TimeoutFuture::new(exit_ms).await;
            toasts.try_update(|q| q.remove(id));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_toast_lifecycle() {
        let mut queue = ToastQueue::default();
        let first = queue.push("Navigating to: Brakes");
        let second = queue.push("Navigating to: Rims");
        assert_eq!(queue.toasts().len(), 2);

        assert!(queue.begin_exit(first));
        assert!(queue.is_leaving(first));
        assert!(!queue.is_leaving(second));
        assert!(!queue.begin_exit(first));

        assert!(queue.remove(first));
        assert!(!queue.remove(first));
        assert_eq!(queue.toasts()[0].message, "Navigating to: Rims");
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut queue = ToastQueue::default();
        let a = queue.push("a");
        queue.remove(a);
        let b = queue.push("b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_exit_of_unknown_toast() {
        let mut queue = ToastQueue::default();
        assert!(!queue.begin_exit(3));
    }
}
