//! UI Components
//!
//! Leptos components for the pieces of UI this crate renders itself.

mod notification_host;
mod quick_add_button;

pub use notification_host::NotificationHost;
pub use quick_add_button::QuickAddButton;
