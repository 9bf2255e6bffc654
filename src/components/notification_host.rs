//! Notification Host Component
//!
//! Fixed stack in the top-right corner rendering the notifier's toasts.

use leptos::prelude::*;

use crate::notify::{Notifier, Toast};

const TOAST_STYLE: &str = "background: #e74c3c; color: white; padding: 15px 25px; \
    border-radius: 5px; box-shadow: 0 4px 15px rgba(0,0,0,0.2); font-size: 14px; \
    font-weight: 500; margin-bottom: 10px;";

const TOAST_KEYFRAMES: &str = "
@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
@keyframes slideOutRight {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}";

#[component]
pub fn NotificationHost(notifier: Notifier) -> impl IntoView {
    view! {
        <style>{TOAST_KEYFRAMES}</style>
        <div
            class="menu-notification-host"
            style="position: fixed; top: 100px; right: 20px; z-index: 10000;"
        >
            <For
                each=move || notifier.toasts.with(|q| q.toasts().to_vec())
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let style = move || {
                        let animation = if notifier.toasts.with(|q| q.is_leaving(id)) {
                            "slideOutRight 0.3s ease-out forwards"
                        } else {
                            "slideInRight 0.3s ease-out"
                        };
                        format!("{TOAST_STYLE} animation: {animation};")
                    };
                    view! { <div class="menu-notification" style=style>{toast.message}</div> }
                }
            />
        </div>
    }
}
