//! Storefront App
//!
//! Root component. Renders the toast host and attaches the page behaviors
//! to the server-rendered markup.

use leptos::prelude::*;

use crate::components::NotificationHost;
use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::storefront::{self, Storefront};

#[component]
pub fn App(config: StorefrontConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notify);
    provide_context(notifier);

    if let Err(err) = Storefront::attach(config, notifier).and_then(storefront::install) {
        log::error!("[APP] storefront failed to start: {err}");
    }

    view! { <NotificationHost notifier=notifier /> }
}
