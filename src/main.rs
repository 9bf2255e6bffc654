//! Storefront UI Entry Point

mod app;
mod catalog;
mod components;
mod config;
mod countdown;
mod counters;
mod dom;
mod error;
mod logging;
mod nav;
mod newsletter;
mod notify;
mod page;
mod reveal;
mod scroll;
mod search;
mod storefront;
mod tabs;

use app::App;
use config::StorefrontConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = StorefrontConfig::from_page();
    let level = loaded.as_ref().map(StorefrontConfig::log_level).unwrap_or(log::Level::Info);
    logging::init(level);
    let config = loaded.unwrap_or_else(|err| {
        log::warn!("[CONFIG] ignoring page config, using defaults: {err}");
        StorefrontConfig::default()
    });

    mount_to_body(move || view! { <App config=config /> });
}
