//! Quick Add Button Component
//!
//! Round cart button overlaid on a product card while the card is hovered.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::counters::CounterBadge;

/// Quick add-to-cart overlay
///
/// # Arguments
/// * `cart` - Counter incremented on click
/// * `hovered` - Whether the owning card is under the pointer
/// * `revert_ms` - How long the check mark stays before the cart icon returns
#[component]
pub fn QuickAddButton(cart: CounterBadge, hovered: ReadSignal<bool>, revert_ms: u32) -> impl IntoView {
    let (added, set_added) = signal(false);
    let revert = StoredValue::new_local(None::<Timeout>);

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        cart.increment();
        set_added.set(true);
        revert.update_value(|slot| {
            *slot = Some(Timeout::new(revert_ms, move || set_added.set(false)));
        });
    };

    view! {
        <button
            class="quick-add-btn"
            style=move || if hovered.get() { "display: flex;" } else { "display: none;" }
            on:click=on_click
        >
            <i class=move || if added.get() { "fas fa-check" } else { "fas fa-shopping-cart" }></i>
        </button>
    }
}
