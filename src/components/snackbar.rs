use dioxus::prelude::*;

use crate::context::use_stores;
use crate::hooks::use_observable;

const SNACK_TIMEOUT_MS: u32 = 4_000;

/// Shows the snack manager's current message and hides it after a while
#[component]
pub fn Snackbar() -> Element {
    let stores = use_stores();
    let current = use_observable(&stores.snack_manager.current());

    let manager = stores.snack_manager.clone();
    use_effect(move || {
        let Some(shown) = current.read().as_ref().map(|m| m.id) else {
            return;
        };
        let manager = manager.clone();
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(SNACK_TIMEOUT_MS).await;
            // Only dismiss if the user has not already moved on
            if manager.current().with(|c| c.as_ref().map(|m| m.id)) == Some(shown) {
                manager.dismiss();
            }
        });
    });

    let dismiss = stores.snack_manager.clone();
    rsx! {
        if let Some(message) = current() {
            div {
                key: "{message.id}",
                class: "fixed bottom-4 left-1/2 -translate-x-1/2 z-50 bg-foreground text-background px-4 py-3 rounded-lg shadow-lg flex items-center gap-4",
                role: "status",
                span { "{message.text}" }
                button {
                    class: "text-sm font-semibold uppercase",
                    onclick: move |_| dismiss.dismiss(),
                    "Close"
                }
            }
        }
    }
}
