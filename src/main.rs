#![allow(non_snake_case)]

use std::rc::Rc;

use dioxus::prelude::*;

// Modules
mod bootstrap;
mod components;
mod context;
mod hooks;
mod services;
mod stores;
mod utils;

use components::Layout;

fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting Gotify web client");

    // Launch the Dioxus web app
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Runs exactly once per page; a remount gets AlreadyStarted
    let startup = use_hook(|| bootstrap::start().map(Rc::new));

    let booted = match startup {
        Ok(booted) => booted,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            return rsx! {
                p { class: "p-4 text-destructive", "Startup failed: {e}" }
            };
        }
    };

    use_context_provider(|| booted.stores().clone());

    use_effect(move || {
        if let Err(e) = booted.mounted() {
            log::warn!("Mount step skipped: {}", e);
        }
    });

    rsx! {
        Layout {}
    }
}
