//! Service worker registration for the offline shell

use crate::bootstrap::config::BuildMode;

pub const SERVICE_WORKER_PATH: &str = "service-worker.js";

/// Register the service worker without waiting for the result
///
/// Only production builds register; in development a stale worker would
/// serve outdated bundles.
pub fn register(mode: BuildMode) {
    if mode != BuildMode::Production {
        log::debug!("Skipping service worker registration in {:?} mode", mode);
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
            return;
        };
        let supported = js_sys::Reflect::has(&navigator, &wasm_bindgen::JsValue::from_str("serviceWorker"))
            .unwrap_or(false);
        if !supported {
            log::info!("Service workers not supported by this browser");
            return;
        }

        let promise = navigator.service_worker().register(SERVICE_WORKER_PATH);
        crate::utils::spawn_detached(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => log::info!("Service worker registered"),
                Err(e) => log::warn!("Service worker registration failed: {:?}", e),
            }
        });
    }
}
