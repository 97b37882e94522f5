// Utility functions
// Helper functions shared by stores, services and components

pub mod markdown_text;
pub mod observable;
pub mod time;

pub use markdown_text::strip_markdown;
pub use observable::{Observable, Subscription};

/// Run a future in the background without awaiting it
///
/// Completion is observed through the state the future mutates. Outside the
/// browser there is no executor, so the future is dropped.
pub fn spawn_detached<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(future);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::debug!("No browser executor, skipping background task");
        drop(future);
    }
}
