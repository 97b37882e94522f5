//! Desktop notifications for incoming messages

use crate::stores::types::Message;
use crate::utils::strip_markdown;

/// How long a notification stays on screen
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const NOTIFICATION_TIMEOUT_MS: u32 = 5_000;

/// Title and plain-text body shown for a message
pub fn notification_content(message: &Message) -> (String, String) {
    let title = if message.title.trim().is_empty() {
        "New message".to_string()
    } else {
        message.title.clone()
    };
    (title, strip_markdown(&message.message))
}

#[cfg(target_arch = "wasm32")]
fn notifications_supported() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &wasm_bindgen::JsValue::from_str("Notification")).unwrap_or(false))
        .unwrap_or(false)
}

/// Ask for notification permission without waiting for the answer
pub fn request_permission() {
    #[cfg(target_arch = "wasm32")]
    {
        use web_sys::{Notification, NotificationPermission};

        if !notifications_supported() {
            log::info!("Notifications not supported by this browser");
            return;
        }
        if Notification::permission() != NotificationPermission::Default {
            log::debug!("Notification permission already decided");
            return;
        }

        match Notification::request_permission() {
            Ok(promise) => crate::utils::spawn_detached(async move {
                match wasm_bindgen_futures::JsFuture::from(promise).await {
                    Ok(result) => log::info!("Notification permission: {:?}", result.as_string()),
                    Err(e) => log::warn!("Notification permission request failed: {:?}", e),
                }
            }),
            Err(e) => log::warn!("Could not request notification permission: {:?}", e),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::debug!("Notifications are only available in the browser");
    }
}

/// Show a desktop notification for a streamed message
///
/// `icon` is the application image path relative to the server URL.
pub fn notify_new_message(message: &Message, icon: Option<&str>) {
    let (title, body) = notification_content(message);

    #[cfg(target_arch = "wasm32")]
    {
        use web_sys::{Notification, NotificationOptions, NotificationPermission};

        if !notifications_supported() || Notification::permission() != NotificationPermission::Granted {
            return;
        }

        let options = NotificationOptions::new();
        options.set_body(&body);
        if let Some(icon) = icon {
            match crate::services::http::client() {
                Ok(client) => options.set_icon(&client.url(icon)),
                Err(_) => options.set_icon(icon),
            }
        }

        match Notification::new_with_options(&title, &options) {
            Ok(notification) => crate::utils::spawn_detached(async move {
                gloo_timers::future::TimeoutFuture::new(NOTIFICATION_TIMEOUT_MS).await;
                notification.close();
            }),
            Err(e) => log::warn!("Failed to show notification: {:?}", e),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::debug!("Would notify: {} ({} chars, icon {:?})", title, body.len(), icon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(title: &str, body: &str) -> Message {
        Message {
            id: 1,
            appid: 1,
            message: body.to_string(),
            title: title.to_string(),
            priority: 5,
            date: "2024-03-01T10:15:00Z".to_string(),
            extras: None,
        }
    }

    #[test]
    fn test_content_strips_markdown() {
        let (title, body) = notification_content(&message("Backup", "**done** in `3m`"));
        assert_eq!(title, "Backup");
        assert_eq!(body, "done in 3m");
    }

    #[test]
    fn test_empty_title_gets_placeholder() {
        let (title, _) = notification_content(&message("  ", "disk full"));
        assert_eq!(title, "New message");
    }
}
