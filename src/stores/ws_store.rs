//! Realtime message stream
//!
//! One WebSocket per logged-in page at `<base>/stream?token=<token>`. Each
//! text frame is a JSON message that goes straight into the messages store.
//!
//! Lifecycle rules:
//! - `listen()` is a no-op without a token or while a socket is open
//! - `close()` is a no-op without a socket, detaches every handler before
//!   closing and cancels any pending reconnect
//! - an unexpected close re-checks the session and reconnects after
//!   `RECONNECT_DELAY_MS` unless the server rejected it; an unreachable
//!   server keeps being retried

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::bootstrap::session_bridge::RealtimeConnection;
use crate::services::notifications;
use crate::stores::current_user::CurrentUser;
use crate::stores::messages_store::MessagesStore;
use crate::stores::snack_manager::Snack;
use crate::services::http::ApiError;
use crate::stores::types::{Message, User};
use crate::utils::spawn_detached;

const RECONNECT_DELAY_MS: u32 = 30_000;
const NORMAL_CLOSURE: u16 = 1000;
const RECONNECT_MESSAGE: &str = "WebSocket connection closed, trying again in 30 seconds.";

/// Handlers kept alive for as long as their socket is open
struct SocketHandlers {
    #[allow(dead_code)]
    onmessage: Closure<dyn FnMut(MessageEvent)>,
    #[allow(dead_code)]
    onerror: Closure<dyn FnMut(ErrorEvent)>,
    #[allow(dead_code)]
    onclose: Closure<dyn FnMut(CloseEvent)>,
}

struct OpenSocket {
    ws: WebSocket,
    handlers: SocketHandlers,
}

pub struct WebSocketStore {
    this: Weak<WebSocketStore>,
    snack: Snack,
    current_user: Rc<CurrentUser>,
    messages_store: Rc<MessagesStore>,
    base_url: String,
    socket: RefCell<Option<OpenSocket>>,
    /// Bumped on every close so stale reconnect timers give up
    generation: Cell<u64>,
}

impl WebSocketStore {
    pub fn new(
        snack: Snack,
        current_user: Rc<CurrentUser>,
        messages_store: Rc<MessagesStore>,
        base_url: &str,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            snack,
            current_user,
            messages_store,
            base_url: base_url.to_string(),
            socket: RefCell::new(None),
            generation: Cell::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn current_user(&self) -> &Rc<CurrentUser> {
        &self.current_user
    }

    #[allow(dead_code)]
    pub fn messages_store(&self) -> &Rc<MessagesStore> {
        &self.messages_store
    }

    pub fn is_active(&self) -> bool {
        self.socket.borrow().is_some()
    }

    fn open(&self) {
        if self.is_active() {
            log::debug!("WebSocket already open");
            return;
        }

        let token = self.current_user.token();
        if token.is_empty() {
            log::debug!("No session token, not opening WebSocket");
            return;
        }

        let url = match stream_url(&self.base_url, &token) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Cannot build stream URL: {}", e);
                return;
            }
        };

        let ws = match WebSocket::new(&url) {
            Ok(ws) => ws,
            Err(e) => {
                log::error!("Failed to create WebSocket: {:?}", e);
                return;
            }
        };

        let generation = self.generation.get();

        let messages_store = self.messages_store.clone();
        let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
            let Ok(text) = e.data().dyn_into::<js_sys::JsString>() else {
                log::debug!("Ignoring non-text WebSocket frame");
                return;
            };
            let text: String = text.into();

            match serde_json::from_str::<Message>(&text) {
                Ok(message) => {
                    let icon = messages_store.image_of(&message);
                    notifications::notify_new_message(&message, icon.as_deref());
                    messages_store.publish_single_message(message);
                }
                Err(e) => log::warn!("Failed to parse streamed message: {}", e),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let onerror = Closure::wrap(Box::new(move |e: ErrorEvent| {
            log::error!("WebSocket error: {:?}", e.message());
        }) as Box<dyn FnMut(ErrorEvent)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let this = self.this.clone();
        let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
            log::info!("WebSocket closed: code={}, reason={}", e.code(), e.reason());
            if let Some(store) = this.upgrade() {
                store.on_unexpected_close(generation);
            }
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        log::info!("WebSocket listening on {}", self.base_url);
        *self.socket.borrow_mut() = Some(OpenSocket {
            ws,
            handlers: SocketHandlers {
                onmessage,
                onerror,
                onclose,
            },
        });
    }

    fn shutdown(&self) {
        self.generation.set(self.generation.get() + 1);

        let Some(socket) = self.socket.borrow_mut().take() else {
            return;
        };

        // Handlers go first so the closures are never invoked after drop
        socket.ws.set_onmessage(None);
        socket.ws.set_onerror(None);
        socket.ws.set_onclose(None);
        if let Err(e) = socket
            .ws
            .close_with_code_and_reason(NORMAL_CLOSURE, "WebSocketStore#close")
        {
            log::error!("Failed to close WebSocket: {:?}", e);
        } else {
            log::info!("WebSocket closed by client");
        }
    }

    /// Returns whether a reconnect attempt was scheduled
    fn on_unexpected_close(&self, generation: u64) -> bool {
        if generation != self.generation.get() {
            log::debug!("Ignoring close of a replaced socket");
            return false;
        }

        // The socket is already closed; release the handle without touching
        // the closure that is running right now
        if let Some(socket) = self.socket.borrow_mut().take() {
            socket.ws.set_onmessage(None);
            socket.ws.set_onerror(None);
            let handlers = socket.handlers;
            spawn_detached(async move {
                drop(handlers);
            });
        }

        let Some(store) = self.this.upgrade() else {
            return false;
        };
        spawn_detached(async move {
            let result = store.current_user.try_authenticate().await;
            match reconnect_plan(&result) {
                ReconnectPlan::GiveUp => {
                    log::info!("Session rejected, not reconnecting");
                    return;
                }
                ReconnectPlan::Retry { announce } => {
                    if announce {
                        store.snack.call(RECONNECT_MESSAGE);
                    }
                }
            }

            gloo_timers::future::TimeoutFuture::new(RECONNECT_DELAY_MS).await;

            if store.generation.get() == generation && store.current_user.logged_in.get() {
                store.open();
            } else {
                log::debug!("Reconnect cancelled");
            }
        });
        true
    }
}

/// What to do after the stream dropped, given the session check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconnectPlan {
    /// The server rejected the session and it was logged out
    GiveUp,
    /// Try again after the delay; `announce` tells the user about it
    Retry { announce: bool },
}

fn reconnect_plan(result: &Result<User, ApiError>) -> ReconnectPlan {
    match result {
        Ok(_) => ReconnectPlan::Retry { announce: true },
        Err(e) if matches!(e.status(), Some(400..=499)) => ReconnectPlan::GiveUp,
        // Server down or failing: keep retrying so the stream comes back with it
        Err(_) => ReconnectPlan::Retry { announce: false },
    }
}

impl RealtimeConnection for WebSocketStore {
    fn listen(&self) {
        self.open();
    }

    fn close(&self) {
        self.shutdown();
    }
}

/// `http(s)://host/base/` becomes `ws(s)://host/base/stream?token=...`
pub fn stream_url(base_url: &str, token: &str) -> Result<String, String> {
    let mut base = Url::parse(base_url).map_err(|e| format!("Invalid base URL {}: {}", base_url, e))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base
        .join("stream")
        .map_err(|e| format!("Invalid stream URL: {}", e))?;

    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => return Err(format!("Unsupported URL scheme: {}", other)),
    };
    url.set_scheme(scheme)
        .map_err(|_| format!("Cannot switch {} to {}", base_url, scheme))?;
    url.query_pairs_mut().append_pair("token", token);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::app_store::AppStore;
    use crate::stores::snack_manager::SnackManager;

    #[test]
    fn test_stream_url_plain() {
        assert_eq!(
            stream_url("http://localhost:80/", "C123").unwrap(),
            "ws://localhost/stream?token=C123"
        );
    }

    #[test]
    fn test_stream_url_tls_with_subpath() {
        assert_eq!(
            stream_url("https://example.com:8443/gotify", "tok").unwrap(),
            "wss://example.com:8443/gotify/stream?token=tok"
        );
    }

    #[test]
    fn test_stream_url_escapes_token() {
        let url = stream_url("http://push.lan/", "a b&c").unwrap();
        assert_eq!(url, "ws://push.lan/stream?token=a+b%26c");
    }

    #[test]
    fn test_stream_url_rejects_other_schemes() {
        assert!(stream_url("ftp://push.lan/", "t").is_err());
        assert!(stream_url("not a url", "t").is_err());
    }

    fn store() -> Rc<WebSocketStore> {
        let manager = SnackManager::new();
        let user = Rc::new(CurrentUser::new(manager.snack()));
        let apps = Rc::new(AppStore::new(manager.snack()));
        let messages = Rc::new(MessagesStore::new(apps, manager.snack()));
        WebSocketStore::new(manager.snack(), user, messages, "http://localhost:80/")
    }

    #[test]
    fn test_close_without_socket_is_noop() {
        let store = store();

        store.close();
        store.close();
        assert!(!store.is_active());
        assert_eq!(store.generation.get(), 2);
    }

    #[test]
    fn test_close_cancels_stale_reconnect() {
        let store = store();
        let before_close = store.generation.get();

        store.close();
        assert!(!store.on_unexpected_close(before_close));
        assert!(store.on_unexpected_close(store.generation.get()));
    }

    #[test]
    fn test_outage_keeps_retrying() {
        let unreachable = Err(ApiError::Unreachable("offline".to_string()));
        assert_eq!(
            reconnect_plan(&unreachable),
            ReconnectPlan::Retry { announce: false }
        );

        let server_error = Err(ApiError::Status { code: 503, body: None });
        assert_eq!(
            reconnect_plan(&server_error),
            ReconnectPlan::Retry { announce: false }
        );

        assert_eq!(
            reconnect_plan(&Ok(User::default())),
            ReconnectPlan::Retry { announce: true }
        );
    }

    #[test]
    fn test_rejected_session_stops_reconnecting() {
        let rejected = Err(ApiError::Status { code: 401, body: None });
        assert_eq!(reconnect_plan(&rejected), ReconnectPlan::GiveUp);
    }
}
