/// Store mapping
///
/// Every store the page uses, constructed once at startup and provided to the
/// component tree as Dioxus context. Components reach stores through
/// `use_stores()` instead of global lookups, so each dependency is visible at
/// the call site.
///
/// # Example
/// ```rust
/// #[component]
/// pub fn LogoutButton() -> Element {
///     let stores = use_stores();
///
///     rsx! {
///         button {
///             onclick: move |_| {
///                 let user = stores.current_user.clone();
///                 spawn(async move { user.logout().await });
///             },
///             "Logout"
///         }
///     }
/// }
/// ```
use std::rc::Rc;

use dioxus::prelude::*;

use crate::bootstrap::config::Config;
use crate::stores::{
    app_store::AppStore, client_store::ClientStore, current_user::CurrentUser,
    messages_store::MessagesStore, snack_manager::SnackManager, user_store::UserStore,
    ws_store::WebSocketStore,
};

#[derive(Clone)]
pub struct StoreMapping {
    pub config: Config,
    pub app_store: Rc<AppStore>,
    pub snack_manager: Rc<SnackManager>,
    pub user_store: Rc<UserStore>,
    pub messages_store: Rc<MessagesStore>,
    pub current_user: Rc<CurrentUser>,
    pub client_store: Rc<ClientStore>,
    pub ws_store: Rc<WebSocketStore>,
}

impl PartialEq for StoreMapping {
    fn eq(&self, other: &Self) -> bool {
        // Two mappings are the same when they share their stores
        Rc::ptr_eq(&self.snack_manager, &other.snack_manager)
            && Rc::ptr_eq(&self.current_user, &other.current_user)
    }
}

impl StoreMapping {
    /// Absolute URL of a server-relative path such as an application image
    pub fn asset_url(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path.trim_start_matches('/'))
    }
}

/// Fetch the store mapping provided by the root component
pub fn use_stores() -> StoreMapping {
    use_context::<StoreMapping>()
}
