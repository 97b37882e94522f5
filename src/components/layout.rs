use dioxus::prelude::*;

use crate::bootstrap::session_bridge::RealtimeConnection;
use crate::components::{
    ApplicationList, ClientList, LoginForm, MessageFeed, PasswordForm, Snackbar, UserList,
};
use crate::context::use_stores;
use crate::hooks::use_observable;

#[derive(Clone, Copy, PartialEq)]
enum Panel {
    Messages,
    Applications,
    Clients,
    Users,
    Settings,
}

/// Root of the UI tree
#[component]
pub fn Layout() -> Element {
    let stores = use_stores();
    let logged_in = use_observable(&stores.current_user.logged_in);
    let authenticating = use_observable(&stores.current_user.authenticating);
    let connection_error = use_observable(&stores.current_user.connection_error);
    let user = use_observable(&stores.current_user.user);
    let mut panel = use_signal(|| Panel::Messages);

    let logout_user = stores.current_user.clone();
    let retry_user = stores.current_user.clone();
    let retry_ws = stores.ws_store.clone();

    rsx! {
        div {
            class: "min-h-screen bg-background text-foreground",

            header {
                class: "flex items-center justify-between px-4 py-3 border-b border-border",
                h1 { class: "text-xl font-bold", "Gotify" }

                if logged_in() {
                    nav {
                        class: "flex items-center gap-2",
                        button {
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition",
                            onclick: move |_| panel.set(Panel::Messages),
                            "Messages"
                        }
                        button {
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition",
                            onclick: move |_| panel.set(Panel::Applications),
                            "Apps"
                        }
                        button {
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition",
                            onclick: move |_| panel.set(Panel::Clients),
                            "Clients"
                        }
                        if user.read().admin {
                            button {
                                class: "px-3 py-1 rounded-lg hover:bg-accent transition",
                                onclick: move |_| panel.set(Panel::Users),
                                "Users"
                            }
                        }
                        button {
                            class: "px-3 py-1 text-sm text-muted-foreground rounded-lg hover:bg-accent transition",
                            onclick: move |_| panel.set(Panel::Settings),
                            "{user.read().name}"
                        }
                        button {
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition",
                            onclick: move |_| {
                                let current_user = logout_user.clone();
                                spawn(async move { current_user.logout().await });
                            },
                            "Logout"
                        }
                    }
                }
            }

            if let Some(error) = connection_error() {
                div {
                    class: "px-4 py-2 bg-destructive text-destructive-foreground flex items-center justify-between",
                    role: "alert",
                    span { "{error}" }
                    button {
                        class: "underline",
                        onclick: move |_| {
                            let current_user = retry_user.clone();
                            let ws_store = retry_ws.clone();
                            spawn(async move {
                                // logged_in may already be true, so the session bridge stays quiet
                                if current_user.try_authenticate().await.is_ok() {
                                    ws_store.listen();
                                }
                            });
                        },
                        "Retry"
                    }
                }
            }

            main {
                if !logged_in() {
                    LoginForm { authenticating: authenticating() }
                } else {
                    {
                        match panel() {
                            Panel::Messages => rsx! { MessageFeed {} },
                            Panel::Applications => rsx! { ApplicationList {} },
                            Panel::Clients => rsx! { ClientList {} },
                            Panel::Users => rsx! { UserList {} },
                            Panel::Settings => rsx! { PasswordForm {} },
                        }
                    }
                }
            }

            Snackbar {}
        }
    }
}
