use dioxus::prelude::*;

use crate::context::use_stores;
use crate::hooks::use_observable;

/// Clients that can read messages, including this browser session
#[component]
pub fn ClientList() -> Element {
    let stores = use_stores();
    let clients = use_observable(&stores.client_store.items());
    let current_token = use_hook(|| stores.current_user.token());

    let mut new_name = use_signal(String::new);

    let client_store = stores.client_store.clone();
    use_hook(move || client_store.refresh());

    let create_store = stores.client_store.clone();
    let oncreate = move |e: FormEvent| {
        e.prevent_default();
        let name = new_name();
        if name.trim().is_empty() {
            return;
        }
        let store = create_store.clone();
        spawn(async move {
            let _ = store.create(name.trim()).await;
        });
        new_name.set(String::new());
    };

    rsx! {
        section {
            class: "max-w-2xl mx-auto p-4 flex flex-col gap-2",
            h2 { class: "text-lg font-bold", "Clients" }
            form {
                class: "flex gap-2",
                onsubmit: oncreate,
                input {
                    class: "flex-1 px-3 py-2 rounded-lg border border-border bg-background",
                    placeholder: "Client name",
                    value: "{new_name}",
                    oninput: move |e| new_name.set(e.value()),
                }
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg",
                    r#type: "submit",
                    "Add"
                }
            }
            for client in clients() {
                div {
                    key: "{client.id}",
                    class: "p-3 bg-card border border-border rounded-lg flex items-center justify-between",
                    span {
                        "{client.name}"
                        if client.token == current_token {
                            span { class: "ml-2 text-xs text-muted-foreground", "(this session)" }
                        }
                    }
                    button {
                        class: "text-sm text-muted-foreground hover:text-destructive",
                        onclick: {
                            let store = stores.client_store.clone();
                            let id = client.id;
                            move |_| {
                                let store = store.clone();
                                spawn(async move {
                                    let _ = store.remove(id).await;
                                });
                            }
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

/// User accounts, visible to admins
#[component]
pub fn UserList() -> Element {
    let stores = use_stores();
    let users = use_observable(&stores.user_store.items());

    let mut new_name = use_signal(String::new);
    let mut new_pass = use_signal(String::new);
    let mut new_admin = use_signal(|| false);

    let user_store = stores.user_store.clone();
    use_hook(move || user_store.refresh());

    let create_store = stores.user_store.clone();
    let oncreate = move |e: FormEvent| {
        e.prevent_default();
        let name = new_name();
        let pass = new_pass();
        if name.trim().is_empty() || pass.is_empty() {
            return;
        }
        let admin = new_admin();
        let store = create_store.clone();
        spawn(async move {
            let _ = store.create(name.trim(), &pass, admin).await;
        });
        new_name.set(String::new());
        new_pass.set(String::new());
        new_admin.set(false);
    };

    rsx! {
        section {
            class: "max-w-2xl mx-auto p-4 flex flex-col gap-2",
            h2 { class: "text-lg font-bold", "Users" }
            form {
                class: "flex flex-wrap items-center gap-2",
                onsubmit: oncreate,
                input {
                    class: "flex-1 px-3 py-2 rounded-lg border border-border bg-background",
                    placeholder: "Username",
                    value: "{new_name}",
                    oninput: move |e| new_name.set(e.value()),
                }
                input {
                    class: "flex-1 px-3 py-2 rounded-lg border border-border bg-background",
                    r#type: "password",
                    placeholder: "Password",
                    autocomplete: "new-password",
                    value: "{new_pass}",
                    oninput: move |e| new_pass.set(e.value()),
                }
                label {
                    class: "flex items-center gap-1 text-sm",
                    input {
                        r#type: "checkbox",
                        checked: new_admin(),
                        onchange: move |e| new_admin.set(e.checked()),
                    }
                    "admin"
                }
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg",
                    r#type: "submit",
                    "Create"
                }
            }
            for user in users() {
                div {
                    key: "{user.id}",
                    class: "p-3 bg-card border border-border rounded-lg flex items-center justify-between",
                    span {
                        "{user.name}"
                        if user.admin {
                            span { class: "ml-2 text-xs text-muted-foreground", "admin" }
                        }
                    }
                    button {
                        class: "text-sm text-muted-foreground hover:text-destructive",
                        onclick: {
                            let store = stores.user_store.clone();
                            let id = user.id.max(0) as u64;
                            move |_| {
                                let store = store.clone();
                                spawn(async move {
                                    let _ = store.remove(id).await;
                                });
                            }
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Applications allowed to push messages
#[component]
pub fn ApplicationList() -> Element {
    let stores = use_stores();
    let apps = use_observable(&stores.app_store.items());
    let mut new_name = use_signal(String::new);
    let mut new_description = use_signal(String::new);

    let app_store = stores.app_store.clone();
    use_hook(move || {
        spawn(async move {
            if let Err(e) = app_store.reload().await {
                log::warn!("Failed to load applications: {}", e);
            }
        });
    });

    let create_store = stores.app_store.clone();
    let oncreate = move |e: FormEvent| {
        e.prevent_default();
        let name = new_name();
        if name.trim().is_empty() {
            return;
        }
        let description = new_description();
        let store = create_store.clone();
        spawn(async move {
            let _ = store.create(name.trim(), &description, 0).await;
        });
        new_name.set(String::new());
        new_description.set(String::new());
    };

    rsx! {
        section {
            class: "max-w-2xl mx-auto p-4 flex flex-col gap-2",
            h2 { class: "text-lg font-bold", "Applications" }
            form {
                class: "flex flex-wrap gap-2",
                onsubmit: oncreate,
                input {
                    class: "flex-1 px-3 py-2 rounded-lg border border-border bg-background",
                    placeholder: "Name",
                    value: "{new_name}",
                    oninput: move |e| new_name.set(e.value()),
                }
                input {
                    class: "flex-1 px-3 py-2 rounded-lg border border-border bg-background",
                    placeholder: "Description",
                    value: "{new_description}",
                    oninput: move |e| new_description.set(e.value()),
                }
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg",
                    r#type: "submit",
                    "Create"
                }
            }
            for app in apps() {
                div {
                    key: "{app.id}",
                    class: "p-3 bg-card border border-border rounded-lg flex items-center justify-between gap-3",
                    div {
                        class: "min-w-0",
                        p { class: "font-semibold truncate", "{app.name}" }
                        if !app.description.is_empty() {
                            p { class: "text-xs text-muted-foreground truncate", "{app.description}" }
                        }
                        code { class: "text-xs text-muted-foreground", "{app.token}" }
                    }
                    if !app.internal {
                        button {
                            class: "text-sm text-muted-foreground hover:text-destructive",
                            onclick: {
                                let store = stores.app_store.clone();
                                let id = app.id;
                                move |_| {
                                    let store = store.clone();
                                    spawn(async move {
                                        let _ = store.remove(id).await;
                                    });
                                }
                            },
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}
