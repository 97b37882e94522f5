use dioxus::prelude::*;

use crate::context::use_stores;
use crate::hooks::use_observable;
use crate::stores::messages_store::MessageScope;
use crate::stores::types::Message;
use crate::utils::time::format_message_date;

/// Newest-first list of every message, paged on demand
#[component]
pub fn MessageFeed() -> Element {
    let stores = use_stores();
    let state = use_observable(&stores.messages_store.state());
    // Re-render when application names or images arrive
    let _apps = use_observable(&stores.app_store.items());

    let messages_store = stores.messages_store.clone();
    use_hook(move || {
        if !messages_store.exists(MessageScope::All) {
            spawn(async move {
                if let Err(e) = messages_store.load_more(MessageScope::All).await {
                    log::warn!("Failed to load messages: {}", e);
                }
            });
        }
    });

    let (messages, has_more) = state
        .read()
        .get(&MessageScope::All)
        .map(|s| (s.messages.clone(), s.has_more))
        .unwrap_or_default();

    let is_empty = messages.is_empty();
    let load_more_store = stores.messages_store.clone();
    let delete_all_store = stores.messages_store.clone();

    rsx! {
        section {
            class: "max-w-2xl mx-auto p-4 flex flex-col gap-3",

            div {
                class: "flex items-center justify-between",
                h2 { class: "text-lg font-bold", "All Messages" }
                button {
                    class: "px-3 py-1 text-sm rounded-lg hover:bg-accent transition",
                    disabled: is_empty,
                    onclick: move |_| {
                        let store = delete_all_store.clone();
                        spawn(async move {
                            let _ = store.remove_by_scope(MessageScope::All).await;
                        });
                    },
                    "Delete all"
                }
            }

            if is_empty {
                p { class: "text-muted-foreground", "No messages" }
            }

            for message in messages {
                MessageItem { key: "{message.id}", message }
            }

            if has_more {
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition",
                    onclick: move |_| {
                        let store = load_more_store.clone();
                        spawn(async move {
                            let _ = store.load_more(MessageScope::All).await;
                        });
                    },
                    "Load more"
                }
            }
        }
    }
}

#[component]
fn MessageItem(message: Message) -> Element {
    let stores = use_stores();
    let app_name = stores
        .app_store
        .name_of(message.appid)
        .unwrap_or_else(|| format!("App {}", message.appid));
    let image = stores
        .messages_store
        .image_of(&message)
        .map(|path| stores.asset_url(&path));
    let date = format_message_date(&message.date);

    let store = stores.messages_store.clone();
    let to_delete = message.clone();

    rsx! {
        article {
            class: "p-4 bg-card border border-border rounded-xl flex gap-3",
            if let Some(src) = image {
                img { class: "w-10 h-10 rounded", src: "{src}", alt: "{app_name}" }
            }
            div {
                class: "flex-1 min-w-0",
                div {
                    class: "flex items-baseline justify-between gap-2",
                    h3 { class: "font-semibold truncate", "{message.title}" }
                    span { class: "text-xs text-muted-foreground", "{date}" }
                }
                p { class: "text-xs text-muted-foreground", "{app_name}" }
                p { class: "whitespace-pre-wrap break-words mt-1", "{message.message}" }
            }
            button {
                class: "self-start text-sm text-muted-foreground hover:text-destructive",
                aria_label: "Delete message",
                onclick: move |_| {
                    let store = store.clone();
                    let message = to_delete.clone();
                    spawn(async move {
                        let _ = store.remove_single(&message).await;
                    });
                },
                "Delete"
            }
        }
    }
}
