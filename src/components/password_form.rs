use dioxus::prelude::*;

use crate::context::use_stores;

/// Change the logged-in user's password
#[component]
pub fn PasswordForm() -> Element {
    let stores = use_stores();
    let mut password = use_signal(String::new);

    let onsubmit = move |e: FormEvent| {
        e.prevent_default();
        let pass = password();
        if pass.is_empty() {
            return;
        }
        let current_user = stores.current_user.clone();
        spawn(async move {
            if let Err(e) = current_user.change_password(&pass).await {
                log::warn!("Password change failed: {}", e);
            }
        });
        password.set(String::new());
    };

    rsx! {
        form {
            class: "max-w-sm mx-auto mt-8 p-6 bg-card border border-border rounded-xl flex flex-col gap-4",
            onsubmit: onsubmit,

            h2 { class: "text-lg font-bold", "Change password" }

            input {
                class: "px-3 py-2 rounded-lg border border-border bg-background",
                r#type: "password",
                placeholder: "New password",
                autocomplete: "new-password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
            }
            button {
                class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg disabled:opacity-50",
                r#type: "submit",
                disabled: password.read().is_empty(),
                "Save"
            }
        }
    }
}
