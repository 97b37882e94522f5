use dioxus::prelude::*;

use crate::context::use_stores;

#[component]
pub fn LoginForm(authenticating: bool) -> Element {
    let stores = use_stores();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);

    let onsubmit = move |e: FormEvent| {
        e.prevent_default();
        let current_user = stores.current_user.clone();
        let name = username();
        let pass = password();
        spawn(async move {
            if current_user.login(&name, &pass).await.is_ok() {
                log::info!("Login complete");
            }
        });
        password.set(String::new());
    };

    rsx! {
        form {
            class: "max-w-sm mx-auto mt-16 p-6 bg-card border border-border rounded-xl flex flex-col gap-4",
            onsubmit: onsubmit,

            h2 { class: "text-lg font-bold", "Login" }

            input {
                class: "px-3 py-2 rounded-lg border border-border bg-background",
                r#type: "text",
                placeholder: "Username",
                autocomplete: "username",
                value: "{username}",
                oninput: move |e| username.set(e.value()),
            }
            input {
                class: "px-3 py-2 rounded-lg border border-border bg-background",
                r#type: "password",
                placeholder: "Password",
                autocomplete: "current-password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
            }
            button {
                class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg disabled:opacity-50",
                r#type: "submit",
                disabled: authenticating,
                if authenticating { "Logging in..." } else { "Login" }
            }
        }
    }
}
