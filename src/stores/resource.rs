//! Shared core of the list stores (applications, clients, users)
//!
//! Each list store owns one observable `Vec` that mirrors a collection
//! endpoint. Mutations go to the server first and then reload the list, so the
//! page never shows state the server did not confirm.

use serde::de::DeserializeOwned;

use crate::services::http::{self, ApiError};
use crate::stores::types::{Application, Client, User};
use crate::utils::{spawn_detached, Observable};

/// A server collection that can be listed and deleted by id
pub trait Resource: DeserializeOwned + Clone + PartialEq + 'static {
    /// Collection path relative to the base URL
    const PATH: &'static str;

    fn id(&self) -> u64;
}

impl Resource for Application {
    const PATH: &'static str = "application";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Resource for Client {
    const PATH: &'static str = "client";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Resource for User {
    const PATH: &'static str = "user";

    fn id(&self) -> u64 {
        // Only the placeholder user has a negative id and it is never listed
        self.id.max(0) as u64
    }
}

pub struct ResourceStore<T: Resource> {
    items: Observable<Vec<T>>,
}

impl<T: Resource> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new() -> Self {
        Self {
            items: Observable::new(Vec::new()),
        }
    }

    pub fn items(&self) -> Observable<Vec<T>> {
        self.items.clone()
    }

    pub fn get_by_id(&self, id: u64) -> Option<T> {
        self.items
            .with(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.items.set(Vec::new());
    }

    /// Fetch the collection, replacing the local copy
    pub async fn reload(&self) -> Result<(), ApiError> {
        let items = http::client()?.get::<Vec<T>>(T::PATH).await?;
        log::debug!("Loaded {} {} entries", items.len(), T::PATH);
        self.items.set(items);
        Ok(())
    }

    /// Background reload; a rejected session empties the list
    pub fn refresh(&self) {
        let items = self.items.clone();
        spawn_detached(async move {
            let result = match http::client() {
                Ok(client) => client.get::<Vec<T>>(T::PATH).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(loaded) => {
                    items.set(loaded);
                }
                Err(e) if e.status() == Some(401) => {
                    items.set(Vec::new());
                }
                Err(e) => log::warn!("Failed to refresh {}: {}", T::PATH, e),
            }
        });
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        http::client()?
            .delete(&format!("{}/{}", T::PATH, id))
            .await?;
        self.reload().await
    }

    /// Replace the local copy directly (used after create calls and in tests)
    #[allow(dead_code)]
    pub fn replace(&self, items: Vec<T>) {
        self.items.set(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: u64, name: &str) -> Application {
        Application {
            id,
            token: format!("A{}", id),
            name: name.to_string(),
            description: String::new(),
            image: "static/defaultapp.png".to_string(),
            internal: false,
            default_priority: 0,
        }
    }

    #[test]
    fn test_get_by_id() {
        let store = ResourceStore::<Application>::new();
        store.replace(vec![app(1, "backup"), app(2, "monitor")]);

        assert_eq!(store.get_by_id(2).map(|a| a.name), Some("monitor".to_string()));
        assert_eq!(store.get_by_id(9), None);
    }

    #[test]
    fn test_clear_notifies_once() {
        let store = ResourceStore::<Application>::new();
        store.replace(vec![app(1, "backup")]);

        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let count_cb = count.clone();
        let _sub = store.items().subscribe(move |_| count_cb.set(count_cb.get() + 1));

        store.clear();
        store.clear();
        assert_eq!(count.get(), 1);
        assert!(store.items().get().is_empty());
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(<Application as Resource>::PATH, "application");
        assert_eq!(<Client as Resource>::PATH, "client");
        assert_eq!(<User as Resource>::PATH, "user");
    }
}
