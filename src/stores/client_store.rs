use serde::Serialize;

use crate::services::http::{self, ApiError};
use crate::stores::resource::ResourceStore;
use crate::stores::snack_manager::Snack;
use crate::stores::types::Client;
use crate::utils::Observable;

#[derive(Serialize)]
struct NewClient<'a> {
    name: &'a str,
}

/// Clients (devices, browser sessions) allowed to read messages
pub struct ClientStore {
    snack: Snack,
    list: ResourceStore<Client>,
}

impl ClientStore {
    pub fn new(snack: Snack) -> Self {
        Self {
            snack,
            list: ResourceStore::new(),
        }
    }

    pub fn items(&self) -> Observable<Vec<Client>> {
        self.list.items()
    }

    pub fn refresh(&self) {
        self.list.refresh();
    }

    pub async fn reload(&self) -> Result<(), ApiError> {
        self.list.reload().await
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.list.remove(id).await?;
        self.snack.call("Client deleted");
        Ok(())
    }

    pub async fn create(&self, name: &str) -> Result<Client, ApiError> {
        let client: Client = http::client()?.post("client", &NewClient { name }).await?;
        self.reload().await?;
        self.snack.call("Client added");
        Ok(client)
    }
}
