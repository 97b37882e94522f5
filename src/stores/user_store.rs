use serde::Serialize;

use crate::services::http::{self, ApiError};
use crate::stores::resource::ResourceStore;
use crate::stores::snack_manager::Snack;
use crate::stores::types::User;
use crate::utils::Observable;

#[derive(Serialize)]
struct NewUser<'a> {
    name: &'a str,
    pass: &'a str,
    admin: bool,
}

/// User accounts (admin only)
pub struct UserStore {
    snack: Snack,
    list: ResourceStore<User>,
}

impl UserStore {
    pub fn new(snack: Snack) -> Self {
        Self {
            snack,
            list: ResourceStore::new(),
        }
    }

    pub fn items(&self) -> Observable<Vec<User>> {
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
        self.snack.call("User deleted");
        Ok(())
    }

    pub async fn create(&self, name: &str, pass: &str, admin: bool) -> Result<User, ApiError> {
        let user: User = http::client()?
            .post("user", &NewUser { name, pass, admin })
            .await?;
        self.reload().await?;
        self.snack.call("User created");
        Ok(user)
    }
}
