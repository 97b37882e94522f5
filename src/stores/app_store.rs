use serde::Serialize;

use crate::bootstrap::session_bridge::Refresh;
use crate::services::http::{self, ApiError};
use crate::stores::resource::ResourceStore;
use crate::stores::snack_manager::Snack;
use crate::stores::types::Application;
use crate::utils::Observable;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewApplication<'a> {
    name: &'a str,
    description: &'a str,
    default_priority: i32,
}

/// Applications that push messages to the server
pub struct AppStore {
    snack: Snack,
    list: ResourceStore<Application>,
}

impl AppStore {
    pub fn new(snack: Snack) -> Self {
        Self {
            snack,
            list: ResourceStore::new(),
        }
    }

    pub fn items(&self) -> Observable<Vec<Application>> {
        self.list.items()
    }

    pub fn get_by_id(&self, id: u64) -> Option<Application> {
        self.list.get_by_id(id)
    }

    /// Image path of an application, if it is known
    pub fn image_of(&self, id: u64) -> Option<String> {
        self.get_by_id(id)
            .map(|app| app.image)
            .filter(|image| !image.is_empty())
    }

    pub fn name_of(&self, id: u64) -> Option<String> {
        self.get_by_id(id).map(|app| app.name)
    }

    pub async fn reload(&self) -> Result<(), ApiError> {
        self.list.reload().await
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.list.remove(id).await?;
        self.snack.call("Application deleted");
        Ok(())
    }

    pub async fn create(
        &self,
        name: &str,
        description: &str,
        default_priority: i32,
    ) -> Result<Application, ApiError> {
        let app: Application = http::client()?
            .post(
                "application",
                &NewApplication {
                    name,
                    description,
                    default_priority,
                },
            )
            .await?;
        self.reload().await?;
        self.snack.call("Application created");
        Ok(app)
    }

    #[cfg(test)]
    pub fn replace(&self, items: Vec<Application>) {
        self.list.replace(items);
    }
}

impl Refresh for AppStore {
    fn refresh(&self) {
        log::debug!("Refreshing applications");
        self.list.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snack_manager::SnackManager;

    #[test]
    fn test_image_lookup() {
        let store = AppStore::new(SnackManager::new().snack());
        store.replace(vec![
            Application {
                id: 1,
                token: "A1".to_string(),
                name: "backup".to_string(),
                description: String::new(),
                image: "image/backup.png".to_string(),
                internal: false,
                default_priority: 0,
            },
            Application {
                id: 2,
                token: "A2".to_string(),
                name: "cron".to_string(),
                description: String::new(),
                image: String::new(),
                internal: false,
                default_priority: 0,
            },
        ]);

        assert_eq!(store.image_of(1).as_deref(), Some("image/backup.png"));
        assert_eq!(store.image_of(2), None);
        assert_eq!(store.name_of(2).as_deref(), Some("cron"));
        assert_eq!(store.image_of(3), None);
    }
}
