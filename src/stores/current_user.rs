use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};
use serde::Serialize;

use crate::services::http::{self, ApiError};
use crate::stores::snack_manager::Snack;
use crate::stores::types::{Client, User};
use crate::utils::{spawn_detached, Observable};

const STORAGE_KEY_TOKEN: &str = "gotify-login-key";

/// Name of the client created on the server for each browser login
const SESSION_CLIENT_NAME: &str = "Gotify WebUI";

#[derive(Serialize)]
struct NewClient<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct NewPassword<'a> {
    pass: &'a str,
}

/// Session state of the person using the page
pub struct CurrentUser {
    snack: Snack,
    pub logged_in: Observable<bool>,
    pub authenticating: Observable<bool>,
    pub user: Observable<User>,
    /// Set while the server cannot be reached; cleared on the next good answer
    pub connection_error: Observable<Option<String>>,
}

impl CurrentUser {
    pub fn new(snack: Snack) -> Self {
        Self {
            snack,
            logged_in: Observable::new(false),
            authenticating: Observable::new(false),
            user: Observable::new(User::default()),
            connection_error: Observable::new(None),
        }
    }

    /// Stored session token, empty when logged out
    pub fn token(&self) -> String {
        LocalStorage::get::<String>(STORAGE_KEY_TOKEN).unwrap_or_default()
    }

    fn set_token(&self, token: &str) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY_TOKEN, token) {
            log::error!("Failed to store session token: {}", e);
        }
    }

    /// Exchange username/password for a client token, then authenticate with it
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        log::info!("Logging in as {}...", username);
        self.authenticating.set(true);

        let result = self.create_session(username, password).await;
        self.authenticating.set(false);

        if let Err(e) = &result {
            log::warn!("Login failed: {}", e);
            self.snack.call("Login failed");
        }
        result
    }

    async fn create_session(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let client: Client = http::client()?
            .post_with_basic(
                "client",
                username,
                password,
                &NewClient {
                    name: SESSION_CLIENT_NAME,
                },
            )
            .await?;

        self.snack.call(format!(
            "A client named '{}' was created for your session.",
            client.name
        ));
        self.set_token(&client.token);
        self.try_authenticate().await.map(|_| ())
    }

    /// Check the stored token against the server
    ///
    /// Fails immediately when no token is stored. A 4xx answer means the token
    /// is no longer valid and logs the session out.
    pub async fn try_authenticate(&self) -> Result<User, ApiError> {
        let token = self.token();
        if token.is_empty() {
            return Err(ApiError::Status {
                code: 401,
                body: None,
            });
        }

        let result = match http::client() {
            Ok(client) => client.get_with_token::<User>("current/user", &token).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                log::info!("Authenticated as {}", user.name);
                self.user.set(user.clone());
                self.connection_error.set(None);
                self.logged_in.set(true);
                Ok(user)
            }
            Err(e) => {
                log::warn!("Authentication failed: {}", e);
                let message = connection_error_message(&e);
                self.connection_error.set(message);
                if matches!(e.status(), Some(400..=499)) {
                    self.logout().await;
                }
                Err(e)
            }
        }
    }

    /// Fire-and-forget authentication; the outcome shows up in `logged_in`
    pub fn spawn_try_authenticate(self: &Rc<Self>) {
        let this = self.clone();
        spawn_detached(async move {
            let _ = this.try_authenticate().await;
        });
    }

    /// Drop the session, deleting its client on the server when possible
    pub async fn logout(&self) {
        log::info!("Logging out...");
        let token = self.token();

        if !token.is_empty() {
            if let Ok(client) = http::client() {
                match client.get_with_token::<Vec<Client>>("client", &token).await {
                    Ok(clients) => {
                        if let Some(session) = clients.iter().find(|c| c.token == token) {
                            let path = format!("client/{}", session.id);
                            if let Err(e) = client.delete_with_token(&path, &token).await {
                                log::warn!("Failed to delete session client: {}", e);
                            }
                        }
                    }
                    Err(e) => log::debug!("Could not list clients during logout: {}", e),
                }
            }
        }

        LocalStorage::delete(STORAGE_KEY_TOKEN);
        self.user.set(User::default());
        self.logged_in.set(false);
    }

    pub async fn change_password(&self, pass: &str) -> Result<(), ApiError> {
        http::client()?
            .post_unit("current/user/password", &NewPassword { pass })
            .await?;
        self.snack.call("Password changed");
        Ok(())
    }

    #[allow(dead_code)]
    pub fn is_admin(&self) -> bool {
        self.user.with(|u| u.admin)
    }
}

/// Banner text for failures that are not the user's fault
pub fn connection_error_message(error: &ApiError) -> Option<String> {
    match error {
        ApiError::Unreachable(_) => Some("No network connection or server unavailable.".to_string()),
        ApiError::Status { code, .. } if *code >= 500 => {
            Some(format!("Server error (code: {}).", code))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snack_manager::SnackManager;

    #[test]
    fn test_new_user_is_logged_out() {
        let user = CurrentUser::new(SnackManager::new().snack());
        assert!(!user.logged_in.get());
        assert!(!user.authenticating.get());
        assert_eq!(user.user.get(), User::default());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_connection_error_messages() {
        assert!(connection_error_message(&ApiError::Unreachable("offline".to_string())).is_some());
        assert_eq!(
            connection_error_message(&ApiError::Status { code: 502, body: None }).as_deref(),
            Some("Server error (code: 502).")
        );
        assert_eq!(
            connection_error_message(&ApiError::Status { code: 401, body: None }),
            None
        );
    }
}
