//! Shared API client
//!
//! `init_http` installs the page's single client. Every request carries the
//! session token, and failed requests are reported to the user through the
//! snackbar so individual stores only have to care about the happy path.

use std::cell::RefCell;
use std::rc::Rc;

use base64::Engine;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bootstrap::config::Config;
use crate::stores::current_user::CurrentUser;
use crate::stores::snack_manager::Snack;
use crate::stores::types::ErrorBody;
use crate::utils::spawn_detached;

pub const TOKEN_HEADER: &str = "X-Gotify-Key";

const UNREACHABLE_MESSAGE: &str = "Gotify server is not reachable, try refreshing the page.";
const RETRY_MESSAGE: &str = "Could not complete request.";

thread_local! {
    static API_CLIENT: RefCell<Option<Rc<ApiClient>>> = const { RefCell::new(None) };
}

/// Error type for API requests
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// `init_http` has not run yet
    NotInitialized,
    /// The request could not be built
    InvalidRequest(String),
    /// No response at all (network down, CORS, server gone)
    Unreachable(String),
    /// The server answered with a non-2xx status
    Status { code: u16, body: Option<ErrorBody> },
    /// The response body did not have the expected shape
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ApiError::NotInitialized => write!(f, "API client not initialized"),
            ApiError::InvalidRequest(e) => write!(f, "Invalid request: {}", e),
            ApiError::Unreachable(e) => write!(f, "Server unreachable: {}", e),
            ApiError::Status { code, body: Some(body) } => {
                write!(f, "{} (code: {}): {}", body.error, code, body.error_description)
            }
            ApiError::Status { code, body: None } => write!(f, "Request failed (code: {})", code),
            ApiError::Decode(e) => write!(f, "Unexpected response: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

/// What the client does on the user's behalf when a request fails
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReaction {
    Snack(String),
    Reauthenticate,
    Ignore,
}

pub fn failure_reaction(error: &ApiError) -> FailureReaction {
    match error {
        ApiError::Unreachable(_) => FailureReaction::Snack(UNREACHABLE_MESSAGE.to_string()),
        ApiError::Status { code: 401, .. } => FailureReaction::Reauthenticate,
        ApiError::Status {
            code: 400 | 403 | 500,
            body,
        } => match body {
            Some(body) => {
                FailureReaction::Snack(format!("{}: {}", body.error, body.error_description))
            }
            None => FailureReaction::Snack(error.to_string()),
        },
        _ => FailureReaction::Ignore,
    }
}

/// Credentials attached to a request
enum Auth<'a> {
    Session,
    Token(&'a str),
    Basic { username: &'a str, password: &'a str },
}

#[derive(Clone, Copy)]
enum Verb {
    Get,
    Post,
    Delete,
}

pub struct ApiClient {
    base_url: String,
    current_user: Rc<CurrentUser>,
    snack: Snack,
}

/// Install the page's API client
pub fn init_http(config: &Config, current_user: Rc<CurrentUser>, snack: Snack) {
    let client = Rc::new(ApiClient::new(&config.url, current_user, snack));
    API_CLIENT.with(|slot| {
        if slot.borrow_mut().replace(client).is_some() {
            log::warn!("API client re-initialized");
        }
    });
    log::info!("API client ready for {}", config.url);
}

/// The installed API client
pub fn client() -> Result<Rc<ApiClient>, ApiError> {
    API_CLIENT.with(|slot| slot.borrow().clone().ok_or(ApiError::NotInitialized))
}

impl ApiClient {
    pub fn new(base_url: &str, current_user: Rc<CurrentUser>, snack: Snack) -> Self {
        Self {
            base_url: base_url.to_string(),
            current_user,
            snack,
        }
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.checked(Verb::Get, path, Auth::Session, None).await?;
        decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let response = self.checked(Verb::Post, path, Auth::Session, Some(body)).await?;
        decode(response).await
    }

    /// POST whose response body is not needed
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = encode(body)?;
        self.checked(Verb::Post, path, Auth::Session, Some(body))
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.checked(Verb::Delete, path, Auth::Session, None)
            .await
            .map(|_| ())
    }

    /// GET with an explicit token and no failure reactions (session checks)
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let response = self.execute(Verb::Get, path, Auth::Token(token), None).await?;
        decode(response).await
    }

    /// POST with basic auth and no failure reactions (login)
    pub async fn post_with_basic<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        username: &str,
        password: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let response = self
            .execute(Verb::Post, path, Auth::Basic { username, password }, Some(body))
            .await?;
        decode(response).await
    }

    /// DELETE with an explicit token and no failure reactions (logout)
    pub async fn delete_with_token(&self, path: &str, token: &str) -> Result<(), ApiError> {
        self.execute(Verb::Delete, path, Auth::Token(token), None)
            .await
            .map(|_| ())
    }

    async fn checked(
        &self,
        verb: Verb,
        path: &str,
        auth: Auth<'_>,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        match self.execute(verb, path, auth, body).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log::warn!("Request to {} failed: {}", path, e);
                self.react(&e);
                Err(e)
            }
        }
    }

    fn react(&self, error: &ApiError) {
        match failure_reaction(error) {
            FailureReaction::Snack(message) => self.snack.call(message),
            FailureReaction::Reauthenticate => {
                let current_user = self.current_user.clone();
                let snack = self.snack.clone();
                spawn_detached(async move {
                    if current_user.try_authenticate().await.is_ok() {
                        snack.call(RETRY_MESSAGE);
                    }
                });
            }
            FailureReaction::Ignore => {}
        }
    }

    async fn execute(
        &self,
        verb: Verb,
        path: &str,
        auth: Auth<'_>,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut builder: RequestBuilder = match verb {
            Verb::Get => Request::get(&url),
            Verb::Post => Request::post(&url),
            Verb::Delete => Request::delete(&url),
        };

        builder = match auth {
            Auth::Session => builder.header(TOKEN_HEADER, &self.current_user.token()),
            Auth::Token(token) => builder.header(TOKEN_HEADER, token),
            Auth::Basic { username, password } => {
                builder.header("Authorization", &basic_auth_header(username, password))
            }
        };

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(json),
            None => builder.build(),
        }
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        if response.ok() {
            return Ok(response);
        }

        let code = response.status();
        let body = response.json::<ErrorBody>().await.ok();
        Err(ApiError::Status { code, body })
    }
}

pub fn basic_auth_header(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials)
    )
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snack_manager::SnackManager;

    fn status(code: u16, body: Option<ErrorBody>) -> ApiError {
        ApiError::Status { code, body }
    }

    #[test]
    fn test_unreachable_snacks() {
        let reaction = failure_reaction(&ApiError::Unreachable("fetch failed".to_string()));
        assert_eq!(reaction, FailureReaction::Snack(UNREACHABLE_MESSAGE.to_string()));
    }

    #[test]
    fn test_unauthorized_reauthenticates() {
        assert_eq!(failure_reaction(&status(401, None)), FailureReaction::Reauthenticate);
    }

    #[test]
    fn test_server_errors_show_description() {
        let body = ErrorBody {
            error: "Bad Request".to_string(),
            error_code: 400,
            error_description: "name is required".to_string(),
        };
        assert_eq!(
            failure_reaction(&status(400, Some(body))),
            FailureReaction::Snack("Bad Request: name is required".to_string())
        );
        assert_eq!(
            failure_reaction(&status(500, None)),
            FailureReaction::Snack("Request failed (code: 500)".to_string())
        );
    }

    #[test]
    fn test_other_failures_are_silent() {
        assert_eq!(failure_reaction(&status(404, None)), FailureReaction::Ignore);
        assert_eq!(
            failure_reaction(&ApiError::Decode("eof".to_string())),
            FailureReaction::Ignore
        );
        assert_eq!(failure_reaction(&ApiError::NotInitialized), FailureReaction::Ignore);
    }

    #[test]
    fn test_url_joining() {
        let snack = SnackManager::new().snack();
        let user = Rc::new(CurrentUser::new(snack.clone()));

        let client = ApiClient::new("http://localhost:80/", user.clone(), snack.clone());
        assert_eq!(client.url("/application"), "http://localhost:80/application");
        assert_eq!(client.url("message?since=0"), "http://localhost:80/message?since=0");

        let client = ApiClient::new("https://push.example.org/gotify", user, snack);
        assert_eq!(client.url("client"), "https://push.example.org/gotify/client");
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth_header("admin", "admin"), "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn test_client_requires_init() {
        assert_eq!(client().err(), Some(ApiError::NotInitialized));

        let manager = SnackManager::new();
        let user = Rc::new(CurrentUser::new(manager.snack()));
        let config = Config {
            url: "http://localhost:80/".to_string(),
        };
        init_http(&config, user, manager.snack());
        assert_eq!(client().map(|c| c.base_url().to_string()).ok().as_deref(), Some("http://localhost:80/"));
    }
}
