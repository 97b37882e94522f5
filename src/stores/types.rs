//! Wire types exchanged with the push server

use serde::{Deserialize, Serialize};

/// An application allowed to push messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct Application {
    pub id: u64,
    pub token: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub default_priority: i32,
}

/// A client allowed to read messages (the web UI session is one of them)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub token: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: -1,
            name: "unknown".to_string(),
            admin: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct Message {
    pub id: u64,
    pub appid: u64,
    pub message: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: i32,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
    pub size: u64,
    #[serde(default)]
    pub since: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedMessages {
    pub paging: Paging,
    pub messages: Vec<Message>,
}

/// Error body returned by the server on 4xx/5xx
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_code: u16,
    #[serde(default)]
    pub error_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paged_messages() {
        let json = r#"{
            "paging": {"size": 1, "since": 40, "limit": 100, "next": "http://localhost/message?since=40"},
            "messages": [{"id": 41, "appid": 3, "message": "hi", "title": "Backup", "priority": 5,
                          "date": "2024-03-01T10:15:00Z", "extras": {"client::display": {"contentType": "text/markdown"}}}]
        }"#;
        let page: PagedMessages = serde_json::from_str(json).unwrap();
        assert_eq!(page.paging.since, 40);
        assert!(page.paging.next.is_some());
        assert_eq!(page.messages[0].appid, 3);
        assert!(page.messages[0].extras.is_some());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let json = r#"{"paging": {"size": 0, "limit": 100}, "messages": []}"#;
        let page: PagedMessages = serde_json::from_str(json).unwrap();
        assert_eq!(page.paging.next, None);
        assert_eq!(page.paging.since, 0);
    }

    #[test]
    fn test_parse_application_camel_case() {
        let json = r#"{"id": 1, "token": "AbC", "name": "backup", "description": "nightly",
                       "image": "static/defaultapp.png", "internal": false, "defaultPriority": 4}"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.default_priority, 4);
        assert_eq!(app.image, "static/defaultapp.png");
    }

    #[test]
    fn test_parse_error_body() {
        let json = r#"{"error": "Bad Request", "errorCode": 400, "errorDescription": "name is required"}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error_description, "name is required");
    }
}
