//! Runtime configuration
//!
//! The page may inject `window.config = { url: "..." }` before the bundle
//! loads. Without it, production builds talk to the origin that served the
//! page and development builds talk to a local server.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEV_URL: &str = "http://localhost:80/";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the push server, used as a prefix for every API path
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// The parts of `window.location` that make up the page origin
#[derive(Clone, Debug, PartialEq)]
pub struct PageLocation {
    pub protocol: String,
    pub hostname: String,
    pub port: String,
}

impl PageLocation {
    /// Origin URL with exactly one trailing slash
    pub fn origin_url(&self) -> String {
        let mut url = format!("{}//{}", self.protocol, self.hostname);
        if !self.port.is_empty() {
            url.push(':');
            url.push_str(&self.port);
        }
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// Read the current page location
    pub fn from_window() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(location) = web_sys::window().map(|w| w.location()) {
                return Self {
                    protocol: location.protocol().unwrap_or_else(|_| "http:".to_string()),
                    hostname: location.hostname().unwrap_or_else(|_| "localhost".to_string()),
                    port: location.port().unwrap_or_default(),
                };
            }
            log::warn!("No window location available, assuming localhost");
        }

        Self {
            protocol: "http:".to_string(),
            hostname: "localhost".to_string(),
            port: String::new(),
        }
    }
}

/// Pick the configuration for this page load
///
/// An injected config always wins. Resolution cannot fail.
pub fn resolve(mode: BuildMode, injected: Option<Config>, location: &PageLocation) -> Config {
    if let Some(config) = injected {
        log::info!("Using injected config: {}", config.url);
        return config;
    }

    let config = match mode {
        BuildMode::Production => Config {
            url: location.origin_url(),
        },
        BuildMode::Development => Config {
            url: DEFAULT_DEV_URL.to_string(),
        },
    };
    log::info!("Using {:?} default config: {}", mode, config.url);
    config
}

/// Read `window.config` if the hosting page set one
pub fn injected_from_window() -> Option<Config> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str("config")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }

        match serde_wasm_bindgen::from_value::<Config>(value) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring malformed window.config: {}", e);
                None
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(protocol: &str, hostname: &str, port: &str) -> PageLocation {
        PageLocation {
            protocol: protocol.to_string(),
            hostname: hostname.to_string(),
            port: port.to_string(),
        }
    }

    #[test]
    fn test_injected_config_wins_in_every_mode() {
        let injected = Config {
            url: "https://push.example.org/gotify".to_string(),
        };
        let loc = location("https:", "example.com", "443");

        for mode in [BuildMode::Development, BuildMode::Production] {
            assert_eq!(resolve(mode, Some(injected.clone()), &loc), injected);
        }
    }

    #[test]
    fn test_production_uses_page_origin() {
        let config = resolve(
            BuildMode::Production,
            None,
            &location("https:", "example.com", "443"),
        );
        assert_eq!(config.url, "https://example.com:443/");
        assert!(!config.url.ends_with("//"));
    }

    #[test]
    fn test_production_without_port() {
        let config = resolve(BuildMode::Production, None, &location("http:", "push.lan", ""));
        assert_eq!(config.url, "http://push.lan/");
    }

    #[test]
    fn test_development_default() {
        let config = resolve(
            BuildMode::Development,
            None,
            &location("https:", "example.com", "443"),
        );
        assert_eq!(config.url, "http://localhost:80/");
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let config: Config = serde_json::from_str(r#"{"url": "http://10.0.0.2:8080/"}"#).unwrap();
        assert_eq!(config.url, "http://10.0.0.2:8080/");
    }
}
