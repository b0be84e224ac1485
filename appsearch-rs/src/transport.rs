//! Transport seam: HTTP execution and response caching.
//!
//! The core never talks to the network directly; it hands fully-built
//! request bodies to a [`Transport`] and consumes parsed JSON. Tests swap
//! in a mock, and response caching lives entirely on this side of the seam.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

pub use reqwest::Method;

/// Executes one backend call.
///
/// `path` is relative to the configured API base. A non-2xx status maps to
/// [`ClientError::Http`] carrying the status code and any detail message
/// the backend provided; failures without a status surface as
/// [`ClientError::Network`].
pub trait Transport {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value>>;
}

/// The real transport: reqwest with bearer auth and an optional in-memory
/// response cache keyed by method, URL and body.
pub struct HttpTransport {
    http: reqwest::Client,
    base: String,
    search_key: String,
    cache: Option<Mutex<HashMap<String, Value>>>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        HttpTransport {
            http: reqwest::Client::new(),
            base: config.api_base(),
            search_key: config.search_key.clone(),
            cache: config
                .cache_responses
                .then(|| Mutex::new(HashMap::new())),
        }
    }

    fn cache_get(&self, key: &str) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        cache.lock().ok()?.get(key).cloned()
    }

    fn cache_put(&self, key: String, value: &Value) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.insert(key, value.clone());
            }
        }
    }
}

impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base, path);
        let body_text = serde_json::to_string(body)?;
        let cache_key = format!("{method} {url} {body_text}");

        if let Some(hit) = self.cache_get(&cache_key) {
            debug!(%url, "response cache hit");
            return Ok(hit);
        }

        debug!(%method, %url, "dispatching request");
        let response = self
            .http
            .request(method, &url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.search_key))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("X-Swiftype-Client", "appsearch-rs")
            .header("X-Swiftype-Client-Version", env!("CARGO_PKG_VERSION"))
            .body(body_text)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: error_detail(&text),
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        self.cache_put(cache_key, &value);
        Ok(value)
    }
}

/// Pull a human-readable detail out of an error response body. The backend
/// reports `{"errors": ["...", ...]}`; anything else yields no detail and
/// the error renders as a bare `[status]`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("errors")? {
        Value::Array(errors) => {
            let messages: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        Value::String(message) => Some(message.clone()),
        _ => None,
    }
}
