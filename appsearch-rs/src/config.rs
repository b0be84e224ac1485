//! Per-client configuration.

use serde::{Deserialize, Serialize};

/// Where search requests go when no endpoint override is given.
const DEFAULT_ENDPOINT_SUFFIX: &str = ".api.swiftype.com";

/// API version prefix appended to every endpoint base.
const API_PREFIX: &str = "/api/as/v1";

/// Configuration for a [`Client`](crate::Client) instance.
///
/// Owned by exactly one client; multiple clients with different keys or
/// endpoints can coexist because nothing here is process-global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account host identifier, e.g. `host-2376rb`.
    pub host_identifier: String,
    /// Public search key used as the bearer credential.
    pub search_key: String,
    /// Engine to query.
    pub engine_name: String,
    /// Override for the backend host, e.g. `http://localhost:3002`.
    /// Defaults to `https://{host_identifier}.api.swiftype.com`.
    pub endpoint_base: Option<String>,
    /// Cache identical responses inside the transport.
    pub cache_responses: bool,
}

impl ClientConfig {
    /// Create a config with the default endpoint and no caching.
    pub fn new(
        host_identifier: impl Into<String>,
        search_key: impl Into<String>,
        engine_name: impl Into<String>,
    ) -> Self {
        Self {
            host_identifier: host_identifier.into(),
            search_key: search_key.into(),
            engine_name: engine_name.into(),
            endpoint_base: None,
            cache_responses: false,
        }
    }

    /// Override the backend host.
    pub fn endpoint_base(mut self, base: impl Into<String>) -> Self {
        self.endpoint_base = Some(base.into());
        self
    }

    /// Enable response caching in the transport.
    pub fn cache_responses(mut self, enabled: bool) -> Self {
        self.cache_responses = enabled;
        self
    }

    /// Base URL for API calls, including the version prefix.
    pub fn api_base(&self) -> String {
        match &self.endpoint_base {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), API_PREFIX),
            None => format!(
                "https://{}{}{}",
                self.host_identifier, DEFAULT_ENDPOINT_SUFFIX, API_PREFIX
            ),
        }
    }

    /// Path of the search endpoint, relative to [`api_base`](Self::api_base).
    pub fn search_path(&self) -> String {
        format!("/engines/{}/search.json", urlencoding::encode(&self.engine_name))
    }

    /// Path of the click endpoint, relative to [`api_base`](Self::api_base).
    pub fn click_path(&self) -> String {
        format!("/engines/{}/click.json", urlencoding::encode(&self.engine_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint() {
        let config = ClientConfig::new("host-2376rb", "api-key", "node-modules");
        assert_eq!(
            config.api_base(),
            "https://host-2376rb.api.swiftype.com/api/as/v1"
        );
    }

    #[test]
    fn endpoint_override() {
        let config = ClientConfig::new("host-2376rb", "api-key", "node-modules")
            .endpoint_base("http://localhost.swiftype.com:3002/");
        assert_eq!(
            config.api_base(),
            "http://localhost.swiftype.com:3002/api/as/v1"
        );
    }

    #[test]
    fn engine_name_is_encoded() {
        let config = ClientConfig::new("host", "key", "my engine");
        assert_eq!(config.search_path(), "/engines/my%20engine/search.json");
    }
}
