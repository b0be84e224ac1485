//! The client: search with disjunctive facet resolution, and clicks.

use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::query::{QueryDescriptor, SearchOptions, build_query};
use crate::result::SearchResponse;
use crate::transport::{HttpTransport, Method, Transport};

/// A relevance-feedback ("click") event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClickParams {
    pub query: String,
    pub document_id: String,
    pub request_id: String,
    /// Defaults to no tags when omitted.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ClickParams {
    pub fn new(
        query: impl Into<String>,
        document_id: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        ClickParams {
            query: query.into(),
            document_id: document_id.into(),
            request_id: request_id.into(),
            tags: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Client for one engine on one App Search account.
///
/// Generic over the [`Transport`] so tests can drive the full search path
/// against a mock; production code uses [`Client::new`] and gets the
/// reqwest-backed [`HttpTransport`].
pub struct Client<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<HttpTransport> {
    /// Client with the default endpoint and no response caching.
    pub fn new(
        host_identifier: impl Into<String>,
        search_key: impl Into<String>,
        engine_name: impl Into<String>,
    ) -> Self {
        Self::from_config(ClientConfig::new(host_identifier, search_key, engine_name))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Client { config, transport }
    }
}

impl<T: Transport> Client<T> {
    /// Pair a configuration with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Client { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a search.
    ///
    /// For every field listed in `disjunctive_facets` that has a facet
    /// spec, an auxiliary query is dispatched concurrently with the
    /// primary one. The auxiliary query drops the field's own filter
    /// constraints (keeping everything else), and its facet data replaces
    /// the primary response's data for that field, so the reported counts
    /// are unconstrained by the field's own filter. Results, meta and
    /// pagination always come from the primary query alone.
    ///
    /// Any failed query, primary or auxiliary, fails the whole call;
    /// there is no fallback to filtered counts.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let primary = build_query(query, options)?;
        let fields = options.disjunctive_fields();
        if fields.is_empty() {
            return self.dispatch(&primary).await;
        }

        debug!(fields = ?fields, "resolving disjunctive facets");
        let auxiliaries = future::try_join_all(fields.iter().map(|field| {
            let descriptor = primary.auxiliary_for_field(field);
            async move {
                let response = self.dispatch(&descriptor).await?;
                Ok::<_, ClientError>((*field, response))
            }
        }));

        let (mut merged, auxiliaries) =
            future::try_join(self.dispatch(&primary), auxiliaries).await?;
        for (field, mut auxiliary) in auxiliaries {
            // replace the whole facet array for the field; everything else
            // in the auxiliary response is discarded
            if let Some(facet) = auxiliary.info.facets.remove(field) {
                merged.info.facets.insert(field.to_string(), facet);
            }
        }
        Ok(merged)
    }

    /// Record a click against a search result.
    ///
    /// Validation happens before any network call; the backend's
    /// acknowledgement body is returned as-is.
    pub async fn click(&self, params: &ClickParams) -> Result<Value> {
        if params.query.trim().is_empty() {
            return Err(ClientError::MissingParameter("query"));
        }
        if params.document_id.trim().is_empty() {
            return Err(ClientError::MissingParameter("documentId"));
        }
        let body = serde_json::to_value(params)?;
        self.transport
            .request(Method::POST, &self.config.click_path(), &body)
            .await
    }

    async fn dispatch(&self, descriptor: &QueryDescriptor) -> Result<SearchResponse> {
        let body = serde_json::to_value(descriptor)?;
        let raw = self
            .transport
            .request(Method::POST, &self.config.search_path(), &body)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }
}
