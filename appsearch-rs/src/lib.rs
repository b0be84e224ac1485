//! Appsearch - a client for hosted App Search engines.
//!
//! # Overview
//!
//! The client turns caller-supplied search parameters into backend query
//! bodies, submits them over HTTP, and reshapes the JSON response into
//! typed results. It supports:
//! - Filter trees (`all`/`any` boolean combinations of field constraints)
//! - Facets, including disjunctive facets (counts reported as though the
//!   field's own filters were not applied, via concurrent auxiliary queries)
//! - Grouped results (recursively wrapped `_group` members)
//! - Click (relevance feedback) events
//!
//! # Example
//!
//! ```no_run
//! use appsearch::{Client, Filter, FacetSpec, SearchOptions};
//!
//! # async fn run() -> appsearch::Result<()> {
//! let client = Client::new("host-2376rb", "search-key", "node-modules");
//!
//! let options = SearchOptions::default()
//!     .filters(Filter::leaf("license", "BSD"))
//!     .facet("license", FacetSpec::value(10))
//!     .disjunctive("license");
//!
//! let response = client.search("cat", &options).await?;
//! for facet in &response.info.facets["license"] {
//!     for entry in &facet.data {
//!         println!("{}: {}", entry.value, entry.count);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod query;
pub mod result;
pub mod transport;

// Re-export main types at crate root
pub use client::{Client, ClickParams};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use filters::Filter;
pub use query::{FacetSpec, FacetSpecs, Page, QueryDescriptor, SearchOptions, build_query};
pub use result::{FacetCount, FacetResult, ResponseInfo, ResultItem, SearchResponse};
pub use transport::{HttpTransport, Method, Transport};
