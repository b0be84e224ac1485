//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "appsearch")]
#[command(author, version, about = "Query hosted App Search engines", long_about = None)]
pub struct Cli {
    /// Account host identifier, e.g. host-2376rb
    #[arg(long, global = true, env = "APPSEARCH_HOST")]
    pub host_identifier: Option<String>,

    /// Public search key
    #[arg(long, global = true, env = "APPSEARCH_KEY")]
    pub search_key: Option<String>,

    /// Engine name
    #[arg(long, global = true, env = "APPSEARCH_ENGINE")]
    pub engine: Option<String>,

    /// Override the backend host, e.g. http://localhost:3002
    #[arg(long, global = true)]
    pub endpoint_base: Option<String>,

    /// Cache identical responses for the lifetime of the process
    #[arg(long, global = true)]
    pub cache: bool,

    /// Log request dispatch to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search query
    Search(SearchArgs),

    /// Record a click (relevance feedback) event
    Click(ClickArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// The query string
    pub query: String,

    /// Filter tree as JSON, e.g. '{"all": [{"license": "BSD"}]}'
    #[arg(long)]
    pub filters: Option<String>,

    /// Facet specs as JSON, e.g. '{"license": {"type": "value", "size": 10}}'
    #[arg(long)]
    pub facets: Option<String>,

    /// Treat a faceted field as disjunctive (repeatable)
    #[arg(long = "disjunctive")]
    pub disjunctive: Vec<String>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u64>,

    /// Page number (1-based)
    #[arg(long)]
    pub page_current: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ClickArgs {
    /// The query that produced the result
    #[arg(long)]
    pub query: String,

    /// Id of the clicked document
    #[arg(long)]
    pub document_id: String,

    /// Request id from the search response
    #[arg(long)]
    pub request_id: String,

    /// Analytics tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}
