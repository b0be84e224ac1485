//! Search command implementation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::Client;
use crate::cli::args::SearchArgs;
use crate::cli::output::Output;
use crate::error::{ClientError, Result};
use crate::filters::Filter;
use crate::query::{FacetSpecs, Page, SearchOptions};

pub async fn run(client: &Client, args: &SearchArgs, output: &Output) -> Result<()> {
    let options = options_from_args(args)?;
    let response = client.search(&args.query, &options).await?;
    output.print(&response)
}

fn options_from_args(args: &SearchArgs) -> Result<SearchOptions> {
    let mut options = SearchOptions::default();

    if args.page_size.is_some() || args.page_current.is_some() {
        options.page = Some(Page {
            size: args.page_size,
            current: args.page_current,
        });
    }

    if let Some(raw) = &args.filters {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ClientError::Config(format!("invalid --filters JSON: {e}")))?;
        if !matches!(&value, Value::Object(map) if map.is_empty()) {
            options.filters = Some(Filter::from_value(value)?);
        }
    }

    if let Some(raw) = &args.facets {
        options.facets = serde_json::from_str::<BTreeMap<String, FacetSpecs>>(raw)
            .map_err(|e| ClientError::Config(format!("invalid --facets JSON: {e}")))?;
    }

    options.disjunctive_facets = args.disjunctive.clone();
    Ok(options)
}
