//! Click command implementation.

use crate::cli::args::ClickArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::{Client, ClickParams};

pub async fn run(client: &Client, args: &ClickArgs, output: &Output) -> Result<()> {
    let params = ClickParams {
        query: args.query.clone(),
        document_id: args.document_id.clone(),
        request_id: args.request_id.clone(),
        tags: args.tags.clone(),
    };
    let ack = client.click(&params).await?;
    output.print(&ack)
}
