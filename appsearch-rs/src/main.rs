//! Appsearch CLI entry point.

use clap::Parser;
use std::process::ExitCode;

use appsearch::cli::args::{Cli, Commands};
use appsearch::cli::output::Output;
use appsearch::cli::{click, search};
use appsearch::error::{ClientError, Result};
use appsearch::{Client, ClientConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let output = Output::new(false);

    match &cli.command {
        Commands::Search(args) => search::run(&client, args, &output).await,
        Commands::Click(args) => click::run(&client, args, &output).await,
    }
}

fn build_client(cli: &Cli) -> Result<Client> {
    let host_identifier = require(&cli.host_identifier, "--host-identifier (APPSEARCH_HOST)")?;
    let search_key = require(&cli.search_key, "--search-key (APPSEARCH_KEY)")?;
    let engine = require(&cli.engine, "--engine (APPSEARCH_ENGINE)")?;

    let mut config = ClientConfig::new(host_identifier, search_key, engine)
        .cache_responses(cli.cache);
    if let Some(base) = &cli.endpoint_base {
        config = config.endpoint_base(base);
    }
    Ok(Client::from_config(config))
}

fn require<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ClientError::Config(format!("{flag} is required")))
}
