// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read the markdown file and extract its HTTP/HTTPS links
// 3. Check every link concurrently, printing each result as it arrives
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod checker; // src/checker/ - link extraction and checking
mod cli; // src/cli.rs - command-line parsing
mod document; // src/document.rs - reading the markdown file
mod error; // src/error.rs - typed errors
mod logging; // src/logging.rs - tracing setup
mod report; // src/report.rs - table and JSON output

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use std::io;
use tracing::info;

use checker::Dispatcher;
use cli::Cli;
use error::DispatchError;
use report::{JsonSink, TableSink};

#[tokio::main]
async fn main() {
    // clap exits by itself on --help, --version and bad arguments
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Runs one check of one file
// Returns:
//   Ok(0) = every link is fine, or --error-ok was given
//   Ok(1) = broken links found
//   Err   = anything else went wrong (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let config = cli.probe_config()?;
    let concurrency = cli.concurrency_limit()?;

    let mut stdout = io::stdout();
    report::print_filepath(&mut stdout, &cli.filepath.display().to_string(), cli.json)
        .context("failed to write output")?;

    let markdown = document::read_markdown(&cli.filepath)?;
    let links = checker::classify(checker::extract_links(&markdown));
    info!(file = %cli.filepath.display(), links = links.len(), "extracted links");

    let client = checker::build_client().context("failed to build HTTP client")?;
    let dispatcher = Dispatcher::new(client, config, cli.error_ok).with_concurrency(concurrency);

    let result = if cli.json {
        dispatcher.run(links, &mut JsonSink::new(stdout)).await
    } else {
        dispatcher.run(links, &mut TableSink::new(stdout)).await
    };

    match result {
        Ok(()) => Ok(0),
        Err(DispatchError::LinksFailed) => {
            eprintln!("Error: {}", DispatchError::LinksFailed);
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
