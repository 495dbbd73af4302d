#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! Luqmah CLI
//!
//! Command-line client for the Halal Luqmah restaurant directory

use clap::Parser;
use luqmah::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}
