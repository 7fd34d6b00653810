//! Seclink server: expiring download links for files on disk.
//!
//! Entry point that parses the command line and dispatches to a command.

use clap::Parser;

mod commands;
mod logging;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        tracing::error!("Fatal: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
