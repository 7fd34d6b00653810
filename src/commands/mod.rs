//! CLI command definitions and dispatch.

pub mod links;
pub mod serve;

use clap::{Parser, Subcommand};

use seclink_core::config::AppConfig;
use seclink_core::error::AppError;

/// Share files through short-lived, unguessable links
#[derive(Debug, Parser)]
#[command(name = "seclink", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file layered over `config/default.toml`
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Configuration environment, selects `config/{env}.toml`
    #[arg(long, global = true, default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the public and admin servers
    Serve(serve::ServeArgs),
    /// Print live links as JSON
    Links,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env, self.config.as_deref())?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Links => links::execute(config).await,
        }
    }
}
