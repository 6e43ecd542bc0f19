//! CLI module for the accounts API

pub mod serve;

use clap::{Parser, Subcommand};

/// Accounts API - registration, login and account lookup
#[derive(Parser)]
#[command(name = "accounts-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["accounts-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["accounts-api"]).unwrap();
        assert!(cli.command.is_none());
    }
}
