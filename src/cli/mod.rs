//! Command-line interface for anicat.

pub mod commands;

use clap::{Parser, Subcommand};

/// Anicat - anime catalog API
#[derive(Parser)]
#[command(name = "anicat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Replace the catalog with the bundled demo data
    Seed,

    /// Show the highest rated catalog entries
    #[command(alias = "ls")]
    List {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_and_aliases() {
        let cli = Cli::try_parse_from(["anicat", "daemon"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));

        let cli = Cli::try_parse_from(["anicat", "list", "--limit", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { limit: 3 })));

        let cli = Cli::try_parse_from(["anicat"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(Cli::try_parse_from(["anicat", "import"]).is_err());
    }
}
