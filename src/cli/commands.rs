//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Contact aggregator CLI
#[derive(Parser, Debug)]
#[command(name = "contact-aggregator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Port to listen on (overrides settings)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Aggregate all contacts once and print them
    Fetch {
        /// Only keep contacts from this source
        #[arg(long)]
        source: Option<String>,

        /// Page number; prints the paged envelope when set
        #[arg(long)]
        page: Option<i64>,

        /// Page size; prints the paged envelope when set
        #[arg(long)]
        size: Option<i64>,
    },

    /// Probe the first upstream page
    Check,
}
