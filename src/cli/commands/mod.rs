//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod helpers;
mod init;
mod search;
mod serve;
mod source;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "ua-media-scanner")]
#[command(about = "Discover and catalogue Ukrainian media sources")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides config file)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,

    /// Search for media sources and store them as new sources
    Search {
        /// Free-text query (Ukrainian works best)
        query: String,
        /// Maximum number of sources to return (default: from config)
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Only print results, don't store them
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage known (vetted) sources
    Known {
        #[command(subcommand)]
        command: KnownCommands,
    },

    /// Inspect newly found sources awaiting verification
    New {
        #[command(subcommand)]
        command: NewCommands,
    },

    /// Mark a new source as verified
    Verify {
        /// New source ID
        id: i32,
    },

    /// Move a verified new source into known sources
    Promote {
        /// New source ID
        id: i32,
    },

    /// Promote every verified new source
    Sync,

    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

#[derive(Subcommand)]
enum KnownCommands {
    /// List known sources
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a known source directly
    Add {
        /// Source URL or domain
        url: String,
        /// Display name (default: the domain)
        #[arg(long, default_value = "")]
        name: String,
        /// Short description
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum NewCommands {
    /// List new sources
    List {
        /// Only show verified sources
        #[arg(long)]
        verified: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    if let Some(database) = cli.database {
        config.database = Some(database);
    }

    match cli.command {
        Commands::Init => init::cmd_init(&config).await,
        Commands::Search {
            query,
            max_results,
            dry_run,
            json,
        } => search::cmd_search(&config, &query, max_results, dry_run, json).await,
        Commands::Known { command } => match command {
            KnownCommands::List { json } => source::cmd_known_list(&config, json).await,
            KnownCommands::Add {
                url,
                name,
                description,
            } => source::cmd_known_add(&config, &url, &name, &description).await,
        },
        Commands::New { command } => match command {
            NewCommands::List { verified, json } => {
                source::cmd_new_list(&config, verified, json).await
            }
        },
        Commands::Verify { id } => source::cmd_verify(&config, id).await,
        Commands::Promote { id } => source::cmd_promote(&config, id).await,
        Commands::Sync => source::cmd_sync(&config).await,
        Commands::Serve { host, port } => serve::cmd_serve(&config, &host, port).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from([
            "ua-media-scanner",
            "search",
            "новини Харків",
            "-n",
            "5",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Search {
                query,
                max_results,
                dry_run,
                json,
            } => {
                assert_eq!(query, "новини Харків");
                assert_eq!(max_results, Some(5));
                assert!(dry_run);
                assert!(!json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn serve_has_defaults() {
        let cli = Cli::try_parse_from(["ua-media-scanner", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8000);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn verify_requires_numeric_id() {
        assert!(Cli::try_parse_from(["ua-media-scanner", "verify", "abc"]).is_err());
    }
}
