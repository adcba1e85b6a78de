pub mod commands;

use clap::{Parser, Subcommand};
use crate::error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Personalized news retrieval with provider fallback and caching")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,

    /// Fetch news for a set of topic preferences
    Fetch {
        /// Topic preferences (e.g. tech ai finance)
        preferences: Vec<String>,

        /// Print the full response envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search news under a set of topic preferences
    Search {
        /// Search query
        query: String,

        /// Topic preferences to search under
        #[arg(short, long)]
        preferences: Vec<String>,

        /// Print the full response envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the cache key a preference set resolves to
    CacheKey {
        /// Topic preferences
        preferences: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        commands::init_logging(self.debug, self.verbose)?;

        match self.command {
            Commands::Init => {
                commands::init(self.config).await
            }
            Commands::Fetch { preferences, json } => {
                commands::fetch(preferences, json, self.config).await
            }
            Commands::Search { query, preferences, json } => {
                commands::search(query, preferences, json, self.config).await
            }
            Commands::CacheKey { preferences } => {
                commands::cache_key(preferences);
                Ok(())
            }
            Commands::Completions { shell } => {
                commands::generate_completions(shell);
                Ok(())
            }
        }
    }
}
