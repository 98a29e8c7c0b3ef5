//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chatsift",
    version,
    author = "neur0map",
    about = "Segment chat history and rank hybrid search results",
    long_about = "Chatsift groups chronologically ordered chat messages into topically coherent \
                  conversation segments ready for embedding, and re-ranks raw vector search hits \
                  by fusing vector similarity with keyword overlap while collapsing duplicates."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/chatsift/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split messages into conversation segments
    Segment {
        /// JSON file holding an array of messages
        input: PathBuf,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Rank and deduplicate raw vector search hits
    Rank {
        /// JSON file holding an array of raw hits
        input: PathBuf,

        /// Original query text
        #[arg(short, long)]
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank() {
        let cli = Cli::try_parse_from([
            "chatsift", "rank", "hits.json", "--query", "deploy window", "-l", "5", "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Rank {
                input,
                query,
                limit,
                json,
            } => {
                assert_eq!(input, PathBuf::from("hits.json"));
                assert_eq!(query, "deploy window");
                assert_eq!(limit, 5);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
