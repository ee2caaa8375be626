//! CLI definitions using clap derive macros
//!
//! Subcommands:
//! - build: Scan the content tree and write the search artifact (default)
//! - search: Query an artifact from the terminal
//! - status: Show artifact metadata
//! - watch: Rebuild the artifact whenever content changes

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docsearch - build and query documentation search indexes
#[derive(Parser, Debug)]
#[command(name = "docsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./docsearch.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Defaults to `build` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the search artifact from the content directory
    Build {
        /// Content root to scan
        #[arg(short, long, value_name = "DIR")]
        content: Option<PathBuf>,

        /// Where to write the artifact
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Abort on the first unreadable document
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Search a built artifact
    Search {
        /// Search query
        #[arg(value_name = "QUERY")]
        query: String,

        /// Artifact to load (defaults to the configured output path)
        #[arg(short, long, value_name = "FILE")]
        index: Option<PathBuf>,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output results as JSON (for tool integration)
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show artifact metadata and health
    Status {
        /// Artifact to inspect (defaults to the configured output path)
        #[arg(short, long, value_name = "FILE")]
        index: Option<PathBuf>,
    },

    /// Watch the content directory and rebuild on changes
    Watch {
        /// Content root to watch
        #[arg(short, long, value_name = "DIR")]
        content: Option<PathBuf>,

        /// Where to write the artifact
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Build {
            content: None,
            output: None,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_a_build() {
        let cli = Cli::try_parse_from(["docsearch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Build { strict: false, .. }
        ));
    }

    #[test]
    fn test_search_arguments() {
        let cli = Cli::try_parse_from(["docsearch", "search", "shared memory", "--limit", "5", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Search { query, limit, json, index }) => {
                assert_eq!(query, "shared memory");
                assert_eq!(limit, Some(5));
                assert!(json);
                assert!(index.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["docsearch", "status", "--config", "site.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.json")));
    }
}
