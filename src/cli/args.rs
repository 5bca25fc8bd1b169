//! CLI argument definitions using clap
//!
//! Commands:
//! - directus ping
//! - directus collections [--system]
//! - directus fields <collection>
//! - directus dump <endpoint>... --out <dir>
//! - directus explain <collection> --filter <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Directus REST API
#[derive(Parser, Debug)]
#[command(name = "directus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directus base url
    #[arg(long, global = true, env = "DIRECTUS_URL")]
    pub url: Option<String>,

    /// Static API token
    #[arg(long, global = true, env = "DIRECTUS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the server health endpoint
    Ping,

    /// List collection names
    Collections {
        /// Include directus_* system collections
        #[arg(long)]
        system: bool,
    },

    /// Print a collection's fields as a table
    Fields {
        collection: String,
    },

    /// Save raw endpoint payloads as JSON files
    Dump {
        /// Endpoints such as `collections/books` or `fields/books`
        #[arg(required = true)]
        endpoints: Vec<String>,

        /// Output directory
        #[arg(long, default_value = "tests/fixtures")]
        out: PathBuf,
    },

    /// Explain a query without contacting the server
    Explain {
        collection: String,

        /// Directus filter object
        #[arg(long, default_value = "{}")]
        filter: String,

        /// Comma-separated fields to select
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Sort keys, e.g. `-rating,title`
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,

        /// Maximum items; -1 for all
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
