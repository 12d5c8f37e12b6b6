use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ingest-admin", version)]
#[command(about = "List, upload and delete documents in a remote ingestion service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the document store (overrides DOCUMENT_STORE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API path prefix, e.g. `v2`; pass an empty string for none
    #[arg(long, global = true)]
    pub api_prefix: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents
    List {
        /// Only show documents whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search document titles (case-insensitive)
    Search {
        term: String,

        #[arg(long)]
        json: bool,
    },

    /// Upload files as a single batch
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete documents by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
