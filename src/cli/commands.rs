use crate::DEFAULT_SEARCH_LIMIT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chunkvault", about = "Embedded vector store for code chunks")]
pub struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open (or create) the store directory
    Init,
    /// Insert or replace records from a JSON array of {id, vector, payload}
    Upsert {
        /// Path to the JSON file, or "-" for stdin
        input: PathBuf,
    },
    /// Nearest-neighbor search with a JSON array query vector
    Search {
        /// Query vector, e.g. "[0.1, 0.2, ...]"
        vector: String,
        /// Only return records of this element type (function, component, ...)
        #[arg(long = "type")]
        element_type: Option<String>,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Drop the collection; it is recreated by the next upsert
    Clear,
    /// Show store health
    Health,
    /// Show collection statistics
    Info,
}
