use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsite-index")]
#[command(about = "Generate CSS documentation and search indexes for a docs site", long_about = None)]
pub struct Cli {
    /// Project root that include patterns and output paths are relative to
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,
    /// Config file (defaults to docsite.toml in the project root, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log per-file details
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the CSS docs and the search index in one pass
    Build,
    /// Build only the CSS documentation file
    CssDocs {
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Build only the search index, reading CSS docs from disk
    SearchIndex {
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Persisted CSS docs to integrate
        #[arg(long)]
        css_docs: Option<PathBuf>,
    },
    /// Build once, then rebuild whenever a watched file changes
    Watch {
        /// Debounce window in milliseconds
        #[arg(long, default_value = "100")]
        debounce_ms: u64,
    },
}
