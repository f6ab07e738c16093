use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "octavo",
    about = "Fuzzy search over a personal book collection",
    version
)]
pub struct Cli {
    /// Path to a JSON library file (array of book records)
    #[arg(short, long, global = true, default_value = "library.json")]
    pub library: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the library
    Search {
        /// Query text: title, author, subject, or ISBN
        query: String,

        /// Maximum number of results to print
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Show index statistics for the library
    Stats,
}
