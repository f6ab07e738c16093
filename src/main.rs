use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use octavo::{BookRecord, MemoryBookStore, SearchCoordinator};

mod cli;
use cli::{Cli, Commands};

fn load_library(path: &Path) -> anyhow::Result<MemoryBookStore> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read library file {}", path.display()))?;
    let records: Vec<BookRecord> = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse library file {}", path.display()))?;
    Ok(MemoryBookStore::from_records(records))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = load_library(&cli.library)?;

    let mut coordinator = SearchCoordinator::with_default_metadata_store();
    coordinator.rebuild_index(&store).await?;

    match cli.command {
        Commands::Search { query, limit } => {
            let results = coordinator.search(&query, &store).await?;
            if results.is_empty() {
                println!("no matches for {query:?}");
                return Ok(());
            }
            for result in results.iter().take(limit) {
                println!(
                    "{:>8.1}  [{}]  {} by {}",
                    result.score,
                    result.kind.as_str(),
                    result.record.title,
                    result.record.authors.join(", "),
                );
            }
        }
        Commands::Stats => {
            let stats = coordinator.index_stats();
            println!("books indexed:   {}", stats.count);
            match stats.last_indexed_at {
                Some(at) => println!("last indexed at: {}", at.to_rfc3339()),
                None => println!("last indexed at: never"),
            }
        }
    }

    Ok(())
}
