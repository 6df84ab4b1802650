use std::path::{Path, PathBuf};

use anyhow::Context;
use bookrent_kernel::settings::Settings;
use bookrent_ledger::Catalog;
use clap::{Parser, Subcommand};

/// Tooling for bookrent catalogs and configuration
#[derive(Debug, Parser)]
#[command(name = "bookrent-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a catalog file strictly and list its books
    Catalog {
        /// Catalog file; defaults to the configured `catalog.path`
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print the resolved settings as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookrent settings")?;
    // Logs go to stderr so stdout stays machine-readable
    bookrent_telemetry::init_stderr(&settings.telemetry)?;

    match cli.command {
        Command::Catalog { path } => {
            let path = path.unwrap_or_else(|| settings.catalog.path.clone());
            print_catalog(&path)
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn print_catalog(path: &Path) -> anyhow::Result<()> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("catalog {} is not usable", path.display()))?;

    tracing::debug!(path = %path.display(), books = catalog.len(), "catalog checked");

    for book in catalog.books() {
        println!(
            "{}\t{}/{}\t{}",
            book.isbn, book.available_copies, book.total_copies, book.title
        );
    }
    println!("{} books", catalog.len());
    Ok(())
}
