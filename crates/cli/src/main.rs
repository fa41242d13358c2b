use std::path::PathBuf;

use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookshelf API server and maintenance commands
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Drop the books collection and insert a dataset
    Seed {
        /// JSON array of books; defaults to the bundled dataset
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => bookshelf_app::serve(settings).await,
        Command::Seed { dataset } => {
            // Parse first so a bad file never drops the collection.
            let books = bookshelf_app::seed::load_dataset(dataset.as_deref())?;
            let store = bookshelf_app::open_store(&settings).await?;
            let report = bookshelf_app::seed::seed(store.as_ref(), books).await?;

            tracing::info!(
                seeded = report.seeded,
                failed = report.failed,
                "seed complete"
            );
            if report.failed > 0 {
                anyhow::bail!("{} books failed to seed", report.failed);
            }
            Ok(())
        }
    }
}
