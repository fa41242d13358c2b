//! One-off store seeding from a JSON dataset.

use std::{path::Path, time::Duration, time::Instant};

use anyhow::Context;

use crate::modules::books::{
    models::{Book, NewBook},
    store::BookStore,
};

/// Dataset shipped with the repository.
pub const BUNDLED_DATASET: &str = include_str!("../data/books.json");

/// Outcome of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Parse a JSON array of books.
pub fn parse_dataset(json: &str) -> anyhow::Result<Vec<NewBook>> {
    serde_json::from_str(json).context("dataset is not a JSON array of books")
}

/// Read and parse a dataset file, or the bundled one when `path` is `None`.
pub fn load_dataset(path: Option<&Path>) -> anyhow::Result<Vec<NewBook>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            parse_dataset(&json)
        }
        None => parse_dataset(BUNDLED_DATASET),
    }
}

/// Drop every stored book, then insert `books`.
///
/// Failing to clear the store aborts the run; individual insert failures are
/// logged and counted.
pub async fn seed(store: &dyn BookStore, books: Vec<NewBook>) -> anyhow::Result<SeedReport> {
    let started = Instant::now();

    store
        .clear()
        .await
        .context("failed to drop existing books")?;
    tracing::info!("books collection dropped");

    let mut report = SeedReport {
        seeded: 0,
        failed: 0,
        elapsed: Duration::ZERO,
    };

    for new_book in books {
        let title = new_book.title.clone();
        match store.save(Book::from(new_book)).await {
            Ok(book) => {
                tracing::info!(id = ?book.id, %title, "seeded book");
                report.seeded += 1;
            }
            Err(err) => {
                tracing::warn!(%title, error = %err, "failed to seed book");
                report.failed += 1;
            }
        }
    }

    report.elapsed = started.elapsed();
    tracing::info!(
        seeded = report.seeded,
        failed = report.failed,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "seeding finished"
    );

    Ok(report)
}
