//! Ingest command implementation

use crate::chunk::SectionChunker;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::RepoFetcher;
use crate::store::QdrantEngine;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub docs_fetched: i32,
    pub docs_indexed: i32,
    pub docs_empty: i32,
    pub sections_indexed: i32,
    pub errors: Vec<String>,
}

/// Ingest one repository branch into the vector index.
///
/// Downloads the snapshot, chunks every documentation file with the hosted
/// model, and upserts the embedded sections. A failing document is recorded
/// and skipped; the download itself stays fatal.
pub async fn cmd_ingest_repo(
    config: &Config,
    engine: &QdrantEngine,
    chunker: &SectionChunker,
    owner: &str,
    name: &str,
    branch: Option<&str>,
) -> Result<IngestStats> {
    let branch = branch.unwrap_or(&config.fetch.default_branch);
    let repo = format!("{}/{}", owner, name);

    engine.ensure_collection().await?;

    let fetcher = RepoFetcher::new(config.fetch.clone())?;
    let records = fetcher.fetch_documents(owner, name, branch).await?;

    // Replace any previously indexed snapshot of this repo
    engine.delete_repo(&repo).await?;

    let mut stats = IngestStats {
        docs_fetched: records.len() as i32,
        ..Default::default()
    };

    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for record in &records {
        progress.set_message(record.filename.clone());

        match chunker.chunk_document(&record.body).await {
            Ok(sections) if sections.is_empty() => {
                debug!("No sections produced for {}", record.filename);
                stats.docs_empty += 1;
            }
            Ok(sections) => {
                match engine.index_document(&repo, branch, record, &sections).await {
                    Ok(count) => {
                        stats.docs_indexed += 1;
                        stats.sections_indexed += count as i32;
                    }
                    Err(e) => {
                        warn!("Failed to index {}: {}", record.filename, e);
                        stats.errors.push(format!("{}: {}", record.filename, e));
                    }
                }
            }
            Err(e) => {
                warn!("Failed to chunk {}: {}", record.filename, e);
                stats.errors.push(format!("{}: {}", record.filename, e));
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(stats)
}

/// Print ingestion statistics to console
pub fn print_ingest_stats(repo: &str, branch: &str, stats: &IngestStats) {
    println!("\n✓ Ingested {}@{}", repo, branch);
    println!("  Documents fetched: {}", stats.docs_fetched);
    println!("  Documents indexed: {}", stats.docs_indexed);
    println!("  Sections indexed: {}", stats.sections_indexed);

    if stats.docs_empty > 0 {
        println!("  Documents without sections: {}", stats.docs_empty);
    }

    if !stats.errors.is_empty() {
        println!("  Errors ({}):", stats.errors.len());
        for error in &stats.errors {
            println!("    - {}", error);
        }
    }
}
