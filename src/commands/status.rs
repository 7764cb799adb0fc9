//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::store::QdrantEngine;
use serde::Serialize;

/// System status for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    pub qdrant_url: String,
    pub collection: String,
    pub collection_exists: bool,
    pub points_count: u64,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chunk_model: String,
    pub answer_model: String,
}

/// Gather system status
pub async fn cmd_status(config: &Config, engine: &QdrantEngine) -> Result<StatusOutput> {
    let info = engine.collection_info().await?;

    Ok(StatusOutput {
        qdrant_url: config.qdrant_url.clone(),
        collection: config.collection_name.clone(),
        collection_exists: info.is_some(),
        points_count: info.map(|i| i.points_count).unwrap_or(0),
        embedding_model: config.model.embedding_model.clone(),
        embedding_dimension: config.model.embedding_dimension,
        chunk_model: config.model.chunk_model.clone(),
        answer_model: config.model.answer_model.clone(),
    })
}

/// Print status to console
pub fn print_status(status: &StatusOutput) {
    println!("docent status:");
    println!("  Qdrant: {}", status.qdrant_url);
    println!(
        "  Collection: {} ({})",
        status.collection,
        if status.collection_exists {
            format!("{} points", status.points_count)
        } else {
            "missing - run 'docent db init'".to_string()
        }
    );
    println!(
        "  Embedding model: {} (dimension {})",
        status.embedding_model, status.embedding_dimension
    );
    println!("  Chunk model: {}", status.chunk_model);
    println!("  Answer model: {}", status.answer_model);
}
