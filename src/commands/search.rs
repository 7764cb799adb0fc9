//! Search command implementation

use crate::config::Config;
use crate::error::Result;
use crate::store::QdrantEngine;
use serde::Serialize;
use tracing::info;

/// A search hit prepared for display
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub score: f32,
    pub filename: String,
    pub section_index: i32,
    pub title: Option<String>,
    pub text: String,
}

/// Search result for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

/// Execute a raw vector search
pub async fn cmd_search(
    config: &Config,
    engine: &QdrantEngine,
    query: &str,
    limit: Option<usize>,
) -> Result<SearchOutput> {
    let k = limit
        .unwrap_or(config.query.default_k)
        .min(config.query.max_results);

    info!("Searching: {}", query);
    let results = engine.search(query, k).await?;

    let hits = results
        .into_iter()
        .map(|section| SearchHit {
            score: section.score,
            filename: section.payload.filename,
            section_index: section.payload.section_index,
            title: section.payload.title,
            text: section.payload.text,
        })
        .collect();

    Ok(SearchOutput {
        query: query.to_string(),
        hits,
    })
}

/// Print search results to console
pub fn print_search_results(output: &SearchOutput) {
    println!("\n🔍 Query: {}\n", output.query);
    println!("Found {} results:\n", output.hits.len());

    for (i, hit) in output.hits.iter().enumerate() {
        println!(
            "{}. [score: {:.3}] {} (section {})",
            i + 1,
            hit.score,
            hit.filename,
            hit.section_index
        );

        if let Some(title) = &hit.title {
            println!("   Title: {}", title);
        }

        let preview = if hit.text.len() > 200 {
            let cut = hit
                .text
                .char_indices()
                .take_while(|(idx, _)| *idx < 200)
                .last()
                .map(|(idx, c)| idx + c.len_utf8())
                .unwrap_or(hit.text.len());
            format!("{}...", hit.text[..cut].trim())
        } else {
            hit.text.trim().to_string()
        };
        println!("   {}\n", preview.replace('\n', " "));
    }
}
