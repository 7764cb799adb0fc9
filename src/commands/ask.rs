//! Ask command implementation

use crate::agent::{Answer, SearchAgent, SectionSearch};
use crate::config::Config;
use crate::error::Result;
use crate::llm::ModelClient;
use std::sync::Arc;

/// Ask options
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Number of sections retrieved for grounding
    pub k: Option<usize>,
    /// Override the configured answer model
    pub model: Option<String>,
}

/// Answer a question against the indexed documentation
pub async fn cmd_ask(
    config: &Config,
    client: Arc<ModelClient>,
    search: &dyn SectionSearch,
    question: &str,
    options: AskOptions,
) -> Result<Answer> {
    let k = options
        .k
        .unwrap_or(config.query.default_k)
        .min(config.query.max_results);
    let model = options
        .model
        .unwrap_or_else(|| config.model.answer_model.clone());

    let agent = SearchAgent::new(client, model, k);
    agent.answer(question, search).await
}

/// Print an answer to console
pub fn print_answer(answer: &Answer) {
    println!("\n{}", answer.text.trim());

    if !answer.sources.is_empty() {
        println!("\nGrounded on {} retrieved sections", answer.sources.len());
    }
}
