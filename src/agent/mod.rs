//! Question answering over indexed sections
//!
//! The agent retrieves the most relevant documentation sections for a
//! question through a search capability, then asks a hosted generative model
//! to compose an answer citing the source file names. Citation is requested
//! in the instruction; like the chunker's verbatim rule it is a soft
//! contract.

use crate::error::{Error, Result};
use crate::llm::ModelClient;
use crate::store::QdrantEngine;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of sections retrieved per question
pub const DEFAULT_TOP_K: usize = 5;

const ANSWER_INSTRUCTION: &str = r#"You answer questions about a codebase's documentation.

Ground your answer in the documentation excerpts provided below. If the
excerpts do not contain the relevant information, say so explicitly and give
general guidance instead.

Always cite the file names you drew from in your answer.
"#;

/// Search capability the agent depends on.
///
/// Returns snippet strings, most relevant first, each carrying its source
/// file name so the model can cite it.
#[async_trait]
pub trait SectionSearch: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>>;
}

#[async_trait]
impl SectionSearch for QdrantEngine {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        let results = QdrantEngine::search(self, query, top_k).await?;
        Ok(results
            .into_iter()
            .map(|section| format!("[{}]\n{}", section.payload.filename, section.payload.text))
            .collect())
    }
}

/// An answer together with the snippets it was grounded on
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

/// Retrieval-augmented question answering agent
pub struct SearchAgent {
    client: Arc<ModelClient>,
    model: String,
    top_k: usize,
}

impl SearchAgent {
    /// Create an agent bound to a shared model client and model id
    pub fn new(client: Arc<ModelClient>, model: impl Into<String>, top_k: usize) -> Self {
        Self {
            client,
            model: model.into(),
            top_k: top_k.max(1),
        }
    }

    /// Answer a question using the given search capability
    pub async fn answer(&self, question: &str, search: &dyn SectionSearch) -> Result<Answer> {
        info!("Answering: {}", question);

        let snippets = search.search(question, self.top_k).await?;
        debug!("Retrieved {} snippets", snippets.len());

        let prompt = build_answer_prompt(question, &snippets);
        let text = self
            .client
            .generate(&self.model, &prompt)
            .await?
            .ok_or_else(|| Error::Model("Model returned an empty answer".to_string()))?;

        Ok(Answer {
            text,
            sources: snippets,
        })
    }

    /// Blocking wrapper around [`SearchAgent::answer`] for non-async callers.
    ///
    /// Must not be called from within an async runtime.
    pub fn answer_blocking(&self, question: &str, search: &dyn SectionSearch) -> Result<Answer> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Other(format!("Failed to build runtime: {}", e)))?;
        runtime.block_on(self.answer(question, search))
    }
}

fn build_answer_prompt(question: &str, snippets: &[String]) -> String {
    let mut prompt = String::from(ANSWER_INSTRUCTION);

    prompt.push_str("\nDocumentation excerpts:\n");
    if snippets.is_empty() {
        prompt.push_str("(no relevant excerpts were found)\n");
    } else {
        for (index, snippet) in snippets.iter().enumerate() {
            prompt.push_str(&format!("\n{}. {}\n", index + 1, snippet));
        }
    }

    prompt.push_str(&format!("\nQuestion: {}\n", question));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StubSearch(Vec<String>);

    #[async_trait]
    impl SectionSearch for StubSearch {
        async fn search(&self, _query: &str, top_k: usize) -> Result<Vec<String>> {
            Ok(self.0.iter().take(top_k).cloned().collect())
        }
    }

    fn agent_for(base_url: &str, top_k: usize) -> SearchAgent {
        let config = ModelConfig {
            api_base_url: base_url.to_string(),
            ..ModelConfig::default()
        };
        let client = Arc::new(ModelClient::new(&config, None).unwrap());
        SearchAgent::new(client, "answerer", top_k)
    }

    #[test]
    fn test_prompt_carries_snippets_and_question() {
        let snippets = vec!["[README.md]\nWidgets are great.".to_string()];
        let prompt = build_answer_prompt("What are widgets?", &snippets);
        assert!(prompt.contains("[README.md]"));
        assert!(prompt.contains("Widgets are great."));
        assert!(prompt.contains("Question: What are widgets?"));
    }

    #[test]
    fn test_prompt_notes_empty_retrieval() {
        let prompt = build_answer_prompt("anything", &[]);
        assert!(prompt.contains("no relevant excerpts"));
    }

    #[tokio::test]
    async fn test_answer_uses_retrieved_snippets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/answerer:generateContent"))
            .and(body_string_contains("docs/widgets.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{
                    "text": "Widgets are great (docs/widgets.md)."
                }]}}]
            })))
            .mount(&mock_server)
            .await;

        let agent = agent_for(&mock_server.uri(), DEFAULT_TOP_K);
        let search = StubSearch(vec!["[docs/widgets.md]\nWidgets are great.".to_string()]);

        let answer = agent.answer("What are widgets?", &search).await.unwrap();
        assert!(answer.text.contains("docs/widgets.md"));
        assert_eq!(answer.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_top_k_limits_retrieval() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/answerer:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .mount(&mock_server)
            .await;

        let agent = agent_for(&mock_server.uri(), 2);
        let search = StubSearch(vec![
            "[a.md]\nA".to_string(),
            "[b.md]\nB".to_string(),
            "[c.md]\nC".to_string(),
        ]);

        let answer = agent.answer("q", &search).await.unwrap();
        assert_eq!(answer.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_model_answer_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/answerer:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&mock_server)
            .await;

        let agent = agent_for(&mock_server.uri(), DEFAULT_TOP_K);
        let search = StubSearch(vec![]);

        let err = agent.answer("q", &search).await.unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }
}
