//! Model-driven section chunking
//!
//! This module splits a document body into self-contained sections by
//! prompting a hosted generative model and splitting its response on a
//! separator line. The model is asked to copy text verbatim; that instruction
//! is a soft contract and is not verified against the source.

use crate::error::Result;
use crate::llm::ModelClient;
use std::sync::Arc;
use tracing::debug;

/// Separator the model is instructed to place between sections
pub const SECTION_SEPARATOR: &str = "---";

const PROMPT_HEADER: &str = r#"You segment documentation for a question-answering index.

Split the document below into logical, self-contained sections. Each section
must focus on a single topic or concept.

Rules:
1. ONLY use exact text from the document: copy text VERBATIM
2. DO NOT add explanations, introductions, summaries, or commentary
3. Start each section with a short descriptive title line in the form '## Title'
4. Separate sections with a line containing exactly three hyphens (---)
"#;

/// Build the chunking prompt for one document
fn build_prompt(document: &str) -> String {
    format!(
        "{}\n<DOCUMENT>\n{}\n</DOCUMENT>\n",
        PROMPT_HEADER, document
    )
}

/// Splits documents into sections using a hosted generative model
pub struct SectionChunker {
    client: Arc<ModelClient>,
    model: String,
}

impl SectionChunker {
    /// Create a chunker bound to a shared model client and model id
    pub fn new(client: Arc<ModelClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// The model id this chunker sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Split one document body into sections.
    ///
    /// A response with no text yields zero sections. Model failures propagate
    /// unmodified; there is no retry here.
    pub async fn chunk_document(&self, document: &str) -> Result<Vec<String>> {
        let prompt = build_prompt(document);
        debug!(
            model = %self.model,
            document_bytes = document.len(),
            "Requesting section split"
        );

        let Some(response) = self.client.generate(&self.model, &prompt).await? else {
            return Ok(Vec::new());
        };

        Ok(split_sections(&response))
    }
}

/// Split a model response on separator lines into trimmed, non-empty sections.
///
/// A separator is any line whose trimmed content is exactly `---`. Sections
/// keep their original order; segments that trim to nothing are dropped.
pub fn split_sections(response: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in response.lines() {
        if line.trim() == SECTION_SEPARATOR {
            flush_section(&mut sections, &mut current);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    flush_section(&mut sections, &mut current);

    sections
}

fn flush_section(sections: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sections.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_split_two_sections() {
        let response = "## A\n\ntext1\n\n---\n\n## B\n\ntext2\n\n---\n";
        let sections = split_sections(response);
        assert_eq!(sections, vec!["## A\n\ntext1", "## B\n\ntext2"]);
    }

    #[test]
    fn test_split_preserves_order_and_interior_lines() {
        let response = "first\nstill first\n---\nsecond";
        let sections = split_sections(response);
        assert_eq!(sections, vec!["first\nstill first", "second"]);
    }

    #[test]
    fn test_whitespace_only_response_yields_nothing() {
        assert!(split_sections("   \n\n  \t\n").is_empty());
    }

    #[test]
    fn test_separator_only_response_yields_nothing() {
        assert!(split_sections("---\n---\n---\n").is_empty());
    }

    #[test]
    fn test_sections_are_trimmed_and_non_empty() {
        let response = "\n  padded  \n---\n\n---\n tail ";
        let sections = split_sections(response);
        assert_eq!(sections, vec!["padded", "tail"]);
        assert!(sections.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_rejoining_reconstructs_response_up_to_whitespace() {
        let response = "## A\n\ntext1\n\n---\n\n## B\n\ntext2";
        let sections = split_sections(response);
        let rejoined = sections.join("\n---\n");

        let normalize = |s: &str| {
            s.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(normalize(&rejoined), normalize(response));
    }

    #[test]
    fn test_prompt_embeds_document() {
        let prompt = build_prompt("alpha beta");
        assert!(prompt.contains("<DOCUMENT>\nalpha beta\n</DOCUMENT>"));
        assert!(prompt.contains("VERBATIM"));
    }

    #[tokio::test]
    async fn test_chunk_document_via_mock_model() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/chunker:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{
                    "text": "## Intro\n\nWelcome.\n\n---\n\n## Usage\n\nRun it.\n\n---\n"
                }]}}]
            })))
            .mount(&mock_server)
            .await;

        let config = ModelConfig {
            api_base_url: mock_server.uri(),
            ..ModelConfig::default()
        };
        let client = Arc::new(ModelClient::new(&config, None).unwrap());
        let chunker = SectionChunker::new(client, "chunker");

        let sections = chunker.chunk_document("Welcome. Run it.").await.unwrap();
        assert_eq!(sections, vec!["## Intro\n\nWelcome.", "## Usage\n\nRun it."]);
    }

    #[tokio::test]
    async fn test_empty_model_response_yields_no_sections() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/chunker:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&mock_server)
            .await;

        let config = ModelConfig {
            api_base_url: mock_server.uri(),
            ..ModelConfig::default()
        };
        let client = Arc::new(ModelClient::new(&config, None).unwrap());
        let chunker = SectionChunker::new(client, "chunker");

        let sections = chunker.chunk_document("anything").await.unwrap();
        assert!(sections.is_empty());
    }
}
