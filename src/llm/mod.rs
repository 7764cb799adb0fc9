//! Hosted model service client
//!
//! Thin HTTP client for a Gemini-style generative language API. One client is
//! created at the composition root and shared (via `Arc`) by the chunker, the
//! vector engine, and the answering agent. Failures propagate to the caller
//! unmodified; there is no retry or fallback here.

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the hosted generation and embedding endpoints
pub struct ModelClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl Content {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, `None` when the response carries none
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl ModelClient {
    /// Create a client from the model configuration.
    ///
    /// The API key is resolved by the caller (the composition root), never
    /// looked up here.
    pub fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid model API URL: {}", e)))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Submit one prompt to a generation model and return its text response.
    ///
    /// A response with no text payload yields `None`, not an error.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<Option<String>> {
        let url = self.endpoint(&format!("/v1beta/models/{}:generateContent", model))?;
        let request = GenerateRequest {
            contents: vec![Content::from_text(prompt)],
        };

        debug!(model, prompt_bytes = prompt.len(), "Generation request");

        let response = self
            .authorized(self.client.post(url).json(&request))
            .send()
            .await
            .map_err(|e| Error::Model(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Model(e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Model(e.to_string()))?;

        Ok(parsed.into_text())
    }

    /// Embed a batch of texts, one vector per input
    pub async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&format!("/v1beta/models/{}:batchEmbedContents", model))?;
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", model),
                    content: Content::from_text(text),
                })
                .collect(),
        };

        debug!(model, count = texts.len(), "Embedding request");

        let response = self
            .authorized(self.client.post(url).json(&request))
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Embedding(e.to_string()))?;

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        let embeddings: Vec<Vec<f32>> = parsed
            .embeddings
            .into_iter()
            .map(|embedding| embedding.values)
            .collect();

        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}
