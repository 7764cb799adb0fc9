//! Default values for configuration

/// Default Qdrant gRPC URL for local development (port 6334, not 6333 REST)
pub fn default_qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".to_string())
}

/// Default environment variable name for Qdrant API key
pub fn default_qdrant_api_key_env() -> String {
    "".to_string()
}

/// Default collection name
pub fn default_collection_name() -> String {
    "docent_sections".to_string()
}

/// Default base URL of the hosted generative language API
pub fn default_model_api_base_url() -> String {
    std::env::var("DOCENT_MODEL_API_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

/// Default environment variable name for the model API key
pub fn default_model_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Default model used for section chunking (lightweight)
pub fn default_chunk_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

/// Default model used for answering questions
pub fn default_answer_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// Default embedding model
pub fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

/// Default embedding dimension (must match the embedding model)
pub fn default_embedding_dimension() -> usize {
    768
}

/// Default batch size for embedding requests
pub fn default_embedding_batch_size() -> usize {
    32
}

/// Default base URL for repository snapshot downloads
pub fn default_archive_base_url() -> String {
    "https://codeload.github.com".to_string()
}

/// Default branch when none is given
pub fn default_branch() -> String {
    "main".to_string()
}

/// Default documentation file suffixes extracted from an archive
pub fn default_doc_suffixes() -> Vec<String> {
    vec![".md".to_string(), ".mdx".to_string()]
}

/// Default user agent
pub fn default_fetch_user_agent() -> String {
    format!("docent/{} (Documentation Indexer)", env!("CARGO_PKG_VERSION"))
}

/// Default download timeout in seconds
pub fn default_fetch_timeout() -> u64 {
    60
}

/// Default number of sections retrieved per question
pub fn default_query_k() -> usize {
    5
}

/// Default maximum query results
pub fn default_query_max_results() -> usize {
    50
}
