//! Configuration management for docent
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Qdrant connection URL
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,

    /// Environment variable name for Qdrant API key
    #[serde(default = "default_qdrant_api_key_env")]
    pub qdrant_api_key_env: String,

    /// Qdrant collection name
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Hosted model service configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Repository fetching configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Hosted model service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_model_api_base_url")]
    pub api_base_url: String,

    /// Environment variable name for the API key
    #[serde(default = "default_model_api_key_env")]
    pub api_key_env: String,

    /// Model used for section chunking
    #[serde(default = "default_chunk_model")]
    pub chunk_model: String,

    /// Model used for answering questions
    #[serde(default = "default_answer_model")]
    pub answer_model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimension (must match the embedding model)
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Batch size for embedding requests
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,
}

/// Repository fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL for branch snapshot downloads
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// Branch used when none is given
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// File suffixes treated as documentation (matched case-insensitively)
    #[serde(default = "default_doc_suffixes")]
    pub doc_suffixes: Vec<String>,

    /// User agent string
    #[serde(default = "default_fetch_user_agent")]
    pub user_agent: String,

    /// Download timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default number of sections retrieved per question
    #[serde(default = "default_query_k")]
    pub default_k: usize,

    /// Maximum results allowed
    #[serde(default = "default_query_max_results")]
    pub max_results: usize,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for docent data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: default_qdrant_url(),
            qdrant_api_key_env: default_qdrant_api_key_env(),
            collection_name: default_collection_name(),
            model: ModelConfig::default(),
            fetch: FetchConfig::default(),
            query: QueryConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_model_api_base_url(),
            api_key_env: default_model_api_key_env(),
            chunk_model: default_chunk_model(),
            answer_model: default_answer_model(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            embedding_batch_size: default_embedding_batch_size(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            archive_base_url: default_archive_base_url(),
            default_branch: default_branch(),
            doc_suffixes: default_doc_suffixes(),
            user_agent: default_fetch_user_agent(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_k: default_query_k(),
            max_results: default_query_max_results(),
        }
    }
}

impl ModelConfig {
    /// Get the model API key from environment
    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env).ok()
    }
}

impl Config {
    /// Get the default base directory for docent (~/.docent)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docent")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Get the Qdrant API key from environment
    pub fn qdrant_api_key(&self) -> Option<String> {
        if self.qdrant_api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.qdrant_api_key_env).ok()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.embedding_dimension == 0 {
            return Err(Error::Config(
                "model.embedding_dimension must be positive".to_string(),
            ));
        }

        if self.model.embedding_batch_size == 0 {
            return Err(Error::Config(
                "model.embedding_batch_size must be positive".to_string(),
            ));
        }

        if self.query.default_k == 0 || self.query.default_k > self.query.max_results {
            return Err(Error::Config(
                "query.default_k must be between 1 and query.max_results".to_string(),
            ));
        }

        if self.fetch.doc_suffixes.is_empty() {
            return Err(Error::Config(
                "fetch.doc_suffixes must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.qdrant_url, "http://127.0.0.1:6334");
        assert_eq!(config.collection_name, "docent_sections");
        assert_eq!(config.fetch.default_branch, "main");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.collection_name = "test_collection".to_string();

        config.save().unwrap();
        assert!(config.paths.config_file.exists());

        let loaded = Config::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(loaded.collection_name, "test_collection");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Invalid: k above max
        config.query.default_k = config.query.max_results + 1;
        assert!(config.validate().is_err());

        // Fix it
        config.query.default_k = 5;
        assert!(config.validate().is_ok());

        // Invalid: no doc suffixes
        config.fetch.doc_suffixes.clear();
        assert!(config.validate().is_err());
    }
}
