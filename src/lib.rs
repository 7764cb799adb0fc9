//! docent - answers questions about a repository's Markdown documentation
//!
//! This crate provides:
//! - A fetcher that downloads a repository's branch snapshot and extracts
//!   Markdown files with their front matter
//! - A section chunker that splits documents with a hosted generative model
//! - Integration with Qdrant vector database for semantic search
//! - A question-answering agent that cites the files it drew from

pub mod agent;
pub mod chunk;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod llm;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
