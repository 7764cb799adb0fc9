//! Repository documentation fetching
//!
//! This module provides:
//! - Branch snapshot downloads via the hosting provider's codeload convention
//! - In-memory zip extraction of Markdown/MDX entries
//! - Front matter parsing into per-file metadata

mod frontmatter;

pub use frontmatter::*;

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, info};
use zip::ZipArchive;

/// A documentation file extracted from a repository archive
///
/// Immutable once constructed. `filename` is always the entry's
/// archive-relative path; a front matter field of the same name is discarded
/// so the real path wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Archive-relative path of the file
    pub filename: String,

    /// Front matter fields, empty when the file has no header block
    pub metadata: BTreeMap<String, String>,

    /// Document body with the front matter stripped
    pub body: String,
}

impl DocumentRecord {
    /// Document title from front matter, if present
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }
}

/// Downloads repository snapshots and extracts documentation files
pub struct RepoFetcher {
    client: Client,
    config: FetchConfig,
}

impl RepoFetcher {
    /// Create a new fetcher
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Snapshot download URL for a repository branch
    pub fn archive_url(&self, owner: &str, name: &str, branch: &str) -> String {
        format!(
            "{}/{}/{}/zip/refs/heads/{}",
            self.config.archive_base_url.trim_end_matches('/'),
            owner,
            name,
            branch
        )
    }

    /// Download a branch snapshot and return one record per documentation file.
    ///
    /// Fatal on transport failure or a malformed archive; no partial results.
    /// Records come back in archive iteration order.
    pub async fn fetch_documents(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<Vec<DocumentRecord>> {
        let url = self.archive_url(owner, name, branch);
        debug!("Downloading archive: {}", url);

        let response = self.client.get(&url).send().await.map_err(Error::Fetch)?;
        let response = response.error_for_status().map_err(Error::Fetch)?;
        let bytes = response.bytes().await.map_err(Error::Fetch)?;

        info!(
            "Downloaded {} bytes for {}/{}@{}",
            bytes.len(),
            owner,
            name,
            branch
        );

        self.extract_documents(&bytes)
    }

    /// Extract documentation records from zip archive bytes
    pub fn extract_documents(&self, bytes: &[u8]) -> Result<Vec<DocumentRecord>> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut records = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if !entry.is_file() {
                continue;
            }

            let filename = entry.name().to_string();
            if !self.is_doc_file(&filename) {
                continue;
            }

            let mut raw = Vec::new();
            entry.read_to_end(&mut raw)?;

            // Best-effort decode: invalid sequences degrade, never fail
            let text = String::from_utf8_lossy(&raw);
            let (mut metadata, body) = parse_front_matter(&text);
            metadata.remove("filename");

            records.push(DocumentRecord {
                filename,
                metadata,
                body,
            });
        }

        debug!("Extracted {} documentation files", records.len());
        Ok(records)
    }

    fn is_doc_file(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.config
            .doc_suffixes
            .iter()
            .any(|suffix| lower.ends_with(&suffix.to_lowercase()))
    }
}
