//! Qdrant vector engine integration
//!
//! This module wraps the Qdrant client and provides:
//! - Collection management
//! - Section embedding and point upsert
//! - Vector search over indexed sections

mod payload;

pub use payload::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::DocumentRecord;
use crate::llm::ModelClient;
use chrono::Utc;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    ScalarQuantizationBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Information about a Qdrant collection
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
    pub indexed_vectors_count: u64,
    pub status: String,
}

/// A section returned from vector search
#[derive(Debug, Clone)]
pub struct ScoredSection {
    pub id: String,
    pub score: f32,
    pub payload: SectionPayload,
}

/// Vector engine: embeds sections and queries, stores and searches points
pub struct QdrantEngine {
    client: Qdrant,
    collection: String,
    dimension: usize,
    model: Arc<ModelClient>,
    embedding_model: String,
    embedding_batch_size: usize,
}

impl QdrantEngine {
    /// Connect to Qdrant using config, sharing the given model client
    pub async fn connect(config: &Config, model: Arc<ModelClient>) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", config.qdrant_url);

        let mut builder = Qdrant::from_url(&config.qdrant_url).skip_compatibility_check();
        if let Some(key) = config.qdrant_api_key() {
            builder = builder.api_key(key);
        }
        let client = builder.build().map_err(|e| Error::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection_name.clone(),
            dimension: config.model.embedding_dimension,
            model,
            embedding_model: config.model.embedding_model.clone(),
            embedding_batch_size: config.model.embedding_batch_size.max(1),
        })
    }

    /// The expected vector dimension for this engine
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Ensure the collection exists with correct configuration
    pub async fn ensure_collection(&self) -> Result<()> {
        let exists = self.client.collection_exists(&self.collection).await?;

        if exists {
            debug!("Collection {} already exists", self.collection);
            return Ok(());
        }

        info!(
            "Creating collection {} with dimension {}",
            self.collection, self.dimension
        );

        let vectors_config = VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .quantization_config(ScalarQuantizationBuilder::default()),
            )
            .await?;

        info!("Collection {} created successfully", self.collection);
        Ok(())
    }

    /// Check if the collection exists
    pub async fn collection_exists(&self) -> Result<bool> {
        let exists = self.client.collection_exists(&self.collection).await?;
        Ok(exists)
    }

    /// Reset the collection (delete and recreate)
    pub async fn reset_collection(&self) -> Result<()> {
        if self.client.collection_exists(&self.collection).await? {
            info!("Deleting existing collection {}", self.collection);
            self.client.delete_collection(&self.collection).await?;
        }

        self.ensure_collection().await?;
        Ok(())
    }

    /// Get collection info (point count, etc)
    pub async fn collection_info(&self) -> Result<Option<CollectionInfo>> {
        if !self.client.collection_exists(&self.collection).await? {
            return Ok(None);
        }

        let info = self.client.collection_info(&self.collection).await?;
        if let Some(result) = info.result {
            Ok(Some(CollectionInfo {
                points_count: result.points_count.unwrap_or(0),
                indexed_vectors_count: result.indexed_vectors_count.unwrap_or(0),
                status: format!("{:?}", result.status()),
            }))
        } else {
            Ok(None)
        }
    }

    /// Embed a document's sections and upsert one point per section.
    ///
    /// Point ids are deterministic per repo/branch/filename/index, so
    /// re-ingesting overwrites previous sections in place.
    pub async fn index_document(
        &self,
        repo: &str,
        branch: &str,
        record: &DocumentRecord,
        sections: &[String],
    ) -> Result<usize> {
        if sections.is_empty() {
            return Ok(0);
        }

        let indexed_at = Utc::now().to_rfc3339();
        let mut points = Vec::with_capacity(sections.len());

        for (batch_start, batch) in sections
            .chunks(self.embedding_batch_size)
            .enumerate()
            .map(|(i, batch)| (i * self.embedding_batch_size, batch))
        {
            let vectors = self.model.embed(&self.embedding_model, batch).await?;

            for (offset, (section, vector)) in batch.iter().zip(vectors).enumerate() {
                let payload = SectionPayload {
                    repo: repo.to_string(),
                    branch: branch.to_string(),
                    filename: record.filename.clone(),
                    section_index: (batch_start + offset) as i32,
                    text: section.clone(),
                    title: record.title().map(String::from),
                    indexed_at: indexed_at.clone(),
                };

                points.push(SectionPoint {
                    id: payload.point_id(),
                    vector,
                    payload,
                });
            }
        }

        let count = points.len();
        self.upsert_points(points).await?;
        Ok(count)
    }

    /// Upsert SectionPoint objects (converts to PointStruct internally)
    pub async fn upsert_points(&self, points: Vec<SectionPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        if let Some(mismatch) = points.iter().find(|p| p.vector.len() != self.dimension) {
            return Err(Error::Qdrant(format!(
                "Vector dimension mismatch for collection '{}': model '{}' expects {} (got {})",
                self.collection,
                self.embedding_model,
                self.dimension,
                mismatch.vector.len()
            )));
        }

        debug!(
            "Upserting {} points to collection {}",
            points.len(),
            self.collection
        );

        let point_structs: Vec<PointStruct> =
            points.into_iter().map(|p| p.to_point_struct()).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, point_structs))
            .await?;

        Ok(())
    }

    /// Delete all points belonging to a repository
    pub async fn delete_repo(&self, repo: &str) -> Result<()> {
        debug!(
            "Deleting points for repo {} from collection {}",
            repo, self.collection
        );

        let filter = Filter {
            must: vec![Condition::matches("repo", repo.to_string())],
            should: vec![],
            must_not: vec![],
            min_should: None,
        };

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(filter))
            .await?;

        Ok(())
    }

    /// Embed a query and return the most similar sections, best first
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredSection>> {
        debug!(
            "Searching collection {} with top_k {}",
            self.collection, top_k
        );

        let embeddings = self
            .model
            .embed(&self.embedding_model, &[query.to_string()])
            .await?;
        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embedding returned for query".to_string()))?;

        let search_builder =
            SearchPointsBuilder::new(&self.collection, query_vector, top_k as u64)
                .with_payload(true);

        let response = self.client.search_points(search_builder).await?;

        let results: Vec<ScoredSection> = response
            .result
            .into_iter()
            .map(|p| {
                let payload: SectionPayload = p
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, json_from_qdrant_value(v)))
                    .collect::<serde_json::Map<String, Value>>()
                    .into();

                ScoredSection {
                    id: point_id_to_string(p.id),
                    score: p.score,
                    payload,
                }
            })
            .collect();

        Ok(results)
    }
}

/// Convert PointId to string
fn point_id_to_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
    use qdrant_client::qdrant::point_id::PointIdOptions;

    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

/// Convert Qdrant value to serde_json Value
fn json_from_qdrant_value(v: qdrant_client::qdrant::Value) -> Value {
    use qdrant_client::qdrant::value::Kind;

    match v.kind {
        Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => Value::Array(
            list.values
                .into_iter()
                .map(json_from_qdrant_value)
                .collect(),
        ),
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, json_from_qdrant_value(v)))
                .collect(),
        ),
        None => Value::Null,
    }
}
