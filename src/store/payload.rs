//! Payload schema for Qdrant points

use qdrant_client::qdrant::{PointStruct, Value as QdrantValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// A point ready to be upserted to Qdrant
#[derive(Debug, Clone)]
pub struct SectionPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: SectionPayload,
}

impl SectionPoint {
    /// Convert to qdrant-client PointStruct
    pub fn to_point_struct(self) -> PointStruct {
        let payload_map = self.payload.to_qdrant_payload();
        PointStruct::new(self.id.to_string(), self.vector, payload_map)
    }
}

/// Payload stored with each section in Qdrant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPayload {
    /// Repository slug ("owner/name")
    pub repo: String,

    /// Branch the snapshot was taken from
    pub branch: String,

    /// Archive-relative path of the source file
    pub filename: String,

    /// Section index within the document
    pub section_index: i32,

    /// Section text
    pub text: String,

    /// Document title from front matter (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// When this section was indexed
    pub indexed_at: String,
}

impl SectionPayload {
    /// Deterministic point id for a section.
    ///
    /// Re-ingesting the same repo/branch/file/index overwrites the previous
    /// point, so duplicate archive entries resolve last-wins.
    pub fn point_id(&self) -> Uuid {
        let key = format!(
            "{}@{}/{}#{}",
            self.repo, self.branch, self.filename, self.section_index
        );
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
    }

    /// Convert to Qdrant payload format
    pub fn to_qdrant_payload(self) -> HashMap<String, QdrantValue> {
        let mut map = HashMap::new();

        map.insert("repo".to_string(), string_to_qdrant(&self.repo));
        map.insert("branch".to_string(), string_to_qdrant(&self.branch));
        map.insert("filename".to_string(), string_to_qdrant(&self.filename));
        map.insert(
            "section_index".to_string(),
            int_to_qdrant(self.section_index as i64),
        );
        map.insert("text".to_string(), string_to_qdrant(&self.text));
        map.insert("indexed_at".to_string(), string_to_qdrant(&self.indexed_at));

        if let Some(ref title) = self.title {
            map.insert("title".to_string(), string_to_qdrant(title));
        }

        map
    }
}

fn string_to_qdrant(s: &str) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::StringValue(
            s.to_string(),
        )),
    }
}

fn int_to_qdrant(i: i64) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::IntegerValue(i)),
    }
}

impl From<Map<String, Value>> for SectionPayload {
    fn from(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| SectionPayload {
            repo: String::new(),
            branch: String::new(),
            filename: String::new(),
            section_index: 0,
            text: String::new(),
            title: None,
            indexed_at: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SectionPayload {
        SectionPayload {
            repo: "acme/widgets".to_string(),
            branch: "main".to_string(),
            filename: "docs/intro.md".to_string(),
            section_index: 2,
            text: "Welcome to widgets.".to_string(),
            title: Some("Intro".to_string()),
            indexed_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_payload_serialization() {
        let json = serde_json::to_string(&payload()).unwrap();
        assert!(json.contains("acme/widgets"));
        assert!(json.contains("section_index"));

        let parsed: SectionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.repo, "acme/widgets");
        assert_eq!(parsed.section_index, 2);
    }

    #[test]
    fn test_point_id_is_deterministic() {
        assert_eq!(payload().point_id(), payload().point_id());

        let mut other = payload();
        other.section_index = 3;
        assert_ne!(payload().point_id(), other.point_id());
    }

    #[test]
    fn test_qdrant_payload_fields() {
        let map = payload().to_qdrant_payload();
        assert!(map.contains_key("repo"));
        assert!(map.contains_key("filename"));
        assert!(map.contains_key("text"));
        assert!(map.contains_key("title"));
    }
}
