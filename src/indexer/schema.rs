//! Artifact format shared by the builder and the query engine
//!
//! ```text
//! { version, generated, totalDocs, docs: [ { id, title, description,
//!   slug, content, headings, category }, ... ] }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Format version written into every artifact
pub const ARTIFACT_VERSION: u32 = 2;

/// One indexed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub headings: String,
    pub category: String,
}

/// The static search artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub version: u32,
    /// RFC 3339 UTC timestamp of the build
    pub generated: String,
    pub total_docs: usize,
    pub docs: Vec<Document>,
}

impl Artifact {
    pub fn new(docs: Vec<Document>, generated: DateTime<Utc>) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            generated: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_docs: docs.len(),
            docs,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_shape() {
        let doc = Document {
            id: 0,
            title: "Intro".to_string(),
            description: String::new(),
            slug: "/".to_string(),
            content: "hello".to_string(),
            headings: String::new(),
            category: "general".to_string(),
        };
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let artifact = Artifact::new(vec![doc], when);

        let value: serde_json::Value = serde_json::from_slice(&artifact.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["generated"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["totalDocs"], 1);
        assert_eq!(value["docs"][0]["slug"], "/");
        assert_eq!(value["docs"][0]["category"], "general");
    }

    #[test]
    fn test_parse_with_missing_optional_fields() {
        let json = r#"{
            "version": 2,
            "generated": "2024-05-01T12:00:00.000Z",
            "totalDocs": 1,
            "docs": [{ "id": 3, "title": "Nodes", "slug": "/core/nodes", "category": "core" }]
        }"#;
        let artifact = Artifact::from_slice(json.as_bytes()).unwrap();
        assert_eq!(artifact.docs[0].id, 3);
        assert_eq!(artifact.docs[0].description, "");
        assert_eq!(artifact.docs[0].content, "");
    }
}
