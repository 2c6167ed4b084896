//! Wire types for the artifact search endpoint
//!
//! The backend answers with `{ "data": [ { "<path>": <value>, ... }, ... ] }`.
//! Records are validated here so the rest of the crate only ever sees
//! path -> string maps.

use super::model::RawRecord;
use crate::error::BrowserError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the artifact search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GabRequest {
    /// Paths to extract, in column order
    pub fields: Vec<String>,
    /// Resource the artifact belongs to
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "artifactUniqueId")]
    pub artifact_unique_id: String,
}

impl GabRequest {
    pub fn new(artifact_id: &str, resource_id: &str, paths: Vec<String>) -> Self {
        Self {
            fields: paths,
            parent_id: resource_id.to_string(),
            artifact_unique_id: artifact_id.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Vec<Map<String, Value>>,
}

/// Decoded and validated backend response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerResponse {
    pub data: Vec<RawRecord>,
}

impl ServerResponse {
    pub fn new(data: Vec<RawRecord>) -> Self {
        Self { data }
    }

    /// Decode a response body.
    ///
    /// Strings are kept verbatim, numbers and booleans become text, nulls
    /// are treated as absent keys. Nested arrays or objects are rejected.
    pub fn from_json(body: &str) -> Result<Self, BrowserError> {
        let envelope: Envelope = serde_json::from_str(body)?;

        let mut data = Vec::with_capacity(envelope.data.len());
        for (index, item) in envelope.data.into_iter().enumerate() {
            let mut record = RawRecord::new();
            for (key, value) in item {
                match scalar_to_string(&value) {
                    Scalar::Text(text) => {
                        record.insert(key, text);
                    }
                    Scalar::Absent => {}
                    Scalar::Nested => return Err(BrowserError::InvalidRecord { index, key }),
                }
            }
            data.push(record);
        }

        Ok(Self { data })
    }
}

enum Scalar {
    Text(String),
    Absent,
    Nested,
}

fn scalar_to_string(value: &Value) -> Scalar {
    match value {
        Value::String(s) => Scalar::Text(s.clone()),
        Value::Number(n) => Scalar::Text(n.to_string()),
        Value::Bool(b) => Scalar::Text(b.to_string()),
        Value::Null => Scalar::Absent,
        Value::Array(_) | Value::Object(_) => Scalar::Nested,
    }
}
