use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored media file. Only its metadata is tracked here; the bytes live in
/// whatever blob store produced `url`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MediaFile {
    pub id: String,
    pub file_name: String,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}
