use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::FieldMap;
use crate::enums::WorkflowStatus;

/// A piece of content. `data` is an open map whose keys are a subset of the
/// owning type's field names; it is stored as JSON text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ContentEntry {
    pub id: String,
    pub content_type_id: String,
    pub data: FieldMap,
    pub status: WorkflowStatus,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
