//! Response types returned by service operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::FieldMap;
use crate::entities::ContentEntry;
use crate::enums::FieldType;

/// Pagination metadata for list operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PageMeta {
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EntryPage {
    pub entries: Vec<ContentEntry>,
    pub meta: PageMeta,
}

/// Entry counts per workflow status for one content type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowStatistics {
    pub draft: u64,
    pub in_review: u64,
    pub ready_for_approval: u64,
    pub approved: u64,
    pub published: u64,
    pub rejected: u64,
    pub total: u64,
}

/// The SEO-relevant slice of an entry: SEO-flagged fields plus `slug`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SeoPreview {
    pub entry_id: String,
    pub content_type_id: String,
    pub seo: FieldMap,
}

/// Constraint summary for one field, as shown to form builders.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FieldRules {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}
