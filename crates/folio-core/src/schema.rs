//! Read-only view of a content type together with its field definitions.
//!
//! The registry itself is persisted by `folio-db`; this is the shape the
//! validator and permission resolver consume.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ContentType, FieldDefinition};
use crate::responses::FieldRules;

/// A content type and its fields, ordered by position. Regular and SEO fields
/// share one collection and are told apart by `is_seo`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ContentSchema {
    pub content_type: ContentType,
    pub fields: Vec<FieldDefinition>,
}

impl ContentSchema {
    #[must_use]
    pub const fn new(content_type: ContentType, fields: Vec<FieldDefinition>) -> Self {
        Self {
            content_type,
            fields,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.content_type.id
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn regular_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| !f.is_seo)
    }

    pub fn seo_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_seo)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Whether `name` is an SEO-flagged field of this type. Unknown names
    /// are neither SEO nor non-SEO.
    #[must_use]
    pub fn is_seo_field(&self, name: &str) -> Option<bool> {
        self.field(name).map(|f| f.is_seo)
    }

    /// Per-field constraint summaries keyed by field name.
    #[must_use]
    pub fn validation_rules(&self) -> BTreeMap<String, FieldRules> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.validation_rules()))
            .collect()
    }
}
