use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Action, FieldScope, Module};

/// A named bundle of permissions. Users reference exactly one role.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
}

/// A single grant within a role.
///
/// An unset `field_scope` is read as [`FieldScope::All`]. An empty
/// `content_type_ids` list means the grant covers every content type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Permission {
    pub module: Module,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_scope: Option<FieldScope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_type_ids: Vec<String>,
}

impl Permission {
    #[must_use]
    pub const fn new(module: Module, action: Action) -> Self {
        Self {
            module,
            action,
            field_scope: None,
            allowed_fields: Vec::new(),
            denied_fields: Vec::new(),
            content_type_ids: Vec::new(),
        }
    }

    #[must_use]
    pub const fn scope(mut self, scope: FieldScope) -> Self {
        self.field_scope = Some(scope);
        self
    }

    #[must_use]
    pub fn allow(mut self, fields: &[&str]) -> Self {
        self.field_scope = Some(FieldScope::Custom);
        self.allowed_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn deny(mut self, fields: &[&str]) -> Self {
        self.field_scope = Some(FieldScope::Custom);
        self.denied_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn for_types(mut self, content_type_ids: &[&str]) -> Self {
        self.content_type_ids = content_type_ids.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn effective_scope(&self) -> FieldScope {
        self.field_scope.unwrap_or_default()
    }

    #[must_use]
    pub fn covers_type(&self, content_type_id: &str) -> bool {
        self.content_type_ids.is_empty() || self.content_type_ids.iter().any(|id| id == content_type_id)
    }
}
