use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::FieldType;
use crate::errors::CoreError;
use crate::responses::FieldRules;

/// A runtime-defined content schema. Its fields live in `content_fields` and
/// are assembled into a [`crate::schema::ContentSchema`] for validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContentType {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub enable_seo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One typed field of a content type. `is_seo` splits the single collection
/// into regular and SEO fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FieldDefinition {
    pub id: String,
    pub content_type_id: String,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    pub is_seo: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FieldDefinition {
    /// The configured default coerced to the field's type.
    ///
    /// Numbers that are integral become JSON integers so that a defaulted
    /// payload reads the same as one the client sent. Returns `None` when no
    /// default is set or the stored text cannot be coerced.
    #[must_use]
    pub fn typed_default(&self) -> Option<Value> {
        let raw = self.default_value.as_deref().filter(|s| !s.is_empty())?;
        coerce_default(self.field_type, raw)
    }

    /// Constraint summary exposed to clients building entry forms.
    #[must_use]
    pub fn validation_rules(&self) -> FieldRules {
        FieldRules {
            name: self.name.clone(),
            field_type: self.field_type,
            required: self.required,
            unique: self.unique,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: self.pattern.clone().filter(|p| !p.is_empty()),
            min_value: self.min_value,
            max_value: self.max_value,
            default: self.default_value.clone().filter(|d| !d.is_empty()),
            placeholder: self.placeholder.clone().filter(|p| !p.is_empty()),
            help_text: self.help_text.clone().filter(|h| !h.is_empty()),
        }
    }
}

/// Input for adding a field, or fully replacing an existing field's
/// definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewField {
    pub name: String,
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub is_seo: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
}

impl NewField {
    #[must_use]
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn seo(mut self) -> Self {
        self.is_seo = true;
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    #[must_use]
    pub const fn length(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    #[must_use]
    pub const fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Materialise this input as a stored definition. `field_type` is the
    /// type returned by [`Self::check_definition`].
    #[must_use]
    pub fn build(
        &self,
        field_type: FieldType,
        id: &str,
        content_type_id: &str,
        position: i64,
        now: DateTime<Utc>,
    ) -> FieldDefinition {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        FieldDefinition {
            id: id.to_string(),
            content_type_id: content_type_id.to_string(),
            name: self.name.trim().to_string(),
            field_type,
            required: self.required,
            unique: self.unique,
            is_seo: self.is_seo,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: non_empty(&self.pattern),
            min_value: self.min_value,
            max_value: self.max_value,
            default_value: non_empty(&self.default_value),
            placeholder: non_empty(&self.placeholder),
            help_text: non_empty(&self.help_text),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reject definitions that could never be satisfied or that break the
    /// storage layer: empty or quoted names, a pattern that does not compile,
    /// inverted bounds, and a default that does not coerce to the type.
    ///
    /// The default's own constraint check runs in the validator, see
    /// [`crate::validation::check_default`].
    pub fn check_definition(&self) -> Result<FieldType, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("field name is required".into()));
        }
        if name.contains(['"', '.', '$', '[', ']']) {
            return Err(CoreError::Validation(format!(
                "field name '{name}' contains a reserved character"
            )));
        }
        let field_type = self.field_type.ok_or_else(|| {
            CoreError::Validation(format!("field '{name}' needs a type"))
        })?;
        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            crate::validation::field_pattern(pattern).map_err(|e| {
                CoreError::Validation(format!("field '{name}' has an invalid pattern: {e}"))
            })?;
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "field '{name}': min_length {min} exceeds max_length {max}"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "field '{name}': min_value {min} exceeds max_value {max}"
                )));
            }
        }
        if let Some(raw) = self.default_value.as_deref().filter(|d| !d.is_empty()) {
            if coerce_default(field_type, raw).is_none() {
                return Err(CoreError::Validation(format!(
                    "field '{name}': default '{raw}' is not a valid {field_type}"
                )));
            }
        }
        Ok(field_type)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce_default(field_type: FieldType, raw: &str) -> Option<Value> {
    match field_type {
        FieldType::Number => {
            let n: f64 = raw.trim().parse().ok()?;
            if !n.is_finite() {
                return None;
            }
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                Some(Value::from(n as i64))
            } else {
                Some(Value::from(n))
            }
        }
        FieldType::Boolean => match raw.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => Some(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(field_type: FieldType, default: Option<&str>) -> FieldDefinition {
        FieldDefinition {
            id: "fld-00000001".into(),
            content_type_id: "cty-00000001".into(),
            name: "f".into(),
            field_type,
            required: false,
            unique: false,
            is_seo: false,
            min_length: None,
            max_length: None,
            pattern: None,
            min_value: None,
            max_value: None,
            default_value: default.map(String::from),
            placeholder: None,
            help_text: None,
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn number_default_keeps_integers_integral() {
        assert_eq!(field(FieldType::Number, Some("10")).typed_default(), Some(json!(10)));
        assert_eq!(
            field(FieldType::Number, Some("2.5")).typed_default(),
            Some(json!(2.5))
        );
        assert_eq!(field(FieldType::Number, Some("ten")).typed_default(), None);
    }

    #[test]
    fn boolean_default_parses_literals_only() {
        assert_eq!(
            field(FieldType::Boolean, Some("true")).typed_default(),
            Some(json!(true))
        );
        assert_eq!(field(FieldType::Boolean, Some("yes")).typed_default(), None);
    }

    #[test]
    fn empty_default_is_none() {
        assert_eq!(field(FieldType::String, Some("")).typed_default(), None);
        assert_eq!(field(FieldType::String, None).typed_default(), None);
    }

    #[test]
    fn rules_omit_unset_constraints() {
        let mut f = field(FieldType::String, None);
        f.max_length = Some(60);
        f.placeholder = Some(String::new());
        let rules = serde_json::to_value(f.validation_rules()).unwrap();
        assert_eq!(
            rules,
            json!({"name": "f", "type": "string", "required": false, "unique": false, "max_length": 60})
        );
    }

    #[test]
    fn check_definition_rejects_bad_pattern() {
        let nf = NewField::new("code", FieldType::String).pattern("[a-");
        assert!(matches!(nf.check_definition(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn check_definition_rejects_inverted_bounds() {
        let nf = NewField::new("title", FieldType::String).length(Some(10), Some(2));
        assert!(nf.check_definition().is_err());
        let nf = NewField::new("price", FieldType::Number).range(Some(5.0), Some(1.0));
        assert!(nf.check_definition().is_err());
    }

    #[test]
    fn check_definition_rejects_uncoercible_default() {
        let nf = NewField::new("count", FieldType::Number).default_value("many");
        assert!(nf.check_definition().is_err());
    }

    #[test]
    fn check_definition_rejects_quoted_name_and_missing_type() {
        assert!(NewField::new("a\"b", FieldType::Text).check_definition().is_err());
        let nf = NewField {
            name: "title".into(),
            ..NewField::default()
        };
        assert!(nf.check_definition().is_err());
    }

    #[test]
    fn check_definition_accepts_valid_field() {
        let nf = NewField::new("views", FieldType::Number)
            .range(Some(0.0), Some(100.0))
            .default_value("0");
        assert_eq!(nf.check_definition().unwrap(), FieldType::Number);
    }
}
