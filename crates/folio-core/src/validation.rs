//! Dynamic field validation.
//!
//! Payloads are open maps whose shape is only known at runtime from a
//! [`ContentSchema`]. [`validate`] checks a complete payload on create and
//! fills defaults; [`validate_partial`] checks the keys of an update.
//! Uniqueness is delegated to a [`UniquenessCheck`] so the validator stays
//! free of persistence.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::FieldMap;
use crate::entities::FieldDefinition;
use crate::enums::FieldType;
use crate::errors::ErrorKind;
use crate::schema::ContentSchema;

const SLUG_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$";
const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const DATE_FORMAT: &str = "%Y-%m-%d";

static SLUG_RE: OnceLock<Option<Regex>> = OnceLock::new();
static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static DATE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Field patterns compiled so far, keyed by their source text.
static FIELD_PATTERNS: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

fn matches_builtin(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Compile a field's `pattern`, reusing an earlier compilation of the same
/// source. Definitions are checked with this too, so a saved pattern is
/// compiled once per process.
pub(crate) fn field_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let cache = FIELD_PATTERNS.get_or_init(|| Mutex::new(HashMap::new()));
    if let Ok(compiled) = cache.lock() {
        if let Some(re) = compiled.get(pattern) {
            return Ok(re.clone());
        }
    }
    let re = Regex::new(pattern)?;
    if let Ok(mut compiled) = cache.lock() {
        compiled.insert(pattern.to_string(), re.clone());
    }
    Ok(re)
}

/// A single field-level validation failure.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field '{field}' is required")]
    MissingRequired { field: String },

    #[error("field '{field}' must be {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' {reason}")]
    ConstraintViolation { field: String, reason: String },

    #[error("field '{field}' must be unique, value '{value}' already exists")]
    DuplicateValue { field: String, value: String },

    #[error("field '{field}' does not exist in content type")]
    UnknownField { field: String },

    /// The uniqueness lookup itself failed. Distinct from a duplicate.
    #[error("failed to check uniqueness for field '{field}': {source}")]
    UniquenessLookup {
        field: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FieldError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequired { .. } => ErrorKind::MissingRequired,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Self::DuplicateValue { .. } => ErrorKind::DuplicateValue,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::UniquenessLookup { .. } => ErrorKind::Infrastructure,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::TypeMismatch { field, .. }
            | Self::ConstraintViolation { field, .. }
            | Self::DuplicateValue { field, .. }
            | Self::UnknownField { field }
            | Self::UniquenessLookup { field, .. } => field,
        }
    }

    fn violation(field: &FieldDefinition, reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.name.clone(),
            reason: reason.into(),
        }
    }

    fn mismatch(field: &FieldDefinition, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.name.clone(),
            expected,
        }
    }
}

/// Counts live entries of a content type whose stored `field` equals `value`.
///
/// `exclude` names an entry to leave out of the count, so that an entry
/// keeping its own value is not a duplicate of itself.
pub trait UniquenessCheck {
    fn count_matching(
        &self,
        content_type_id: &str,
        field: &str,
        value: &Value,
        exclude: Option<&str>,
    ) -> impl Future<Output = anyhow::Result<u64>>;
}

/// Lowercase letters and digits in hyphen-separated groups.
#[must_use]
pub fn is_valid_slug(s: &str) -> bool {
    matches_builtin(&SLUG_RE, SLUG_PATTERN, s)
}

/// `null`, an absent key and `""` are all treated as "no value".
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validate a complete payload against `schema`, injecting defaults for
/// omitted optional fields.
///
/// Keys that are not fields of the type are rejected. Defaults are only
/// written where the payload has no value, so validating the result again
/// leaves it unchanged.
pub async fn validate<U: UniquenessCheck>(
    schema: &ContentSchema,
    data: &mut FieldMap,
    uniqueness: &U,
) -> Result<(), FieldError> {
    if let Some(unknown) = data.keys().find(|k| schema.field(k).is_none()) {
        return Err(FieldError::UnknownField {
            field: unknown.clone(),
        });
    }

    for field in &schema.fields {
        if is_empty_value(data.get(&field.name)) {
            if field.required {
                return Err(FieldError::MissingRequired {
                    field: field.name.clone(),
                });
            }
            if let Some(default) = field.typed_default() {
                data.insert(field.name.clone(), default);
            }
            continue;
        }
        let Some(value) = data.get(&field.name) else {
            continue;
        };
        check_value(field, value)?;
        if field.unique {
            check_unique(schema.id(), field, value, None, uniqueness).await?;
        }
    }
    Ok(())
}

/// Validate the keys present in an update. Omitted fields are never an error;
/// a required field sent as empty is.
pub async fn validate_partial<U: UniquenessCheck>(
    schema: &ContentSchema,
    partial: &FieldMap,
    exclude_entry_id: Option<&str>,
    uniqueness: &U,
) -> Result<(), FieldError> {
    for (name, value) in partial {
        let field = schema
            .field(name)
            .ok_or_else(|| FieldError::UnknownField { field: name.clone() })?;
        if is_empty_value(Some(value)) {
            if field.required {
                return Err(FieldError::MissingRequired {
                    field: field.name.clone(),
                });
            }
            continue;
        }
        check_value(field, value)?;
        if field.unique {
            check_unique(schema.id(), field, value, exclude_entry_id, uniqueness).await?;
        }
    }
    Ok(())
}

/// The stored default of `field`, if any, must itself pass the field's
/// type and constraint checks.
pub fn check_default(field: &FieldDefinition) -> Result<(), FieldError> {
    match field.typed_default() {
        Some(value) => check_value(field, &value),
        None => Ok(()),
    }
}

/// Type and constraint check for one non-empty value. Constraints that do
/// not belong to the field's type are ignored.
pub fn check_value(field: &FieldDefinition, value: &Value) -> Result<(), FieldError> {
    match field.field_type {
        FieldType::String | FieldType::Text => check_text(field, value),
        FieldType::Email => {
            let s = value
                .as_str()
                .ok_or_else(|| FieldError::mismatch(field, "a string"))?;
            if matches_builtin(&EMAIL_RE, EMAIL_PATTERN, s) {
                Ok(())
            } else {
                Err(FieldError::violation(field, "must be a valid email address"))
            }
        }
        FieldType::Url | FieldType::Media => {
            let s = value
                .as_str()
                .ok_or_else(|| FieldError::mismatch(field, "a string"))?;
            if is_request_uri(s) {
                Ok(())
            } else {
                Err(FieldError::violation(field, "must be a valid URL"))
            }
        }
        FieldType::Number => {
            let n = value
                .as_f64()
                .ok_or_else(|| FieldError::mismatch(field, "a number"))?;
            if let Some(min) = field.min_value {
                if n < min {
                    return Err(FieldError::violation(field, format!("must be at least {min:.2}")));
                }
            }
            if let Some(max) = field.max_value {
                if n > max {
                    return Err(FieldError::violation(field, format!("must not exceed {max:.2}")));
                }
            }
            Ok(())
        }
        FieldType::Boolean => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(FieldError::mismatch(field, "a boolean"))
            }
        }
        FieldType::Date => {
            let s = value
                .as_str()
                .ok_or_else(|| FieldError::mismatch(field, "a date string"))?;
            if matches_builtin(&DATE_RE, DATE_PATTERN, s)
                && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
            {
                Ok(())
            } else {
                Err(FieldError::violation(field, "must be in format YYYY-MM-DD"))
            }
        }
    }
}

fn check_text(field: &FieldDefinition, value: &Value) -> Result<(), FieldError> {
    let s = value
        .as_str()
        .ok_or_else(|| FieldError::mismatch(field, "a string"))?;
    let len = s.chars().count();

    if let Some(min) = field.min_length {
        if len < min as usize {
            return Err(FieldError::violation(
                field,
                format!("must be at least {min} characters"),
            ));
        }
    }
    if let Some(max) = field.max_length {
        if len > max as usize {
            return Err(FieldError::violation(
                field,
                format!("must not exceed {max} characters"),
            ));
        }
    }
    if let Some(pattern) = field.pattern.as_deref().filter(|p| !p.is_empty()) {
        let re = field_pattern(pattern).map_err(|_| FieldError::violation(field, "has an invalid pattern"))?;
        if !re.is_match(s) {
            return Err(FieldError::violation(field, "does not match required pattern"));
        }
    }
    if field.name == "slug" && !is_valid_slug(s) {
        return Err(FieldError::violation(
            field,
            "must be a valid slug (lowercase, numbers, hyphens only)",
        ));
    }
    Ok(())
}

/// An absolute URI, or an absolute path such as `/uploads/a.png`.
fn is_request_uri(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    if s.starts_with('/') {
        return !s.starts_with("//") && Url::parse("http://localhost").and_then(|base| base.join(s)).is_ok();
    }
    Url::parse(s).is_ok()
}

async fn check_unique<U: UniquenessCheck>(
    content_type_id: &str,
    field: &FieldDefinition,
    value: &Value,
    exclude: Option<&str>,
    uniqueness: &U,
) -> Result<(), FieldError> {
    let count = uniqueness
        .count_matching(content_type_id, &field.name, value, exclude)
        .await
        .map_err(|e| FieldError::UniquenessLookup {
            field: field.name.clone(),
            source: e.into(),
        })?;
    if count > 0 {
        let shown = value
            .as_str()
            .map_or_else(|| value.to_string(), ToString::to_string);
        return Err(FieldError::DuplicateValue {
            field: field.name.clone(),
            value: shown,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::entities::{ContentType, NewField};

    /// In-memory stand-in for the entry store: `(field, value) -> entry ids`.
    #[derive(Default)]
    struct MemoryIndex {
        values: HashMap<(String, String), Vec<String>>,
        fail: bool,
    }

    impl MemoryIndex {
        fn with(field: &str, value: Value, entry_id: &str) -> Self {
            let mut idx = Self::default();
            idx.values
                .entry((field.to_string(), value.to_string()))
                .or_default()
                .push(entry_id.to_string());
            idx
        }
    }

    impl UniquenessCheck for MemoryIndex {
        async fn count_matching(
            &self,
            _content_type_id: &str,
            field: &str,
            value: &Value,
            exclude: Option<&str>,
        ) -> anyhow::Result<u64> {
            if self.fail {
                anyhow::bail!("store offline");
            }
            let ids = self
                .values
                .get(&(field.to_string(), value.to_string()))
                .map(Vec::as_slice)
                .unwrap_or_default();
            Ok(ids.iter().filter(|id| Some(id.as_str()) != exclude).count() as u64)
        }
    }

    fn def(nf: NewField) -> FieldDefinition {
        let ft = nf.check_definition().unwrap();
        nf.build(ft, "fld-00000000", "cty-00000001", 0, Utc::now())
    }

    fn schema(fields: Vec<NewField>) -> ContentSchema {
        let now = Utc::now();
        ContentSchema::new(
            ContentType {
                id: "cty-00000001".into(),
                name: "Article".into(),
                slug: "article".into(),
                enable_seo: true,
                created_at: now,
                updated_at: now,
            },
            fields.into_iter().map(def).collect(),
        )
    }

    fn map(v: Value) -> FieldMap {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn article() -> ContentSchema {
        schema(vec![
            NewField::new("title", FieldType::String)
                .required()
                .length(Some(3), Some(10)),
            NewField::new("views", FieldType::Number)
                .range(Some(0.0), Some(100.0))
                .default_value("0"),
            NewField::new("featured", FieldType::Boolean).default_value("false"),
            NewField::new("meta_title", FieldType::String).seo(),
        ])
    }

    #[rstest]
    #[case(FieldType::String, json!(5), ErrorKind::TypeMismatch)]
    #[case(FieldType::Email, json!("not-an-email"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Email, json!("a@b.c"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Url, json!("example.com/x"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Media, json!(42), ErrorKind::TypeMismatch)]
    #[case(FieldType::Number, json!("12"), ErrorKind::TypeMismatch)]
    #[case(FieldType::Boolean, json!("true"), ErrorKind::TypeMismatch)]
    #[case(FieldType::Date, json!("2024-02-30"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!("2024-1-5"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!("2024-01- 5"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!("+2024-1-05"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!(" 2024-1-05"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!("2024-01-5x"), ErrorKind::ConstraintViolation)]
    #[case(FieldType::Date, json!("2024-01-05T00:00:00Z"), ErrorKind::ConstraintViolation)]
    fn rejects_bad_values(#[case] ft: FieldType, #[case] value: Value, #[case] kind: ErrorKind) {
        let field = def(NewField::new("f", ft));
        assert_eq!(check_value(&field, &value).unwrap_err().kind(), kind);
    }

    #[rstest]
    #[case(FieldType::Text, json!("hello"))]
    #[case(FieldType::Email, json!("first.last+tag@mail.example.org"))]
    #[case(FieldType::Url, json!("https://example.com/a?b=c"))]
    #[case(FieldType::Url, json!("/relative/path"))]
    #[case(FieldType::Media, json!("/uploads/cover.png"))]
    #[case(FieldType::Number, json!(3))]
    #[case(FieldType::Number, json!(-2.75))]
    #[case(FieldType::Boolean, json!(false))]
    #[case(FieldType::Date, json!("2024-02-29"))]
    fn accepts_good_values(#[case] ft: FieldType, #[case] value: Value) {
        let field = def(NewField::new("f", ft));
        assert!(check_value(&field, &value).is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let field = def(NewField::new("name", FieldType::String).length(None, Some(3)));
        assert!(check_value(&field, &json!("żółw")).is_err());
        assert!(check_value(&field, &json!("żół")).is_ok());
    }

    #[test]
    fn number_bounds_are_inclusive() {
        let field = def(NewField::new("n", FieldType::Number).range(Some(1.0), Some(5.0)));
        assert!(check_value(&field, &json!(1)).is_ok());
        assert!(check_value(&field, &json!(5.0)).is_ok());
        assert!(check_value(&field, &json!(5.01)).is_err());
        assert!(check_value(&field, &json!(0.99)).is_err());
    }

    #[test]
    fn length_constraints_ignored_on_non_text_types() {
        let field = def(NewField::new("n", FieldType::Number).length(Some(50), Some(60)));
        assert!(check_value(&field, &json!(1)).is_ok());
    }

    #[test]
    fn field_patterns_compile_once() {
        let first = field_pattern("^fp-[0-9]+$").unwrap();
        let second = field_pattern("^fp-[0-9]+$").unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert!(field_pattern("[a-").is_err());

        let cached = FIELD_PATTERNS.get().unwrap().lock().unwrap();
        assert!(cached.contains_key("^fp-[0-9]+$"));
        assert!(!cached.contains_key("[a-"));
    }

    #[test]
    fn pattern_match_is_unanchored() {
        let field = def(NewField::new("code", FieldType::String).pattern("[0-9]{3}"));
        assert!(check_value(&field, &json!("ab123cd")).is_ok());
        assert!(check_value(&field, &json!("ab12")).is_err());
    }

    #[test]
    fn slug_with_custom_pattern_fails_either_check() {
        let field = def(NewField::new("slug", FieldType::String).pattern("^[a-z]+$"));
        let err = check_value(&field, &json!("abc-1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(err.field(), "slug");
    }

    #[test]
    fn builtin_slug_format_applies_without_pattern() {
        let field = def(NewField::new("slug", FieldType::String));
        assert!(check_value(&field, &json!("hello-world-2")).is_ok());
        assert!(check_value(&field, &json!("Hello World")).is_err());
        assert!(check_value(&field, &json!("double--dash")).is_err());
    }

    #[test]
    fn default_must_satisfy_field_constraints() {
        let field = def(
            NewField::new("views", FieldType::Number)
                .range(Some(10.0), None)
                .default_value("5"),
        );
        assert!(check_default(&field).is_err());
    }

    #[tokio::test]
    async fn validate_fills_defaults() {
        let mut data = map(json!({"title": "Hello"}));
        validate(&article(), &mut data, &MemoryIndex::default())
            .await
            .unwrap();
        assert_eq!(
            Value::Object(data),
            json!({"title": "Hello", "views": 0, "featured": false})
        );
    }

    #[tokio::test]
    async fn validate_is_idempotent() {
        let mut once = map(json!({"title": "Hello", "views": ""}));
        let idx = MemoryIndex::default();
        validate(&article(), &mut once, &idx).await.unwrap();
        let mut twice = once.clone();
        validate(&article(), &mut twice, &idx).await.unwrap();
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case(json!({}), ErrorKind::MissingRequired)]
    #[case(json!({"title": null}), ErrorKind::MissingRequired)]
    #[case(json!({"title": ""}), ErrorKind::MissingRequired)]
    #[case(json!({"title": "Hi"}), ErrorKind::ConstraintViolation)]
    #[case(json!({"title": "Hello", "body": "x"}), ErrorKind::UnknownField)]
    #[case(json!({"title": "Hello", "views": 101}), ErrorKind::ConstraintViolation)]
    #[tokio::test]
    async fn validate_rejects(#[case] payload: Value, #[case] kind: ErrorKind) {
        let mut data = map(payload);
        let err = validate(&article(), &mut data, &MemoryIndex::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[tokio::test]
    async fn partial_allows_omitting_required_fields() {
        let partial = map(json!({"meta_title": "SEO"}));
        validate_partial(&article(), &partial, Some("ent-1"), &MemoryIndex::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn partial_rejects_emptied_required_field_and_unknown_keys() {
        let idx = MemoryIndex::default();
        let err = validate_partial(&article(), &map(json!({"title": ""})), None, &idx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);

        let err = validate_partial(&article(), &map(json!({"nope": 1})), None, &idx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
    }

    #[tokio::test]
    async fn partial_clearing_optional_field_is_fine() {
        let partial = map(json!({"views": null}));
        validate_partial(&article(), &partial, None, &MemoryIndex::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_unique_value_is_rejected_except_for_self() {
        let s = schema(vec![NewField::new("email", FieldType::Email).unique()]);
        let idx = MemoryIndex::with("email", json!("a@b.com"), "ent-1");

        let mut fresh = map(json!({"email": "a@b.com"}));
        let err = validate(&s, &mut fresh, &idx).await.unwrap_err();
        assert!(matches!(
            err,
            FieldError::DuplicateValue { ref field, ref value } if field == "email" && value == "a@b.com"
        ));

        let own = map(json!({"email": "a@b.com"}));
        validate_partial(&s, &own, Some("ent-1"), &idx).await.unwrap();

        let err = validate_partial(&s, &own, Some("ent-2"), &idx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateValue);
    }

    #[tokio::test]
    async fn failed_lookup_is_not_a_duplicate() {
        let s = schema(vec![NewField::new("code", FieldType::String).unique()]);
        let idx = MemoryIndex {
            fail: true,
            ..MemoryIndex::default()
        };
        let mut data = map(json!({"code": "x"}));
        let err = validate(&s, &mut data, &idx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }
}
