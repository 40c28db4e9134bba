//! Schema registry storage: content types and their field definitions.

use chrono::{DateTime, Utc};
use folio_core::entities::{ContentType, FieldDefinition, NewField};
use folio_core::ids::{PREFIX_CONTENT_TYPE, PREFIX_FIELD};
use folio_core::schema::ContentSchema;
use folio_core::validation::{check_default, is_valid_slug};
use tracing::info;

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_enum};
use crate::service::FolioService;
use crate::updates::content_type::ContentTypeUpdate;

const SELECT_COLS: &str = "id, name, slug, enable_seo, created_at, updated_at";

const FIELD_COLS: &str = "id, content_type_id, name, field_type, required, is_unique, is_seo, \
     min_length, max_length, pattern, min_value, max_value, default_value, placeholder, \
     help_text, position, created_at, updated_at";

fn row_to_content_type(row: &libsql::Row) -> Result<ContentType, DatabaseError> {
    Ok(ContentType {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        enable_seo: get_bool(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn get_opt_u32(row: &libsql::Row, idx: i32) -> Result<Option<u32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|n| {
            u32::try_from(n)
                .map_err(|_| DatabaseError::InvalidState(format!("length bound out of range: {n}")))
        })
        .transpose()
}

fn row_to_field(row: &libsql::Row) -> Result<FieldDefinition, DatabaseError> {
    Ok(FieldDefinition {
        id: row.get(0)?,
        content_type_id: row.get(1)?,
        name: row.get(2)?,
        field_type: parse_enum(&row.get::<String>(3)?)?,
        required: get_bool(row, 4)?,
        unique: get_bool(row, 5)?,
        is_seo: get_bool(row, 6)?,
        min_length: get_opt_u32(row, 7)?,
        max_length: get_opt_u32(row, 8)?,
        pattern: get_opt_string(row, 9)?,
        min_value: row.get::<Option<f64>>(10)?,
        max_value: row.get::<Option<f64>>(11)?,
        default_value: get_opt_string(row, 12)?,
        placeholder: get_opt_string(row, 13)?,
        help_text: get_opt_string(row, 14)?,
        position: row.get(15)?,
        created_at: parse_datetime(&row.get::<String>(16)?)?,
        updated_at: parse_datetime(&row.get::<String>(17)?)?,
    })
}

/// Column values in `FIELD_COLS` order.
fn field_params(f: &FieldDefinition) -> Vec<libsql::Value> {
    let text = |v: &Option<String>| v.clone().map_or(libsql::Value::Null, libsql::Value::Text);
    let length = |v: Option<u32>| v.map_or(libsql::Value::Null, |n| libsql::Value::Integer(i64::from(n)));
    let real = |v: Option<f64>| v.map_or(libsql::Value::Null, libsql::Value::Real);
    vec![
        f.id.clone().into(),
        f.content_type_id.clone().into(),
        f.name.clone().into(),
        f.field_type.as_str().into(),
        i64::from(f.required).into(),
        i64::from(f.unique).into(),
        i64::from(f.is_seo).into(),
        length(f.min_length),
        length(f.max_length),
        text(&f.pattern),
        real(f.min_value),
        real(f.max_value),
        text(&f.default_value),
        text(&f.placeholder),
        text(&f.help_text),
        f.position.into(),
        f.created_at.to_rfc3339().into(),
        f.updated_at.to_rfc3339().into(),
    ]
}

impl FolioService {
    pub async fn create_content_type(
        &self,
        name: &str,
        slug: &str,
        enable_seo: bool,
    ) -> Result<ContentType, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("content type name is required"));
        }
        if !is_valid_slug(slug) {
            return Err(ServiceError::invalid(format!(
                "'{slug}' is not a valid slug (lowercase, numbers, hyphens only)"
            )));
        }
        self.ensure_type_name_free(name, slug, None).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONTENT_TYPE).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO content_types ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    name,
                    slug,
                    i64::from(enable_seo),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        info!(content_type = %id, slug, "content type created");

        Ok(ContentType {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            enable_seo,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_content_type(&self, id: &str) -> Result<ContentType, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM content_types WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("content type", id))?;
        Ok(row_to_content_type(&row)?)
    }

    pub async fn get_content_type_by_slug(&self, slug: &str) -> Result<ContentType, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM content_types WHERE slug = ?1"),
                [slug],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("content type", slug))?;
        Ok(row_to_content_type(&row)?)
    }

    pub async fn list_content_types(&self) -> Result<Vec<ContentType>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM content_types ORDER BY name"),
                (),
            )
            .await?;
        let mut types = Vec::new();
        while let Some(row) = rows.next().await? {
            types.push(row_to_content_type(&row)?);
        }
        Ok(types)
    }

    pub async fn update_content_type(
        &self,
        id: &str,
        update: ContentTypeUpdate,
    ) -> Result<ContentType, ServiceError> {
        let current = self.get_content_type(id).await?;
        if update.is_empty() {
            return Ok(current);
        }
        if let Some(ref slug) = update.slug {
            if !is_valid_slug(slug) {
                return Err(ServiceError::invalid(format!("'{slug}' is not a valid slug")));
            }
        }
        let name = update.name.as_deref().map(str::trim).unwrap_or(&current.name);
        if name.is_empty() {
            return Err(ServiceError::invalid("content type name is required"));
        }
        let slug = update.slug.as_deref().unwrap_or(&current.slug);
        self.ensure_type_name_free(name, slug, Some(id)).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if update.name.is_some() {
            params.push(name.to_string().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if update.slug.is_some() {
            params.push(slug.to_string().into());
            sets.push(format!("slug = ?{}", params.len()));
        }
        if let Some(enable_seo) = update.enable_seo {
            params.push(i64::from(enable_seo).into());
            sets.push(format!("enable_seo = ?{}", params.len()));
        }
        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(id.into());
        let sql = format!(
            "UPDATE content_types SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        self.get_content_type(id).await
    }

    /// Delete a content type and its fields. Refused while any live entry of
    /// the type exists.
    pub async fn delete_content_type(&self, id: &str) -> Result<(), ServiceError> {
        self.get_content_type(id).await?;
        let live = self.count_live_entries(id).await?;
        if live > 0 {
            return Err(ServiceError::conflict(format!(
                "content type {id} still has {live} entries"
            )));
        }
        self.db()
            .conn()
            .execute("DELETE FROM content_types WHERE id = ?1", [id])
            .await?;
        info!(content_type = %id, "content type deleted");
        Ok(())
    }

    /// The content type with its fields in position order.
    pub async fn load_schema(&self, content_type_id: &str) -> Result<ContentSchema, ServiceError> {
        let content_type = self.get_content_type(content_type_id).await?;
        let fields = self.list_fields(content_type_id).await?;
        Ok(ContentSchema::new(content_type, fields))
    }

    pub async fn list_fields(&self, content_type_id: &str) -> Result<Vec<FieldDefinition>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {FIELD_COLS} FROM content_fields WHERE content_type_id = ?1 ORDER BY position, name"
                ),
                [content_type_id],
            )
            .await?;
        let mut fields = Vec::new();
        while let Some(row) = rows.next().await? {
            fields.push(row_to_field(&row)?);
        }
        Ok(fields)
    }

    pub async fn get_field(&self, field_id: &str) -> Result<FieldDefinition, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {FIELD_COLS} FROM content_fields WHERE id = ?1"),
                [field_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("field", field_id))?;
        Ok(row_to_field(&row)?)
    }

    /// Add a field at the end of the type. Adding an SEO field turns SEO on
    /// for the type.
    pub async fn add_field(
        &self,
        content_type_id: &str,
        new_field: &NewField,
    ) -> Result<FieldDefinition, ServiceError> {
        let content_type = self.get_content_type(content_type_id).await?;
        let field_type = new_field.check_definition()?;
        let existing = self.list_fields(content_type_id).await?;
        let name = new_field.name.trim();
        if existing.iter().any(|f| f.name == name) {
            return Err(ServiceError::conflict(format!(
                "field '{name}' already exists on {}",
                content_type.slug
            )));
        }
        let position = existing.iter().map(|f| f.position).max().map_or(0, |p| p + 1);

        let id = self.db().generate_id(PREFIX_FIELD).await?;
        let field = new_field.build(field_type, &id, content_type_id, position, Utc::now());
        check_default(&field)?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO content_fields ({FIELD_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
                ),
                libsql::params_from_iter(field_params(&field)),
            )
            .await?;

        if field.is_seo && !content_type.enable_seo {
            self.switch_seo_on(content_type_id, field.updated_at).await?;
        }
        info!(content_type = %content_type_id, field = %field.name, "field added");
        Ok(field)
    }

    /// Replace a field's definition. Its id, type owner and position stay.
    pub async fn update_field(
        &self,
        field_id: &str,
        new_field: &NewField,
    ) -> Result<FieldDefinition, ServiceError> {
        let current = self.get_field(field_id).await?;
        let field_type = new_field.check_definition()?;
        let name = new_field.name.trim();
        if name != current.name {
            let siblings = self.list_fields(&current.content_type_id).await?;
            if siblings.iter().any(|f| f.name == name) {
                return Err(ServiceError::conflict(format!("field '{name}' already exists")));
            }
        }

        let mut field = new_field.build(
            field_type,
            &current.id,
            &current.content_type_id,
            current.position,
            Utc::now(),
        );
        field.created_at = current.created_at;
        check_default(&field)?;

        let mut params = field_params(&field);
        // id goes last, as the WHERE argument
        let id = params.remove(0);
        params.push(id);
        let assignments = FIELD_COLS
            .split(", ")
            .skip(1)
            .enumerate()
            .map(|(i, col)| format!("{} = ?{}", col.trim(), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        self.db()
            .conn()
            .execute(
                &format!(
                    "UPDATE content_fields SET {assignments} WHERE id = ?{}",
                    params.len()
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        if field.is_seo {
            let content_type = self.get_content_type(&field.content_type_id).await?;
            if !content_type.enable_seo {
                self.switch_seo_on(&content_type.id, field.updated_at).await?;
            }
        }
        Ok(field)
    }

    pub async fn delete_field(&self, field_id: &str) -> Result<(), ServiceError> {
        self.get_field(field_id).await?;
        self.db()
            .conn()
            .execute("DELETE FROM content_fields WHERE id = ?1", [field_id])
            .await?;
        Ok(())
    }

    async fn switch_seo_on(&self, content_type_id: &str, now: DateTime<Utc>) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE content_types SET enable_seo = 1, updated_at = ?1 WHERE id = ?2",
                libsql::params![now.to_rfc3339(), content_type_id],
            )
            .await?;
        Ok(())
    }

    async fn ensure_type_name_free(
        &self,
        name: &str,
        slug: &str,
        except_id: Option<&str>,
    ) -> Result<(), ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT name, slug FROM content_types WHERE (name = ?1 OR slug = ?2) AND id != ?3",
                libsql::params![name, slug, except_id.unwrap_or("")],
            )
            .await?;
        if let Some(row) = rows.next().await? {
            let taken: String = row.get(1)?;
            let what = if taken == slug { "slug" } else { "name" };
            return Err(ServiceError::conflict(format!(
                "a content type with this {what} already exists"
            )));
        }
        Ok(())
    }
}
