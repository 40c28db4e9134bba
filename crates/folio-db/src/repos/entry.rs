//! Entry lifecycle: permission-filtered, validated writes of content entries,
//! reads, pagination and soft delete.

use chrono::{DateTime, Utc};
use folio_core::FieldMap;
use folio_core::entities::ContentEntry;
use folio_core::enums::{Action, WorkflowStatus};
use folio_core::ids::PREFIX_ENTRY;
use folio_core::permission::{PermissionError, filter_fields, is_action_allowed};
use folio_core::responses::{EntryPage, PageMeta, SeoPreview};
use folio_core::validation::{UniquenessCheck, is_empty_value, validate, validate_partial};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::{
    get_opt_string, json_key_path, json_to_sql, parse_datetime, parse_enum, parse_field_map,
    parse_optional_datetime, to_json_text,
};
use crate::service::FolioService;

const SELECT_COLS: &str = "id, content_type_id, data, status, created_by, updated_by, \
     published_at, created_at, updated_at";

pub(crate) fn row_to_entry(row: &libsql::Row) -> Result<ContentEntry, DatabaseError> {
    Ok(ContentEntry {
        id: row.get(0)?,
        content_type_id: row.get(1)?,
        data: parse_field_map(&row.get::<String>(2)?)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        created_by: row.get(4)?,
        updated_by: get_opt_string(row, 5)?,
        published_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Filters for [`FolioService::list_entries`]. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub status: Option<WorkflowStatus>,
    pub created_by: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// 1-based. `None` and `0` both mean the first page.
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl UniquenessCheck for FolioService {
    async fn count_matching(
        &self,
        content_type_id: &str,
        field: &str,
        value: &Value,
        exclude: Option<&str>,
    ) -> anyhow::Result<u64> {
        let mut sql = String::from(
            "SELECT COUNT(*) FROM content_entries
             WHERE content_type_id = ?1 AND deleted_at IS NULL AND json_extract(data, ?2) = ?3",
        );
        let mut params: Vec<libsql::Value> = vec![
            content_type_id.into(),
            json_key_path(field).into(),
            json_to_sql(value),
        ];
        if let Some(id) = exclude {
            params.push(id.into());
            sql.push_str(" AND id != ?4");
        }
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u64::try_from(row.get::<i64>(0)?)?)
    }
}

impl FolioService {
    /// Create an entry in `draft` on behalf of `user_id`.
    ///
    /// The payload is reduced to the fields the caller may create, then
    /// validated in full (defaults injected). A non-empty payload that loses
    /// every field to filtering is refused.
    pub async fn create_entry(
        &self,
        content_type_id: &str,
        user_id: &str,
        data: FieldMap,
    ) -> Result<ContentEntry, ServiceError> {
        let schema = self.load_schema(content_type_id).await?;
        let role = self.role_for_user(user_id).await?;
        let data = self.resolve_media_refs(&schema, data).await?;

        let mut filtered = filter_fields(&role, Action::Create, &schema, &data)?;
        if !data.is_empty() && filtered.is_empty() {
            warn!(role = %role.name, content_type = %content_type_id, "create refused: no permitted fields");
            return Err(PermissionError::NoPermission {
                action: Action::Create,
                content_type_id: content_type_id.to_string(),
            }
            .into());
        }
        validate(&schema, &mut filtered, self).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ENTRY).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO content_entries (id, content_type_id, data, status, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    content_type_id,
                    to_json_text(&filtered)?,
                    WorkflowStatus::Draft.as_str(),
                    user_id,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        info!(entry = %id, content_type = %content_type_id, "entry created");

        Ok(ContentEntry {
            id,
            content_type_id: content_type_id.to_string(),
            data: filtered,
            status: WorkflowStatus::Draft,
            created_by: user_id.to_string(),
            updated_by: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a partial update into an unpublished entry.
    ///
    /// Only permitted keys are applied. A key sent as `null` or `""` removes
    /// the stored value (allowed only for optional fields). The workflow
    /// status is never changed here.
    pub async fn update_entry(
        &self,
        entry_id: &str,
        user_id: &str,
        partial: FieldMap,
    ) -> Result<ContentEntry, ServiceError> {
        let mut entry = self.get_entry(entry_id).await?;
        if !entry.status.is_editable() {
            return Err(ServiceError::conflict(format!(
                "entry {entry_id} is {} and cannot be edited",
                entry.status
            )));
        }
        let schema = self.load_schema(&entry.content_type_id).await?;
        let role = self.role_for_user(user_id).await?;
        let partial = self.resolve_media_refs(&schema, partial).await?;
        if partial.is_empty() {
            return Ok(entry);
        }

        let filtered = filter_fields(&role, Action::Update, &schema, &partial)?;
        if filtered.is_empty() {
            warn!(role = %role.name, entry = %entry_id, "update refused: no permitted fields");
            return Err(PermissionError::NoPermission {
                action: Action::Update,
                content_type_id: entry.content_type_id.clone(),
            }
            .into());
        }
        validate_partial(&schema, &filtered, Some(entry_id), self).await?;

        for (name, value) in filtered {
            if is_empty_value(Some(&value)) {
                entry.data.remove(&name);
            } else {
                entry.data.insert(name, value);
            }
        }
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE content_entries SET data = ?1, updated_by = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![to_json_text(&entry.data)?, user_id, now.to_rfc3339(), entry_id],
            )
            .await?;
        debug!(entry = %entry_id, "entry updated");

        entry.updated_by = Some(user_id.to_string());
        entry.updated_at = now;
        Ok(entry)
    }

    /// A live entry with its full data. Soft-deleted entries are not found.
    pub async fn get_entry(&self, id: &str) -> Result<ContentEntry, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM content_entries WHERE id = ?1 AND deleted_at IS NULL"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("entry", id))?;
        Ok(row_to_entry(&row)?)
    }

    /// An entry as `user_id` may see it: data reduced to readable fields.
    pub async fn read_entry(&self, id: &str, user_id: &str) -> Result<ContentEntry, ServiceError> {
        let mut entry = self.get_entry(id).await?;
        let schema = self.load_schema(&entry.content_type_id).await?;
        let role = self.role_for_user(user_id).await?;
        entry.data = filter_fields(&role, Action::Read, &schema, &entry.data)?;
        Ok(entry)
    }

    /// One page of live entries of a type, newest first.
    pub async fn list_entries(
        &self,
        content_type_id: &str,
        filter: &EntryFilter,
    ) -> Result<EntryPage, ServiceError> {
        self.get_content_type(content_type_id).await?;

        let mut conditions = vec!["content_type_id = ?1".to_string(), "deleted_at IS NULL".to_string()];
        let mut params: Vec<libsql::Value> = vec![content_type_id.into()];

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref created_by) = filter.created_by {
            params.push(created_by.clone().into());
            conditions.push(format!("created_by = ?{}", params.len()));
        }
        if let Some(from) = filter.created_from {
            params.push(from.to_rfc3339().into());
            conditions.push(format!("created_at >= ?{}", params.len()));
        }
        if let Some(to) = filter.created_to {
            params.push(to.to_rfc3339().into());
            conditions.push(format!("created_at <= ?{}", params.len()));
        }
        let where_clause = conditions.join(" AND ");

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM content_entries WHERE {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let total = match rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or_default(),
            None => 0,
        };
        drop(rows);

        let page = filter.page.filter(|&p| p > 0).unwrap_or(1);
        let limit = self.page_size(filter.limit);
        let offset = u64::from(page - 1) * u64::from(limit);
        params.push(i64::from(limit).into());
        let limit_idx = params.len();
        params.push(i64::try_from(offset).unwrap_or(i64::MAX).into());
        let offset_idx = params.len();

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM content_entries WHERE {where_clause}
                     ORDER BY created_at DESC, id LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }

        Ok(EntryPage {
            entries,
            meta: PageMeta::new(page, limit, total),
        })
    }

    /// Soft-delete an entry. Needs `delete` on the type; published entries
    /// must be taken out of `published` first, which the default pipeline
    /// does not allow.
    pub async fn delete_entry(&self, id: &str, user_id: &str) -> Result<(), ServiceError> {
        let entry = self.get_entry(id).await?;
        let role = self.role_for_user(user_id).await?;
        if !is_action_allowed(&role, Action::Delete, &entry.content_type_id) {
            warn!(role = %role.name, entry = %id, "delete refused");
            return Err(PermissionError::NoPermission {
                action: Action::Delete,
                content_type_id: entry.content_type_id,
            }
            .into());
        }
        if entry.status == WorkflowStatus::Published {
            return Err(ServiceError::conflict(format!(
                "entry {id} is published and cannot be deleted"
            )));
        }
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE content_entries SET deleted_at = ?1, updated_at = ?1, updated_by = ?2 WHERE id = ?3",
                libsql::params![now, user_id, id],
            )
            .await?;
        info!(entry = %id, "entry deleted");
        Ok(())
    }

    /// SEO-flagged fields of an entry, plus its `slug` when present.
    pub async fn seo_preview(&self, id: &str) -> Result<SeoPreview, ServiceError> {
        let entry = self.get_entry(id).await?;
        let schema = self.load_schema(&entry.content_type_id).await?;
        let seo = entry
            .data
            .into_iter()
            .filter(|(name, _)| name == "slug" || schema.is_seo_field(name) == Some(true))
            .collect();
        Ok(SeoPreview {
            entry_id: entry.id,
            content_type_id: entry.content_type_id,
            seo,
        })
    }

    /// Live entries in `status`, optionally limited to one type. Oldest first.
    pub async fn entries_by_status(
        &self,
        status: WorkflowStatus,
        content_type_id: Option<&str>,
    ) -> Result<Vec<ContentEntry>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM content_entries WHERE status = ?1 AND deleted_at IS NULL"
        );
        let mut params: Vec<libsql::Value> = vec![status.as_str().into()];
        if let Some(ct) = content_type_id {
            params.push(ct.into());
            sql.push_str(" AND content_type_id = ?2");
        }
        sql.push_str(" ORDER BY updated_at, id");

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    pub(crate) async fn count_live_entries(&self, content_type_id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM content_entries WHERE content_type_id = ?1 AND deleted_at IS NULL",
                [content_type_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        u64::try_from(row.get::<i64>(0)?).map_err(|e| DatabaseError::InvalidState(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use folio_core::entities::NewField;
    use folio_core::enums::FieldType;
    use folio_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::helpers::{fields, new_type_with, test_service, user_with_role};

    async fn article_type(svc: &FolioService) -> String {
        new_type_with(
            svc,
            "article",
            vec![
                NewField::new("title", FieldType::String).required(),
                NewField::new("slug", FieldType::String).unique(),
                NewField::new("views", FieldType::Number).default_value("0"),
                NewField::new("meta_title", FieldType::String).seo(),
            ],
        )
        .await
        .id()
        .to_string()
    }

    #[tokio::test]
    async fn create_injects_defaults_and_starts_in_draft() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let ct = article_type(&svc).await;

        let entry = svc
            .create_entry(&ct, &editor, fields(json!({"title": "Hello"})))
            .await
            .unwrap();
        assert_eq!(entry.status, WorkflowStatus::Draft);
        assert_eq!(Value::Object(entry.data.clone()), json!({"title": "Hello", "views": 0}));
        assert_eq!(svc.get_entry(&entry.id).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn create_rejects_missing_required_and_unknown_keys() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let ct = article_type(&svc).await;

        let err = svc
            .create_entry(&ct, &admin, fields(json!({"slug": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);

        let err = svc
            .create_entry(&ct, &admin, fields(json!({"title": "t", "bogus": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
    }

    #[tokio::test]
    async fn viewer_cannot_create() {
        let svc = test_service().await;
        let viewer = user_with_role(&svc, "viewer").await;
        let ct = article_type(&svc).await;
        let err = svc
            .create_entry(&ct, &viewer, fields(json!({"title": "t"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPermission);
    }

    #[tokio::test]
    async fn content_writer_loses_seo_fields_on_create() {
        let svc = test_service().await;
        let writer = user_with_role(&svc, "content_writer").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &writer, fields(json!({"title": "t", "meta_title": "m"})))
            .await
            .unwrap();
        assert!(!entry.data.contains_key("meta_title"));
        assert_eq!(entry.data["title"], json!("t"));
    }

    #[tokio::test]
    async fn seo_specialist_updates_only_seo_fields() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let seo = user_with_role(&svc, "seo_specialist").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &editor, fields(json!({"title": "x"})))
            .await
            .unwrap();

        let updated = svc
            .update_entry(&entry.id, &seo, fields(json!({"title": "changed", "meta_title": "y"})))
            .await
            .unwrap();
        assert_eq!(updated.data["title"], json!("x"));
        assert_eq!(updated.data["meta_title"], json!("y"));
        assert_eq!(updated.updated_by.as_deref(), Some(seo.as_str()));
        assert_eq!(updated.status, WorkflowStatus::Draft);

        let err = svc
            .update_entry(&entry.id, &seo, fields(json!({"title": "changed"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPermission);
    }

    #[tokio::test]
    async fn empty_update_returns_entry_unchanged() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &editor, fields(json!({"title": "x"})))
            .await
            .unwrap();
        let same = svc.update_entry(&entry.id, &editor, FieldMap::new()).await.unwrap();
        assert_eq!(same, entry);
    }

    #[tokio::test]
    async fn clearing_optional_field_removes_it() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &editor, fields(json!({"title": "x", "slug": "x"})))
            .await
            .unwrap();
        let updated = svc
            .update_entry(&entry.id, &editor, fields(json!({"slug": null})))
            .await
            .unwrap();
        assert!(!updated.data.contains_key("slug"));

        let err = svc
            .update_entry(&entry.id, &editor, fields(json!({"title": ""})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[tokio::test]
    async fn unique_value_excludes_self_and_deleted() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let ct = article_type(&svc).await;
        let first = svc
            .create_entry(&ct, &admin, fields(json!({"title": "a", "slug": "same"})))
            .await
            .unwrap();

        let err = svc
            .create_entry(&ct, &admin, fields(json!({"title": "b", "slug": "same"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateValue);

        svc.update_entry(&first.id, &admin, fields(json!({"slug": "same"})))
            .await
            .unwrap();

        svc.delete_entry(&first.id, &admin).await.unwrap();
        svc.create_entry(&ct, &admin, fields(json!({"title": "b", "slug": "same"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn read_entry_hides_unreadable_fields() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let ct = article_type(&svc).await;
        let role = svc
            .create_role(
                "reader",
                "reads non-SEO fields",
                &[folio_core::entities::Permission::new(
                    folio_core::enums::Module::ContentEntry,
                    Action::Read,
                )
                .scope(folio_core::enums::FieldScope::NonSeoOnly)],
            )
            .await
            .unwrap();
        let reader = svc
            .create_user("Reader", "reader@example.com", Some(&role.id))
            .await
            .unwrap();
        let entry = svc
            .create_entry(&ct, &admin, fields(json!({"title": "t", "meta_title": "m"})))
            .await
            .unwrap();

        let seen = svc.read_entry(&entry.id, &reader.id).await.unwrap();
        assert_eq!(Value::Object(seen.data), json!({"title": "t", "views": 0}));
    }

    #[tokio::test]
    async fn list_entries_paginates_and_filters() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let editor = user_with_role(&svc, "editor").await;
        let ct = article_type(&svc).await;
        for i in 0..3 {
            svc.create_entry(&ct, &admin, fields(json!({"title": format!("a{i}")})))
                .await
                .unwrap();
        }
        svc.create_entry(&ct, &editor, fields(json!({"title": "e"})))
            .await
            .unwrap();

        let page = svc
            .list_entries(&ct, &EntryFilter { limit: Some(3), ..EntryFilter::default() })
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 3);
        assert_eq!(page.meta, PageMeta::new(1, 3, 4));
        assert_eq!(page.meta.total_pages, 2);

        let second = svc
            .list_entries(&ct, &EntryFilter { page: Some(2), limit: Some(3), ..EntryFilter::default() })
            .await
            .unwrap();
        assert_eq!(second.entries.len(), 1);

        let by_editor = svc
            .list_entries(&ct, &EntryFilter { created_by: Some(editor.clone()), ..EntryFilter::default() })
            .await
            .unwrap();
        assert_eq!(by_editor.meta.total, 1);
        assert_eq!(by_editor.entries[0].created_by, editor);

        let published = svc
            .list_entries(&ct, &EntryFilter { status: Some(WorkflowStatus::Published), ..EntryFilter::default() })
            .await
            .unwrap();
        assert_eq!(published.meta.total, 0);
    }

    #[tokio::test]
    async fn editor_cannot_delete() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &editor, fields(json!({"title": "x"})))
            .await
            .unwrap();
        let err = svc.delete_entry(&entry.id, &editor).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPermission);
        assert!(svc.get_entry(&entry.id).await.is_ok());
    }

    #[tokio::test]
    async fn deleted_entry_is_not_found() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(&ct, &admin, fields(json!({"title": "x"})))
            .await
            .unwrap();
        svc.delete_entry(&entry.id, &admin).await.unwrap();
        assert_eq!(svc.get_entry(&entry.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(svc.count_live_entries(&ct).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn seo_preview_keeps_seo_fields_and_slug() {
        let svc = test_service().await;
        let admin = user_with_role(&svc, "admin").await;
        let ct = article_type(&svc).await;
        let entry = svc
            .create_entry(
                &ct,
                &admin,
                fields(json!({"title": "t", "slug": "t", "meta_title": "m"})),
            )
            .await
            .unwrap();
        let preview = svc.seo_preview(&entry.id).await.unwrap();
        assert_eq!(Value::Object(preview.seo), json!({"slug": "t", "meta_title": "m"}));
    }

    #[tokio::test]
    async fn media_reference_is_stored_as_url() {
        let svc = test_service().await;
        let editor = user_with_role(&svc, "editor").await;
        let schema = new_type_with(
            &svc,
            "gallery",
            vec![NewField::new("image", FieldType::Media).required()],
        )
        .await;
        let media = svc
            .register_media("a.png", "/uploads/a.png", "image/png", 10, &editor)
            .await
            .unwrap();
        let entry = svc
            .create_entry(schema.id(), &editor, fields(json!({"image_media_id": media.id})))
            .await
            .unwrap();
        assert_eq!(Value::Object(entry.data), json!({"image": "/uploads/a.png"}));
    }
}
