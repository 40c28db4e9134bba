//! Media file registry and `<field>_media_id` reference resolution.

use chrono::Utc;
use folio_core::FieldMap;
use folio_core::entities::MediaFile;
use folio_core::enums::FieldType;
use folio_core::ids::PREFIX_MEDIA;
use folio_core::schema::ContentSchema;
use serde_json::Value;
use tracing::debug;

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::parse_datetime;
use crate::service::FolioService;

const SELECT_COLS: &str = "id, file_name, url, mime_type, size, uploaded_by, created_at";

const MEDIA_ID_SUFFIX: &str = "_media_id";

fn row_to_media(row: &libsql::Row) -> Result<MediaFile, DatabaseError> {
    Ok(MediaFile {
        id: row.get(0)?,
        file_name: row.get(1)?,
        url: row.get(2)?,
        mime_type: row.get(3)?,
        size: row.get(4)?,
        uploaded_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl FolioService {
    /// Record an already-stored file. Storage itself happens elsewhere; only
    /// the resulting URL is kept.
    pub async fn register_media(
        &self,
        file_name: &str,
        url: &str,
        mime_type: &str,
        size: i64,
        uploaded_by: &str,
    ) -> Result<MediaFile, ServiceError> {
        if file_name.trim().is_empty() || url.trim().is_empty() {
            return Err(ServiceError::invalid("media file name and url are required"));
        }
        self.get_user(uploaded_by).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_MEDIA).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO media_files ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    id.as_str(),
                    file_name,
                    url,
                    mime_type,
                    size,
                    uploaded_by,
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(MediaFile {
            id,
            file_name: file_name.to_string(),
            url: url.to_string(),
            mime_type: mime_type.to_string(),
            size,
            uploaded_by: uploaded_by.to_string(),
            created_at: now,
        })
    }

    pub async fn get_media(&self, id: &str) -> Result<MediaFile, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM media_files WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("media", id))?;
        Ok(row_to_media(&row)?)
    }

    pub async fn list_media(&self, limit: u32) -> Result<Vec<MediaFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM media_files ORDER BY created_at DESC LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;
        let mut files = Vec::new();
        while let Some(row) = rows.next().await? {
            files.push(row_to_media(&row)?);
        }
        Ok(files)
    }

    /// Replace each `<field>_media_id` key that names a `media` field of the
    /// schema with `<field>: <media url>`. The `_media_id` key is dropped.
    /// Keys that do not name a media field are left for the validator.
    pub(crate) async fn resolve_media_refs(
        &self,
        schema: &ContentSchema,
        mut data: FieldMap,
    ) -> Result<FieldMap, ServiceError> {
        let refs: Vec<(String, String)> = data
            .keys()
            .filter_map(|key| {
                let field = key.strip_suffix(MEDIA_ID_SUFFIX)?;
                schema
                    .field(field)
                    .filter(|f| f.field_type == FieldType::Media)
                    .map(|f| (key.clone(), f.name.clone()))
            })
            .collect();

        for (key, field) in refs {
            let Some(value) = data.remove(&key) else {
                continue;
            };
            let media_id = match value {
                Value::String(s) if !s.is_empty() => s,
                Value::Null | Value::String(_) => continue,
                other => {
                    return Err(ServiceError::invalid(format!(
                        "'{key}' must be a media id, got {other}"
                    )));
                }
            };
            let media = self.get_media(&media_id).await?;
            debug!(%field, media = %media.id, "resolved media reference");
            data.insert(field, Value::String(media.url));
        }
        Ok(data)
    }
}
