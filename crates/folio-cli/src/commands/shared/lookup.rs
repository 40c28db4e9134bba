//! Resolve command-line references that may be a name or an ID.

use folio_core::entities::{ContentType, Role};
use folio_core::ids::{PREFIX_CONTENT_TYPE, PREFIX_ROLE};
use folio_db::service::FolioService;

fn looks_like_id(raw: &str, prefix: &str) -> bool {
    raw.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('-'))
}

/// A role by ID (`rol-...`) or by name.
pub async fn role(service: &FolioService, raw: &str) -> anyhow::Result<Role> {
    let role = if looks_like_id(raw, PREFIX_ROLE) {
        service.get_role(raw).await?
    } else {
        service.get_role_by_name(raw).await?
    };
    Ok(role)
}

/// A content type by ID (`cty-...`) or by slug.
pub async fn content_type(service: &FolioService, raw: &str) -> anyhow::Result<ContentType> {
    let content_type = if looks_like_id(raw, PREFIX_CONTENT_TYPE) {
        service.get_content_type(raw).await?
    } else {
        service.get_content_type_by_slug(raw).await?
    };
    Ok(content_type)
}
