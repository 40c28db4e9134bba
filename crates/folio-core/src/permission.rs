//! Role-based, field-level permission resolution.
//!
//! A role's permissions decide whether an action is allowed on a content type
//! and which keys of a payload survive. A role holding every CRUD action on
//! every module with scope `all` is full-access and skips filtering; that
//! predicate is recomputed from the permissions on every call.

use thiserror::Error;
use tracing::debug;

use crate::FieldMap;
use crate::entities::{Permission, Role};
use crate::enums::{Action, FieldScope, Module};
use crate::errors::ErrorKind;
use crate::schema::ContentSchema;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("no permission to {action} entries of content type {content_type_id}")]
    NoPermission {
        action: Action,
        content_type_id: String,
    },

    #[error("user {user_id} has no role")]
    NoRole { user_id: String },
}

impl PermissionError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::NoPermission
    }
}

/// Whether `role` holds create/read/update/delete on each module, each with
/// scope `all`. `approve` is not part of the check.
#[must_use]
pub fn is_full_access(role: &Role) -> bool {
    Module::ALL.iter().all(|&module| {
        Action::CRUD.iter().all(|&action| {
            role.permissions.iter().any(|p| {
                p.module == module && p.action == action && p.effective_scope() == FieldScope::All
            })
        })
    })
}

/// First permission of `role` for `module`/`action` whose content-type
/// whitelist is empty or names `content_type_id`.
#[must_use]
pub fn applicable_permission<'a>(
    role: &'a Role,
    module: Module,
    action: Action,
    content_type_id: &str,
) -> Option<&'a Permission> {
    role.permissions
        .iter()
        .find(|p| p.module == module && p.action == action && p.covers_type(content_type_id))
}

/// Action-level check on entries of a content type, ignoring field scope.
#[must_use]
pub fn is_action_allowed(role: &Role, action: Action, content_type_id: &str) -> bool {
    is_full_access(role)
        || applicable_permission(role, Module::ContentEntry, action, content_type_id).is_some()
}

/// Reduce `data` to the keys `role` may `action` on this content type.
///
/// Full-access roles get `data` back unchanged. Otherwise the first
/// applicable `ContentEntry` permission decides; none is `NoPermission`.
/// An empty result is returned as-is, callers decide what it means.
pub fn filter_fields(
    role: &Role,
    action: Action,
    schema: &ContentSchema,
    data: &FieldMap,
) -> Result<FieldMap, PermissionError> {
    if is_full_access(role) {
        return Ok(data.clone());
    }

    let permission = applicable_permission(role, Module::ContentEntry, action, schema.id())
        .ok_or_else(|| PermissionError::NoPermission {
            action,
            content_type_id: schema.id().to_string(),
        })?;

    let mut kept = FieldMap::new();
    for (name, value) in data {
        if field_in_scope(permission, schema, name) {
            kept.insert(name.clone(), value.clone());
        } else {
            debug!(role = %role.name, %action, field = %name, "field filtered out");
        }
    }
    Ok(kept)
}

/// Whether `role` may read `field_name` on this content type. Names that are
/// not fields of the type are never accessible to a restricted role.
#[must_use]
pub fn can_access_field(role: &Role, field_name: &str, schema: &ContentSchema) -> bool {
    if is_full_access(role) {
        return true;
    }
    if schema.field(field_name).is_none() {
        return false;
    }
    applicable_permission(role, Module::ContentEntry, Action::Read, schema.id())
        .is_some_and(|p| field_in_scope(p, schema, field_name))
}

fn field_in_scope(permission: &Permission, schema: &ContentSchema, name: &str) -> bool {
    match permission.effective_scope() {
        FieldScope::All => true,
        FieldScope::SeoOnly => schema.is_seo_field(name) == Some(true),
        FieldScope::NonSeoOnly => schema.is_seo_field(name) == Some(false),
        FieldScope::Custom => {
            if !permission.allowed_fields.is_empty() {
                permission.allowed_fields.iter().any(|f| f == name)
            } else if !permission.denied_fields.is_empty() {
                !permission.denied_fields.iter().any(|f| f == name)
            } else {
                true
            }
        }
    }
}
