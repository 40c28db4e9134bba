//! Role repository: roles, their ordered permissions, and default seeding.

use chrono::Utc;
use folio_core::entities::{Permission, Role};
use folio_core::ids::{PREFIX_PERMISSION, PREFIX_ROLE};
use folio_core::seed::default_roles;
use tracing::{debug, info};

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_string_list, to_json_text};
use crate::service::FolioService;

const SELECT_COLS: &str = "id, name, description, created_at";

const PERMISSION_COLS: &str =
    "module, action, field_scope, allowed_fields, denied_fields, content_type_ids";

/// Role columns only; permissions are loaded separately.
fn row_to_role(row: &libsql::Row) -> Result<Role, DatabaseError> {
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        permissions: Vec::new(),
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_permission(row: &libsql::Row) -> Result<Permission, DatabaseError> {
    Ok(Permission {
        module: parse_enum(&row.get::<String>(0)?)?,
        action: parse_enum(&row.get::<String>(1)?)?,
        field_scope: get_opt_string(row, 2)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        allowed_fields: parse_string_list(&row.get::<String>(3)?)?,
        denied_fields: parse_string_list(&row.get::<String>(4)?)?,
        content_type_ids: parse_string_list(&row.get::<String>(5)?)?,
    })
}

impl FolioService {
    /// Create a role with its permissions. Names are unique.
    pub async fn create_role(
        &self,
        name: &str,
        description: &str,
        permissions: &[Permission],
    ) -> Result<Role, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("role name is required"));
        }
        if self.find_role_id(name).await?.is_some() {
            return Err(ServiceError::conflict(format!("role '{name}' already exists")));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ROLE).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO roles ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), name, description, now.to_rfc3339()],
            )
            .await?;
        self.insert_permissions(&id, 0, permissions).await?;

        Ok(Role {
            id,
            name: name.to_string(),
            description: description.to_string(),
            permissions: permissions.to_vec(),
            created_at: now,
        })
    }

    /// Append permissions after the role's existing ones. Order matters: the
    /// first applicable permission decides field filtering.
    pub async fn add_permissions(
        &self,
        role_id: &str,
        permissions: &[Permission],
    ) -> Result<Role, ServiceError> {
        let role = self.get_role(role_id).await?;
        let next = i64::try_from(role.permissions.len()).unwrap_or(i64::MAX);
        self.insert_permissions(role_id, next, permissions).await?;
        self.get_role(role_id).await
    }

    pub async fn get_role(&self, id: &str) -> Result<Role, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM roles WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("role", id))?;
        let mut role = row_to_role(&row)?;
        drop(rows);
        role.permissions = self.permissions_for(&role.id).await?;
        Ok(role)
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Role, ServiceError> {
        let id = self
            .find_role_id(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("role", name))?;
        self.get_role(&id).await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM roles ORDER BY name"), ())
            .await?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next().await? {
            roles.push(row_to_role(&row)?);
        }
        drop(rows);
        for role in &mut roles {
            role.permissions = self.permissions_for(&role.id).await?;
        }
        Ok(roles)
    }

    /// Insert any default role whose name is not taken yet. Returns how many
    /// were created.
    pub async fn seed_default_roles(&self) -> Result<usize, DatabaseError> {
        let mut created = 0;
        for role in default_roles() {
            if self.find_role_id(role.name).await?.is_some() {
                debug!(role = role.name, "default role already present");
                continue;
            }
            let now = Utc::now();
            let id = self.db().generate_id(PREFIX_ROLE).await?;
            self.db()
                .conn()
                .execute(
                    &format!("INSERT INTO roles ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                    libsql::params![id.as_str(), role.name, role.description, now.to_rfc3339()],
                )
                .await?;
            self.insert_permissions(&id, 0, &role.permissions).await?;
            created += 1;
        }
        if created > 0 {
            info!(created, "seeded default roles");
        }
        Ok(created)
    }

    async fn find_role_id(&self, name: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id FROM roles WHERE name = ?1", [name])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn permissions_for(&self, role_id: &str) -> Result<Vec<Permission>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PERMISSION_COLS} FROM permissions WHERE role_id = ?1 ORDER BY position"
                ),
                [role_id],
            )
            .await?;
        let mut permissions = Vec::new();
        while let Some(row) = rows.next().await? {
            permissions.push(row_to_permission(&row)?);
        }
        Ok(permissions)
    }

    async fn insert_permissions(
        &self,
        role_id: &str,
        first_position: i64,
        permissions: &[Permission],
    ) -> Result<(), DatabaseError> {
        for (offset, p) in (0_i64..).zip(permissions) {
            let id = self.db().generate_id(PREFIX_PERMISSION).await?;
            self.db()
                .conn()
                .execute(
                    &format!(
                        "INSERT INTO permissions (id, role_id, position, {PERMISSION_COLS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                    ),
                    libsql::params![
                        id.as_str(),
                        role_id,
                        first_position + offset,
                        p.module.as_str(),
                        p.action.as_str(),
                        p.field_scope.map(|s| s.as_str()),
                        to_json_text(&p.allowed_fields)?,
                        to_json_text(&p.denied_fields)?,
                        to_json_text(&p.content_type_ids)?
                    ],
                )
                .await?;
        }
        Ok(())
    }
}
