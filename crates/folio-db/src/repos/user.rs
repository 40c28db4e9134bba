//! User repository. A user is the verified caller identity; its role
//! reference is how every permission check finds a policy.

use chrono::Utc;
use folio_core::entities::{Role, User};
use folio_core::ids::PREFIX_USER;
use folio_core::permission::PermissionError;

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::FolioService;

const SELECT_COLS: &str = "id, name, email, role_id, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role_id: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl FolioService {
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        role_id: Option<&str>,
    ) -> Result<User, ServiceError> {
        let email = email.trim().to_lowercase();
        if name.trim().is_empty() || email.is_empty() {
            return Err(ServiceError::invalid("user name and email are required"));
        }
        if let Some(role_id) = role_id {
            self.get_role(role_id).await?;
        }
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict(format!("email '{email}' is already registered")));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    name.trim(),
                    email.as_str(),
                    role_id,
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(User {
            id,
            name: name.trim().to_string(),
            email,
            role_id: role_id.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("user", id))?;
        Ok(row_to_user(&row)?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY created_at, id"),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// Point a user at a different role, or at none.
    pub async fn assign_role(&self, user_id: &str, role_id: Option<&str>) -> Result<User, ServiceError> {
        self.get_user(user_id).await?;
        if let Some(role_id) = role_id {
            self.get_role(role_id).await?;
        }
        self.db()
            .conn()
            .execute(
                "UPDATE users SET role_id = ?1 WHERE id = ?2",
                libsql::params![role_id, user_id],
            )
            .await?;
        self.get_user(user_id).await
    }

    /// The role a caller acts under. A user without a role cannot act.
    pub async fn role_for_user(&self, user_id: &str) -> Result<Role, ServiceError> {
        let user = self.get_user(user_id).await?;
        let role_id = user.role_id.ok_or_else(|| PermissionError::NoRole {
            user_id: user_id.to_string(),
        })?;
        self.get_role(&role_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_core::errors::ErrorKind;

    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn create_user_with_role() {
        let svc = test_service().await;
        let editor = svc.get_role_by_name("editor").await.unwrap();
        let user = svc
            .create_user("Ada", "Ada@Example.com", Some(&editor.id))
            .await
            .unwrap();
        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(svc.role_for_user(&user.id).await.unwrap().name, "editor");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = test_service().await;
        svc.create_user("A", "a@example.com", None).await.unwrap();
        let err = svc.create_user("B", "A@example.com", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn unknown_role_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_user("A", "a@example.com", Some("rol-00000000"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn user_without_role_has_no_permission() {
        let svc = test_service().await;
        let user = svc.create_user("A", "a@example.com", None).await.unwrap();
        let err = svc.role_for_user(&user.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPermission);
    }

    #[tokio::test]
    async fn assign_role_switches_policy() {
        let svc = test_service().await;
        let viewer = svc.get_role_by_name("viewer").await.unwrap();
        let manager = svc.get_role_by_name("manager").await.unwrap();
        let user = svc.create_user("A", "a@example.com", Some(&viewer.id)).await.unwrap();
        svc.assign_role(&user.id, Some(&manager.id)).await.unwrap();
        assert_eq!(svc.role_for_user(&user.id).await.unwrap().name, "manager");
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }
}
