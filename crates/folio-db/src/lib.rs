//! # folio-db
//!
//! libSQL persistence for Folio, and the service layer that runs every
//! content operation: resolve the caller's role, filter the payload by
//! permission, validate it against the content type, then persist.
//!
//! Uses the `libsql` crate (v0.9.29) with a local database file, or
//! `":memory:"` for tests.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Folio state.
pub struct FolioDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl FolioDb {
    /// Open a local database at the given path. Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let folio_db = Self { db, conn };
        folio_db.run_migrations().await?;
        Ok(folio_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"ent-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ids::ALL_PREFIXES;
    use std::collections::HashSet;

    async fn test_db() -> FolioDb {
        FolioDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "roles",
            "permissions",
            "users",
            "content_types",
            "content_fields",
            "content_entries",
            "media_files",
            "workflow_transitions",
            "workflow_history",
            "workflow_comments",
            "workflow_assignments",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_rerunnable() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        for prefix in ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")), "bad prefix: {id}");
            assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
            assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[tokio::test]
    async fn generate_id_unique() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            ids.insert(db.generate_id("ent").await.unwrap());
        }
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        let path = path.to_str().unwrap();
        {
            let db = FolioDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO roles (id, name, description, created_at) VALUES ('rol-1', 'x', '', '2026-01-01T00:00:00Z')",
                    (),
                )
                .await
                .unwrap();
        }
        let db = FolioDb::open_local(path).await.unwrap();
        let mut rows = db.conn().query("SELECT COUNT(*) FROM roles", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
