//! Service layer over `FolioDb`.
//!
//! `FolioService` is the entry point for every content operation. The repo
//! modules add methods to it via `impl FolioService` blocks. Each write
//! follows the same order: resolve the caller's role, filter the payload by
//! permission, validate what is left, then persist.

use folio_config::FolioConfig;
use tracing::info;

use crate::FolioDb;
use crate::error::DatabaseError;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Service over one libSQL connection.
///
/// An instance serves one operation at a time: status changes open a
/// transaction on the shared connection, and any statement issued through
/// the same instance while it is open would join it. Callers that need
/// parallel requests open one service per request against the same file.
pub struct FolioService {
    db: FolioDb,
    default_page_size: u32,
    max_page_size: u32,
}

impl FolioService {
    /// Open a local database and wrap it. Does not seed anything.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = FolioDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Open the configured database, applying the configured page sizes and
    /// seeding defaults when `database.seed_defaults` is set.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or seeding fails.
    pub async fn from_config(config: &FolioConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_in_memory() {
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Other(anyhow::anyhow!(
                            "creating database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }
        let db = FolioDb::open_local(&config.database.path).await?;
        let svc = Self::from_db(db).with_page_sizes(
            config.content.default_page_size,
            config.content.max_page_size,
        );
        if config.database.seed_defaults {
            svc.bootstrap().await?;
        }
        Ok(svc)
    }

    /// Create from an existing `FolioDb` (for testing).
    #[must_use]
    pub const fn from_db(db: FolioDb) -> Self {
        Self {
            db,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_sizes(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &FolioDb {
        &self.db
    }

    /// Resolve a requested page size against the configured default and cap.
    #[must_use]
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|&n| n > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }

    /// Install the default roles and the default workflow transitions.
    /// Safe to run on every start.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails.
    pub async fn bootstrap(&self) -> Result<(), DatabaseError> {
        let roles = self.seed_default_roles().await?;
        let transitions = self.seed_default_transitions().await?;
        info!(roles, transitions, "bootstrap complete");
        Ok(())
    }
}
