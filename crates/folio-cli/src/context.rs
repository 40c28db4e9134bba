use folio_config::FolioConfig;
use folio_db::service::FolioService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: FolioService,
    pub config: FolioConfig,
}

impl AppContext {
    /// Open the configured database. Default roles and transitions are
    /// seeded when `database.seed_defaults` is on.
    pub async fn init(config: FolioConfig) -> anyhow::Result<Self> {
        let service = FolioService::from_config(&config).await?;
        Ok(Self { service, config })
    }
}
