//! Errors raised while loading or checking Folio settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `FOLIO_*` variable could not be read into [`crate::FolioConfig`].
    #[error("failed to load folio settings: {0}")]
    Load(#[from] figment::Error),

    /// A section is missing a value Folio cannot run without, such as
    /// `database.path`.
    #[error("[{section}] is incomplete; set it in .folio/config.toml or via FOLIO_{}__*", .section.to_uppercase())]
    NotConfigured { section: String },

    /// A value is present but breaks a rule, e.g. `content.default_page_size`
    /// above `content.max_page_size`.
    #[error("bad value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
