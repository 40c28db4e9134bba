//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use folio_config::FolioConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/folio/cms.db"
seed_defaults = false
"#,
        )?;

        let config: FolioConfig = Figment::from(Serialized::defaults(FolioConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/folio/cms.db");
        assert!(!config.database.seed_defaults);
        assert_eq!(config.content.default_page_size, 10);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[content]
max_page_size = 250
"#,
        )?;

        let config: FolioConfig = Figment::from(Serialized::defaults(FolioConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.content.max_page_size, 250);
        assert_eq!(config.content.default_page_size, 10);
        assert_eq!(config.database.path, ".folio/folio.db");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".folio")).expect("mkdir");
        jail.create_file(
            ".folio/config.toml",
            r#"
[general]
log_level = "debug"

[content]
default_page_size = 25
"#,
        )?;

        let config = FolioConfig::load().expect("config loads");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.content.default_page_size, 25);
        Ok(())
    });
}

#[test]
fn load_rejects_inconsistent_page_sizes() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".folio")).expect("mkdir");
        jail.create_file(
            ".folio/config.toml",
            r#"
[content]
default_page_size = 50
max_page_size = 20
"#,
        )?;

        assert!(FolioConfig::load().is_err());
        Ok(())
    });
}
