//! Environment variables take precedence over TOML and defaults, and the
//! loaded result is checked.

use figment::Jail;
use folio_config::{ConfigError, FolioConfig};

#[test]
fn env_overrides_database_path() {
    Jail::expect_with(|jail| {
        jail.set_env("FOLIO_DATABASE__PATH", ":memory:");
        jail.set_env("FOLIO_DATABASE__SEED_DEFAULTS", "false");

        let config = FolioConfig::load().expect("config loads");
        assert_eq!(config.database.path, ":memory:");
        assert!(config.database.is_in_memory());
        assert!(!config.database.seed_defaults);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".folio")).expect("mkdir");
        jail.create_file(
            ".folio/config.toml",
            r#"
[content]
max_page_size = 40
"#,
        )?;
        jail.set_env("FOLIO_CONTENT__MAX_PAGE_SIZE", "60");

        let config = FolioConfig::load().expect("config loads");
        assert_eq!(config.content.max_page_size, 60);
        Ok(())
    });
}

#[test]
fn blank_database_path_is_not_configured() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".folio")).expect("mkdir");
        jail.create_file(
            ".folio/config.toml",
            r#"
[database]
path = ""
"#,
        )?;

        let err = FolioConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "database"));
        Ok(())
    });
}
