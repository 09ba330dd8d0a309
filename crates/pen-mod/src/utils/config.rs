//! Application configuration management utilities.

use camino::Utf8PathBuf;
use pen_mod_import::ImportOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_LOG_FILTER: &str = "pen_mod=info,pen_mod_import=info,pen_meta=warn";

/// Application-wide configuration stored in config.toml.
///
/// Every field is optional; unset fields fall back to the library defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub meta_file_name: Option<String>,
    pub manifest_file_name: Option<String>,
    pub merge_existing: Option<bool>,
    pub log_filter: Option<String>,
}

impl AppConfig {
    pub fn import_options(&self) -> ImportOptions {
        let mut options = ImportOptions::default();
        if let Some(name) = &self.meta_file_name {
            options = options.with_meta_file_name(name);
        }
        if let Some(name) = &self.manifest_file_name {
            options = options.with_manifest_file_name(name);
        }
        options.with_merge_existing(self.merge_existing.unwrap_or(false))
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the application configuration from config.toml.
/// Returns default configuration if file doesn't exist or cannot be parsed.
pub fn load_config() -> AppConfig {
    default_config_path()
        .map(|path| load_config_from(path.as_std_path()))
        .unwrap_or_default()
}

pub fn load_config_from(path: &Path) -> AppConfig {
    if path.exists() {
        if let Ok(content) = fs::read_to_string(path) {
            if let Ok(cfg) = toml::from_str(&content) {
                return cfg;
            }
        }
    }
    AppConfig::default()
}

/// Saves the application configuration to config.toml.
pub fn save_config(cfg: &AppConfig) -> io::Result<()> {
    if let Some(path) = default_config_path() {
        save_config_to(cfg, path.as_std_path())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine config path",
        ))
    }
}

pub fn save_config_to(cfg: &AppConfig, path: &Path) -> io::Result<()> {
    let content = toml::to_string_pretty(cfg).map_err(io::Error::other)?;
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.import_options(), ImportOptions::default());
        assert_eq!(cfg.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn config_overrides_import_options() {
        let cfg: AppConfig = toml::from_str(
            r#"
            meta_file_name = "manips.txt"
            merge_existing = true
            log_filter = "debug"
            "#,
        )
        .unwrap();

        let options = cfg.import_options();
        assert_eq!(options.meta_file_name, "manips.txt");
        assert_eq!(options.manifest_file_name, "default_mod.json");
        assert!(options.merge_existing);
        assert_eq!(cfg.log_filter(), "debug");
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        let cfg = AppConfig {
            merge_existing: Some(true),
            ..Default::default()
        };

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path), cfg);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "merge_existing = \"maybe\"").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
        assert_eq!(load_config_from(&temp.path().join("missing.toml")), AppConfig::default());
    }
}
