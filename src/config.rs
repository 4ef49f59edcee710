// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}
fn default_max_task_index() -> usize {
    100
}
fn default_max_field_length() -> usize {
    200
}
fn default_max_years_past() -> u32 {
    10
}
fn default_max_years_future() -> u32 {
    50
}
fn default_suggestion_distance() -> usize {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Save file override. Defaults to `<data dir>/cherry.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_max_task_index")]
    pub max_task_index: usize,
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,
    #[serde(default = "default_max_years_past")]
    pub max_years_past: u32,
    #[serde(default = "default_max_years_future")]
    pub max_years_future: u32,
    #[serde(default = "default_true")]
    pub case_sensitive_find: bool,
    #[serde(default = "default_suggestion_distance")]
    pub suggestion_distance: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            // Match the serde defaults
            max_task_index: 100,
            max_field_length: 200,
            max_years_past: 10,
            max_years_future: 50,
            case_sensitive_find: true,
            suggestion_distance: 2,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file means defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        if !ctx.get_config_file_path()?.exists() {
            return Ok(Self::default());
        }
        Self::load(ctx)
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// The save file to use: the configured override, else the context default.
    pub fn task_file_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => ctx.get_task_file_path(),
        }
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_gives_defaults() {
        let ctx = TestContext::new();
        assert!(Config::load(&ctx).is_err());
        assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "case_sensitive_find = false\nmax_years_past = 3\n").unwrap();

        let config = Config::load_or_default(&ctx).unwrap();
        assert!(!config.case_sensitive_find);
        assert_eq!(config.max_years_past, 3);
        assert_eq!(config.max_task_index, 100);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_then_load() {
        let ctx = TestContext::new();
        let config = Config {
            data_file: Some(ctx.root.join("elsewhere.txt")),
            log_level: "debug".to_string(),
            ..Config::default()
        };
        config.save(&ctx).unwrap();
        let loaded = Config::load(&ctx).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.log_level_filter(), log::LevelFilter::Debug);
        assert_eq!(
            loaded.task_file_path(&ctx).unwrap(),
            ctx.root.join("elsewhere.txt")
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let ctx = TestContext::new();
        fs::write(ctx.get_config_file_path().unwrap(), "max_task_index = \"lots\"").unwrap();
        let err = Config::load_or_default(&ctx).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
