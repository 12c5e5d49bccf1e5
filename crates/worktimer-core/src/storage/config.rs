//! TOML-based application configuration.
//!
//! Stores where the timer keeps its files and how reports are rendered.
//! Configuration is stored at `~/.config/worktimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{config_dir, default_status_dir, StatusStore};
use crate::error::ConfigError;

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Column width for task names in the detail and task reports.
    #[serde(default = "default_task_width")]
    pub task_width: usize,
    #[serde(default = "default_true")]
    pub color: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/worktimer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the shared status file. Home directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_dir: Option<PathBuf>,
    /// Name of the per-project log file.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Name of the shared status file.
    #[serde(default = "default_status_file")]
    pub status_file: String,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_task_width() -> usize {
    64
}
fn default_true() -> bool {
    true
}
fn default_log_file() -> String {
    ".timer".into()
}
fn default_status_file() -> String {
    ".timer-status".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            task_width: default_task_width(),
            color: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_dir: None,
            log_file: default_log_file(),
            status_file: default_status_file(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                // status_dir is optional and absent from the JSON when unset
                let existing = match obj.get(part) {
                    Some(existing) => existing.clone(),
                    None if part == "status_dir" => serde_json::Value::Null,
                    None => return Err(unknown()),
                };

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit file, writing defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = match Self::get_json_value_by_path(&json, key) {
            Some(val) => val,
            None if key == "status_dir" => return Some(String::new()),
            None => return None,
        };
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Directory holding the status file.
    pub fn status_dir(&self) -> PathBuf {
        self.status_dir.clone().unwrap_or_else(default_status_dir)
    }

    /// The shared status slot this configuration points at.
    pub fn status_store(&self) -> StatusStore {
        StatusStore::new(&self.status_dir(), &self.status_file)
    }
}
