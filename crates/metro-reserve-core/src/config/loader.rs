//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.metro-reserve/config.yaml, or an explicit path)
//! 3. Environment variables (METRO_RESERVE_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{HumanDuration, RuntimeConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "runtime-defaults.yaml";
const CONFIG_FILE: &str = "config.yaml";
const CONFIG_DIR: &str = ".metro-reserve";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at ~/.metro-reserve
    pub fn new() -> Result<Self> {
        let home = crate::utils::get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| {
                Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display()))
            })?;
        Ok(Self {
            config_dir: home.join(CONFIG_DIR),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the user config file
    pub fn default_config_path(&self) -> Utf8PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load runtime configuration using process environment variables
    pub fn load_runtime_config(&self, explicit_path: Option<&Utf8Path>) -> Result<RuntimeConfig> {
        self.load_runtime_config_with_env(explicit_path, |key| env::var(key).ok())
    }

    /// Load runtime configuration with a custom environment lookup
    ///
    /// An explicit path must exist; the default user file is optional.
    pub fn load_runtime_config_with_env<F>(
        &self,
        explicit_path: Option<&Utf8Path>,
        lookup: F,
    ) -> Result<RuntimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = Self::embedded_defaults_value()?;

        let user_path = match explicit_path {
            Some(path) if !path.exists() => return Err(Error::config_not_found(path.as_str())),
            Some(path) => Some(path.to_path_buf()),
            None => Some(self.default_config_path()).filter(|p| p.exists()),
        };

        if let Some(path) = user_path {
            debug!(path = %path, "loading user config");
            let overlay = Self::load_yaml_value(&path)?;
            merge_yaml(&mut merged, overlay);
        }

        let config: RuntimeConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to resolve configuration: {}", e)))?;

        apply_env_overrides(config, lookup)
    }

    /// Embedded defaults as a typed config
    pub fn embedded_defaults() -> Result<RuntimeConfig> {
        let value = Self::embedded_defaults_value()?;
        serde_yaml_ng::from_value(value).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    /// Write the embedded defaults to `path` (or the user config path)
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default_config(
        &self,
        path: Option<&Utf8Path>,
        force: bool,
    ) -> Result<Utf8PathBuf> {
        let target = path.map_or_else(|| self.default_config_path(), Utf8Path::to_path_buf);
        if target.exists() && !force {
            return Err(Error::invalid_config(format!(
                "{} already exists (use --force to overwrite)",
                target
            )));
        }

        if let Some(parent) = target.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&target, Self::embedded_defaults_text()?)?;
        Ok(target)
    }

    fn embedded_defaults_text() -> Result<String> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        String::from_utf8(embedded_file.data.into_owned()).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })
    }

    fn embedded_defaults_value() -> Result<Value> {
        let text = Self::embedded_defaults_text()?;
        serde_yaml_ng::from_str(&text).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    fn load_yaml_value(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }
}

/// Recursively overlay `overlay` onto `base`; mappings merge key by key
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply METRO_RESERVE_* overrides to `config`
pub fn apply_env_overrides<F>(mut config: RuntimeConfig, lookup: F) -> Result<RuntimeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("METRO_RESERVE_ENDPOINT") {
        config.network.endpoint = val;
    }

    if let Some(val) = lookup("METRO_RESERVE_TIMEOUT") {
        config.network.timeout = parse_env_duration("METRO_RESERVE_TIMEOUT", &val)?;
    }

    if let Some(val) = lookup("METRO_RESERVE_INTERVAL") {
        config.retry.interval = parse_env_duration("METRO_RESERVE_INTERVAL", &val)?;
    }

    if let Some(val) = lookup("METRO_RESERVE_MAX_ATTEMPTS") {
        config.retry.max_attempts = val.trim().parse().map_err(|_| {
            Error::invalid_config("METRO_RESERVE_MAX_ATTEMPTS must be a valid number")
        })?;
    }

    if let Some(val) = lookup("METRO_RESERVE_LOOP_DURATION") {
        config.retry.loop_duration = parse_env_duration("METRO_RESERVE_LOOP_DURATION", &val)?;
    }

    if let Some(val) = lookup("METRO_RESERVE_LINE") {
        config.reservation.line = val;
    }

    if let Some(val) = lookup("METRO_RESERVE_STATION") {
        config.reservation.station = val;
    }

    if let Some(val) = lookup("METRO_RESERVE_TIME_SLOT") {
        config.reservation.time_slot = val;
    }

    if let Some(val) = lookup("METRO_RESERVE_SNAPSHOT_TIME_SLOT") {
        config.reservation.snapshot_time_slot = val;
    }

    if let Some(val) = lookup("METRO_RESERVE_DATE_OFFSET") {
        config.reservation.date_offset = val.trim().parse().map_err(|_| {
            Error::invalid_config("METRO_RESERVE_DATE_OFFSET must be a non-negative number")
        })?;
    }

    Ok(config)
}

fn parse_env_duration(key: &str, value: &str) -> Result<HumanDuration> {
    value
        .parse()
        .map_err(|_| Error::invalid_config(format!("{} must be a duration such as 1s or 2m", key)))
}
