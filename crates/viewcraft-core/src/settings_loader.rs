//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `VIEWCRAFT_DEBUG` | `debug` |
//! | `VIEWCRAFT_LOG_LEVEL` | `log_level` |
//! | `VIEWCRAFT_SEARCH_PARAM` | `search_param` |
//! | `VIEWCRAFT_FILTER_PARAM` | `filter_param` |
//! | `VIEWCRAFT_ORDERING_PARAM` | `ordering_param` |
//! | `VIEWCRAFT_PAGE_PARAM` | `page_param` |
//! | `VIEWCRAFT_PER_PAGE` | `default_per_page` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use viewcraft_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("viewcraft.toml").unwrap();
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::ViewcraftError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any setting not present in the TOML keeps its default value.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, ViewcraftError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| ViewcraftError::Configuration(format!("Failed to parse TOML: {e}")))?;

    merge_into_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, ViewcraftError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ViewcraftError::Configuration(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ViewcraftError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, ViewcraftError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ViewcraftError::Configuration(format!("Failed to parse JSON: {e}")))?;

    merge_into_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, ViewcraftError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ViewcraftError::Configuration(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    let vars: HashMap<String, String> = std::env::vars()
        .filter(|(key, _)| key.starts_with("VIEWCRAFT_"))
        .collect();
    apply_overrides(settings, &vars);
}

/// Applies `VIEWCRAFT_*` overrides from an explicit variable map.
///
/// Unparseable numeric values are ignored and the previous value is kept.
pub fn apply_overrides<S: std::hash::BuildHasher>(
    settings: &mut Settings,
    vars: &HashMap<String, String, S>,
) {
    if let Some(val) = vars.get("VIEWCRAFT_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = vars.get("VIEWCRAFT_LOG_LEVEL") {
        settings.log_level.clone_from(val);
    }

    if let Some(val) = vars.get("VIEWCRAFT_SEARCH_PARAM") {
        settings.search_param.clone_from(val);
    }

    if let Some(val) = vars.get("VIEWCRAFT_FILTER_PARAM") {
        settings.filter_param.clone_from(val);
    }

    if let Some(val) = vars.get("VIEWCRAFT_ORDERING_PARAM") {
        settings.ordering_param.clone_from(val);
    }

    if let Some(val) = vars.get("VIEWCRAFT_PAGE_PARAM") {
        settings.page_param.clone_from(val);
    }

    if let Some(val) = vars.get("VIEWCRAFT_PER_PAGE") {
        if let Ok(per_page) = val.parse::<usize>() {
            settings.default_per_page = per_page;
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn merge_into_defaults(
    overrides: serde_json::Value,
    source: &str,
) -> Result<Settings, ViewcraftError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        ViewcraftError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        ViewcraftError::Configuration(format!("Failed to deserialize settings from {source}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
