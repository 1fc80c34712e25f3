//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PathwaySettings::default()`]
//! 2. If `~/.pathway/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `PATHWAY_*` environment variable overrides
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{LogLevel, PathwaySettings};

/// Ruleset path override.
pub const ENV_RULESET: &str = "PATHWAY_RULESET";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "PATHWAY_LOG_LEVEL";
/// JSON log format override.
pub const ENV_LOG_JSON: &str = "PATHWAY_LOG_JSON";

pub(crate) fn pathway_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pathway")
}

/// Resolve the path to the settings file (`~/.pathway/settings.json`).
pub fn settings_path() -> PathBuf {
    pathway_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PathwaySettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or an unusable value is
/// an error.
pub fn load_settings_from_path(path: &Path) -> Result<PathwaySettings> {
    let mut settings = read_layers(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn read_layers(path: &Path) -> Result<PathwaySettings> {
    let defaults = serde_json::to_value(PathwaySettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `PATHWAY_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut PathwaySettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
///
/// Empty values are treated as unset. Values that fail to parse are
/// ignored with a warning, leaving the file or default value in place.
pub fn apply_overrides(settings: &mut PathwaySettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read(ENV_RULESET) {
        settings.engine.ruleset_path = v;
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        match LogLevel::parse(&v) {
            Some(level) => settings.logging.level = level,
            None => warn!(key = ENV_LOG_LEVEL, value = %v, "invalid log level env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_LOG_JSON) {
        match parse_bool(&v) {
            Some(json) => settings.logging.json = json,
            None => warn!(key = ENV_LOG_JSON, value = %v, "invalid boolean env var, ignoring"),
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;
    use serde_json::json;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = json!({"engine": {"rulesetPath": "a.json"}, "logging": {"level": "warn", "json": false}});
        let source = json!({"logging": {"json": true}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["logging"]["json"], true);
        assert_eq!(merged["logging"]["level"], "warn");
        assert_eq!(merged["engine"]["rulesetPath"], "a.json");
    }

    #[test]
    fn merge_null_preserves_target() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": null, "b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn merge_array_and_primitive_replace() {
        let merged = deep_merge(json!({"a": [1, 2], "b": {"x": 1}}), json!({"a": [3], "b": 7}));
        assert_eq!(merged, json!({"a": [3], "b": 7}));
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let settings = read_layers(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings, PathwaySettings::default());
    }

    #[test]
    fn partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"engine": {"rulesetPath": "/srv/rules.json"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let settings = read_layers(&path).unwrap();
        assert_eq!(settings.engine.ruleset_path, "/srv/rules.json");
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert!(!settings.logging.json);
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn wrong_type_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"logging": {"level": "shouty"}}"#).unwrap();
        assert!(matches!(read_layers(&path), Err(SettingsError::Json(_))));
    }

    #[test]
    fn empty_ruleset_path_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"engine": {"rulesetPath": ""}}"#).unwrap();
        let mut settings = read_layers(&path).unwrap();
        apply_overrides(&mut settings, vars(&[]));
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn overrides_applied() {
        let mut settings = PathwaySettings::default();
        apply_overrides(
            &mut settings,
            vars(&[
                (ENV_RULESET, "/etc/pathway/rules.json"),
                (ENV_LOG_LEVEL, "TRACE"),
                (ENV_LOG_JSON, "yes"),
            ]),
        );
        assert_eq!(settings.engine.ruleset_path, "/etc/pathway/rules.json");
        assert_eq!(settings.logging.level, LogLevel::Trace);
        assert!(settings.logging.json);
    }

    #[test]
    fn invalid_overrides_ignored() {
        let mut settings = PathwaySettings::default();
        apply_overrides(
            &mut settings,
            vars(&[(ENV_RULESET, ""), (ENV_LOG_LEVEL, "verbose"), (ENV_LOG_JSON, "maybe")]),
        );
        assert_eq!(settings, PathwaySettings::default());
    }

    #[test]
    fn parse_bool_values() {
        for v in ["true", "1", "YES", "on"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "No", "OFF"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("2"), None);
        assert_eq!(parse_bool(""), None);
    }
}
