//! Settings types.
//!
//! Every section deserializes with `#[serde(default)]`, so a settings file
//! only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};
use crate::loader::pathway_dir;

/// Root settings document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathwaySettings {
    /// Settings schema version.
    pub version: String,
    /// Rule engine settings.
    pub engine: EngineSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

impl Default for PathwaySettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            engine: EngineSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PathwaySettings {
    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.engine.ruleset_path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "engine.rulesetPath must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rule engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Ruleset document used when `--ruleset` is not given.
    pub ruleset_path: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ruleset_path: pathway_dir()
                .join("ruleset.json")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr.
    pub level: LogLevel,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace.
    Trace,
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warn. Keeps stderr quiet unless something is off.
    #[default]
    Warn,
    /// Error.
    Error,
}

impl LogLevel {
    /// Parse a level name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_serde() {
        let json = serde_json::to_string(&LogLevel::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
        let back: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, LogLevel::Error);
    }

    #[test]
    fn log_level_parse() {
        assert_eq!(LogLevel::parse("INFO"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn camel_case_keys() {
        let value = serde_json::to_value(PathwaySettings::default()).unwrap();
        assert!(value["engine"].get("rulesetPath").is_some());
        assert_eq!(value["logging"]["level"], "warn");
        assert_eq!(value["logging"]["json"], false);
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let settings: PathwaySettings =
            serde_json::from_str(r#"{"logging": {"json": true}}"#).unwrap();
        assert!(settings.logging.json);
        assert_eq!(settings.logging.level, LogLevel::Warn);
        assert_eq!(settings.engine, EngineSettings::default());
    }

    #[test]
    fn empty_ruleset_path_is_invalid() {
        let mut settings = PathwaySettings::default();
        settings.engine.ruleset_path = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(msg)) if msg.contains("rulesetPath")
        ));
    }
}
