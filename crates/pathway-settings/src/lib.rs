//! # pathway-settings
//!
//! Layered configuration for the pathway CLI.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`PathwaySettings::default()`]
//! 2. **User file**: `~/.pathway/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PATHWAY_*` overrides (highest priority)
//!
//! Command-line flags sit above all three and are applied by the binary.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_under_home() {
        let path = settings_path();
        assert!(path.ends_with(".pathway/settings.json"));
    }

    #[test]
    fn default_settings() {
        let settings = PathwaySettings::default();
        assert_eq!(settings.version, "0.1.0");
        assert!(settings.engine.ruleset_path.ends_with(".pathway/ruleset.json"));
        assert_eq!(settings.logging.level, LogLevel::Warn);
        assert!(!settings.logging.json);
        assert!(settings.validate().is_ok());
    }
}
