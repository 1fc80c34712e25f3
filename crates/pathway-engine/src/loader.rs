//! Loading rulesets and input records from JSON.
//!
//! These are the only fallible entry points of the crate. Input records
//! are treated as coming straight from the intake form, so the GPA is
//! clamped into the accepted range on the way in.

use std::path::Path;

use tracing::debug;

use crate::errors::{EngineError, Result};
use crate::types::{Ruleset, StudentInput};

impl Ruleset {
    /// Parse a ruleset document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl StudentInput {
    /// Parse an input record and clamp its GPA.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut input: Self = serde_json::from_str(json)?;
        input.clamp_gpa();
        Ok(input)
    }
}

/// Read and parse a ruleset document from disk.
pub fn load_ruleset(path: &Path) -> Result<Ruleset> {
    let content = read(path)?;
    let ruleset = Ruleset::from_json_str(&content)?;
    debug!(
        ?path,
        engine_version = %ruleset.engine_version,
        stages = ruleset.execution_order.len(),
        rules = ruleset.rules.len(),
        "ruleset loaded"
    );
    Ok(ruleset)
}

/// Parse an input record; see [`StudentInput::from_json_str`].
pub fn parse_input(json: &str) -> Result<StudentInput> {
    StudentInput::from_json_str(json)
}

/// Read and parse an input record from disk.
pub fn load_input(path: &Path) -> Result<StudentInput> {
    let content = read(path)?;
    let input = parse_input(&content)?;
    debug!(?path, "input loaded");
    Ok(input)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| EngineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn load_ruleset_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"engine_version": "1.0", "execution_order": ["a"], "rules": [{"stage": "a"}]}"#,
        )
        .unwrap();

        let ruleset = load_ruleset(&path).unwrap();
        assert_eq!(ruleset.engine_version, "1.0");
        assert_eq!(ruleset.rules.len(), 1);
    }

    #[test]
    fn missing_ruleset_file_is_read_error() {
        let err = load_ruleset(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert_matches!(err, EngineError::Read { ref path, .. } if path.ends_with("rules.json"));
    }

    #[test]
    fn invalid_ruleset_json_is_parse_error() {
        assert_matches!(Ruleset::from_json_str("not json"), Err(EngineError::Json(_)));
        assert_matches!(
            Ruleset::from_json_str(r#"{"rules": "nope"}"#),
            Err(EngineError::Json(_))
        );
    }

    #[test]
    fn parse_input_clamps_gpa() {
        let input = parse_input(r#"{"grade_level": 11, "gpa_unweighted": 4.4}"#).unwrap();
        assert_eq!(input.gpa_unweighted, Some(4.0));
        let low = StudentInput::from_json_str(r#"{"gpa_unweighted": 1.2}"#).unwrap();
        assert_eq!(low.gpa_unweighted, Some(2.0));
    }

    #[test]
    fn load_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, r#"{"grade_level": 9, "systems_considered": ["csu"]}"#).unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.grade_level, Some(9));
        assert_eq!(input.systems_considered, vec!["csu"]);
    }
}
