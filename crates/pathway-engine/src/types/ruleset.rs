//! Ruleset document types.
//!
//! The ruleset is trusted input: every top-level key is optional and
//! defaults to empty, and nothing here validates cross-references. A rule
//! whose `stage` never appears in `execution_order` simply never fires.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::state::OutputCategory;

/// The externally supplied rule configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Version tag of the ruleset content.
    pub engine_version: String,
    /// Stage names in the only order that matters.
    pub execution_order: Vec<String>,
    /// Rules, selected per stage in the order listed here.
    pub rules: Vec<Rule>,
    /// Per-category maxima applied when shaping output.
    pub output_constraints: OutputConstraints,
    /// Narrative text keyed by template key.
    pub success_templates: BTreeMap<String, String>,
}

impl Ruleset {
    /// Rules belonging to `stage`, paired with their index in [`rules`](Self::rules).
    pub fn rules_in_stage<'a>(
        &'a self,
        stage: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.stage == stage)
    }

    /// Per-stage rule counts and stages that rules reference but
    /// `execution_order` never runs.
    pub fn stage_summary(&self) -> StageSummary {
        let stages = self
            .execution_order
            .iter()
            .map(|stage| StageCount {
                stage: stage.clone(),
                rule_count: self.rules_in_stage(stage).count(),
            })
            .collect();

        let mut orphan_stages: Vec<String> = Vec::new();
        for rule in &self.rules {
            if !self.execution_order.contains(&rule.stage) && !orphan_stages.contains(&rule.stage)
            {
                orphan_stages.push(rule.stage.clone());
            }
        }

        StageSummary {
            engine_version: self.engine_version.clone(),
            total_rules: self.rules.len(),
            stages,
            orphan_stages,
        }
    }
}

/// A single condition/effect rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Optional identifier, used only for tracing and explanations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stage tag this rule belongs to.
    pub stage: String,
    /// Condition; absent means always true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
    /// Effect; absent means no-op.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub then: Option<Effect>,
}

/// State patch applied when a rule matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    /// Lines added to `locked`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locked: Vec<String>,
    /// Lines added to `viable`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub viable: Vec<String>,
    /// Lines added to `actions`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    /// Lines added to `stop`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Lines added to `notes`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Suppression patch; only `true` values take effect.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub suppress: BTreeMap<String, bool>,
}

impl Effect {
    /// Lines this effect adds, per category, in category order.
    pub fn additions(&self) -> impl Iterator<Item = (OutputCategory, &[String])> {
        OutputCategory::ALL
            .into_iter()
            .map(|category| (category, self.lines(category)))
    }

    /// Lines this effect adds to one category.
    pub fn lines(&self, category: OutputCategory) -> &[String] {
        match category {
            OutputCategory::Locked => &self.locked,
            OutputCategory::Viable => &self.viable,
            OutputCategory::Actions => &self.actions,
            OutputCategory::Stop => &self.stop,
            OutputCategory::Notes => &self.notes,
        }
    }
}

/// Per-category maximum counts. Unset entries fall back to fixed defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConstraints {
    /// Maximum `locked` lines (default 7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_locked: Option<usize>,
    /// Maximum `viable` lines (default 6).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_viable: Option<usize>,
    /// Maximum `actions` lines after filtering (default 5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_actions: Option<usize>,
    /// Maximum `stop` lines (default 5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stop: Option<usize>,
    /// Maximum `notes` lines (default 8).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_notes: Option<usize>,
}

impl OutputConstraints {
    /// Default cap for `locked`.
    pub const DEFAULT_MAX_LOCKED: usize = 7;
    /// Default cap for `viable`.
    pub const DEFAULT_MAX_VIABLE: usize = 6;
    /// Default cap for `actions`.
    pub const DEFAULT_MAX_ACTIONS: usize = 5;
    /// Default cap for `stop`.
    pub const DEFAULT_MAX_STOP: usize = 5;
    /// Default cap for `notes`.
    pub const DEFAULT_MAX_NOTES: usize = 8;

    /// Effective cap for `category`.
    pub fn limit(&self, category: OutputCategory) -> usize {
        match category {
            OutputCategory::Locked => self.max_locked.unwrap_or(Self::DEFAULT_MAX_LOCKED),
            OutputCategory::Viable => self.max_viable.unwrap_or(Self::DEFAULT_MAX_VIABLE),
            OutputCategory::Actions => self.max_actions.unwrap_or(Self::DEFAULT_MAX_ACTIONS),
            OutputCategory::Stop => self.max_stop.unwrap_or(Self::DEFAULT_MAX_STOP),
            OutputCategory::Notes => self.max_notes.unwrap_or(Self::DEFAULT_MAX_NOTES),
        }
    }
}

/// Stage layout of a ruleset, for inspection tooling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    /// Ruleset version tag.
    pub engine_version: String,
    /// Total number of rules, including orphans.
    pub total_rules: usize,
    /// Declared stages in execution order.
    pub stages: Vec<StageCount>,
    /// Stages referenced by rules but absent from `execution_order`.
    pub orphan_stages: Vec<String>,
}

/// Number of rules selected by one declared stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    /// Stage name.
    pub stage: String,
    /// Rules with this stage tag.
    pub rule_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Ruleset {
        serde_json::from_value(json!({
            "engine_version": "2.1",
            "execution_order": ["gates", "routing"],
            "rules": [
                {"stage": "routing", "then": {"viable": ["CSU"]}},
                {"stage": "gates", "id": "g1"},
                {"stage": "draft", "then": {"notes": ["unused"]}},
                {"stage": "routing"},
                {"stage": "draft"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn empty_document_defaults() {
        let ruleset: Ruleset = serde_json::from_str("{}").unwrap();
        assert!(ruleset.execution_order.is_empty());
        assert!(ruleset.rules.is_empty());
        assert!(ruleset.success_templates.is_empty());
        assert_eq!(ruleset.output_constraints, OutputConstraints::default());
    }

    #[test]
    fn rule_without_when_or_then() {
        let ruleset = sample();
        let rule = &ruleset.rules[1];
        assert_eq!(rule.id.as_deref(), Some("g1"));
        assert!(rule.when.is_none());
        assert!(rule.then.is_none());
    }

    #[test]
    fn rules_in_stage_keeps_listing_order() {
        let ruleset = sample();
        let indices: Vec<usize> = ruleset.rules_in_stage("routing").map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_eq!(ruleset.rules_in_stage("missing").count(), 0);
    }

    #[test]
    fn stage_summary_reports_orphans_once() {
        let summary = sample().stage_summary();
        assert_eq!(summary.engine_version, "2.1");
        assert_eq!(summary.total_rules, 5);
        assert_eq!(
            summary.stages,
            vec![
                StageCount {
                    stage: "gates".into(),
                    rule_count: 1
                },
                StageCount {
                    stage: "routing".into(),
                    rule_count: 2
                },
            ]
        );
        assert_eq!(summary.orphan_stages, vec!["draft".to_string()]);
    }

    #[test]
    fn effect_additions_cover_every_category() {
        let effect: Effect = serde_json::from_value(json!({
            "locked": ["L"],
            "notes": ["N1", "N2"],
            "suppress": {"ap": true}
        }))
        .unwrap();
        let counts: Vec<(OutputCategory, usize)> =
            effect.additions().map(|(c, lines)| (c, lines.len())).collect();
        assert_eq!(
            counts,
            vec![
                (OutputCategory::Locked, 1),
                (OutputCategory::Viable, 0),
                (OutputCategory::Actions, 0),
                (OutputCategory::Stop, 0),
                (OutputCategory::Notes, 2),
            ]
        );
        assert_eq!(effect.suppress.get("ap"), Some(&true));
    }

    #[test]
    fn constraint_defaults_and_overrides() {
        let defaults = OutputConstraints::default();
        assert_eq!(defaults.limit(OutputCategory::Locked), 7);
        assert_eq!(defaults.limit(OutputCategory::Viable), 6);
        assert_eq!(defaults.limit(OutputCategory::Actions), 5);
        assert_eq!(defaults.limit(OutputCategory::Stop), 5);
        assert_eq!(defaults.limit(OutputCategory::Notes), 8);

        let custom: OutputConstraints =
            serde_json::from_value(json!({"max_locked": 3, "max_stop": 0})).unwrap();
        assert_eq!(custom.limit(OutputCategory::Locked), 3);
        assert_eq!(custom.limit(OutputCategory::Stop), 0);
        assert_eq!(custom.limit(OutputCategory::Viable), 6);
    }
}
