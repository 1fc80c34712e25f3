//! Staged rule evaluation.
//!
//! For each stage in `execution_order`, every rule tagged with that stage
//! is evaluated in listing order against the current context. A matching
//! rule's effect is folded into the state immediately, so later rules in
//! the same stage and in later stages see it. Every matching rule fires;
//! there is no early exit.

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::constraints::shape;
use crate::context::EvaluationContext;
use crate::success::select_template;
use crate::types::{Recommendation, Rule, Ruleset, StudentInput};

/// A rule that matched during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiredRule {
    /// Stage the rule ran in.
    pub stage: String,
    /// Index of the rule in the ruleset's `rules` list.
    pub rule_index: usize,
    /// Rule ID, if the ruleset gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

/// Outcome of running every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Final context, including accumulated state.
    pub context: EvaluationContext,
    /// Rules that matched, in firing order.
    pub fired: Vec<FiredRule>,
}

/// Runs a ruleset's stages over one input at a time.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'r> {
    ruleset: &'r Ruleset,
}

impl<'r> RuleEngine<'r> {
    /// Create an engine over `ruleset`.
    pub fn new(ruleset: &'r Ruleset) -> Self {
        Self { ruleset }
    }

    /// Evaluate every stage for `input` with a fresh context.
    pub fn run(&self, input: &StudentInput) -> Evaluation {
        let span = debug_span!("rule_engine", engine_version = %self.ruleset.engine_version);
        let _enter = span.enter();

        let mut context = EvaluationContext::new(input);
        let mut fired = Vec::new();

        for stage in &self.ruleset.execution_order {
            let before = fired.len();
            for (rule_index, rule) in self.ruleset.rules_in_stage(stage) {
                if Self::step(&mut context, rule) {
                    debug!(stage = %stage, rule_index, rule_id = ?rule.id, "rule fired");
                    fired.push(FiredRule {
                        stage: stage.clone(),
                        rule_index,
                        rule_id: rule.id.clone(),
                    });
                } else {
                    trace!(stage = %stage, rule_index, rule_id = ?rule.id, "rule skipped");
                }
            }
            debug!(stage = %stage, fired = fired.len() - before, "stage complete");
        }

        Evaluation { context, fired }
    }

    /// Evaluate one rule and fold its effect into the state if it matches.
    fn step(context: &mut EvaluationContext, rule: &Rule) -> bool {
        let matched = rule
            .when
            .as_ref()
            .is_none_or(|condition| condition.evaluate(context));
        if matched {
            if let Some(effect) = &rule.then {
                context.state = std::mem::take(&mut context.state).reduce(effect);
            }
        }
        matched
    }
}

impl Evaluation {
    /// Select the success template and shape the accumulated outputs.
    pub fn into_recommendation(self, ruleset: &Ruleset) -> Recommendation {
        let Self { context, fired } = self;

        let template_key = select_template(&context);
        let success_text = template_key.text(&ruleset.success_templates).to_owned();
        debug!(template_key = %template_key, fired = fired.len(), "success template selected");

        let EvaluationContext { derived, state, .. } = context;
        Recommendation {
            outputs: shape(state, &ruleset.output_constraints),
            template_key,
            success_text,
            gpa_band: derived.gpa_band,
            time_window: derived.time_window,
        }
    }
}

/// Run the full pipeline: rules, template selection, output shaping.
pub fn recommend(ruleset: &Ruleset, input: &StudentInput) -> Recommendation {
    RuleEngine::new(ruleset).run(input).into_recommendation(ruleset)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
