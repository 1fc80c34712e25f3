//! Evaluation context and dotted-path field lookup.
//!
//! A field path is `<namespace>.<segment>...` where the namespace is one of
//! `input`, `derived` or `state`. Any other root, or any missing segment
//! along the way, resolves to undefined (`None`).

use serde_json::Value;

use crate::derived::DerivedFacts;
use crate::state::EngineState;
use crate::types::StudentInput;

/// Root namespaces a field path may start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Input,
    Derived,
    State,
}

impl Namespace {
    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "input" => Some(Self::Input),
            "derived" => Some(Self::Derived),
            "state" => Some(Self::State),
            _ => None,
        }
    }
}

/// Everything a rule condition can see during one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    /// JSON view of the input record. Immutable for the evaluation.
    pub input: Value,
    /// Facts derived before any rule runs.
    pub derived: DerivedFacts,
    /// Accumulated effects of every rule fired so far.
    pub state: EngineState,
}

impl EvaluationContext {
    /// Fresh context for an input: derived facts computed, empty state.
    pub fn new(input: &StudentInput) -> Self {
        Self {
            input: input.to_value(),
            derived: DerivedFacts::compute(input),
            state: EngineState::default(),
        }
    }

    /// Resolve a dotted field path, or `None` if any step is absent.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let namespace = Namespace::parse(segments.next()?)?;
        match namespace {
            Namespace::Input => descend(&self.input, segments).cloned(),
            Namespace::Derived => {
                let head = self.derived.get(segments.next()?)?;
                descend(&head, segments).cloned()
            }
            Namespace::State => {
                let head = self.state.get(segments.next()?)?;
                descend(&head, segments).cloned()
            }
        }
    }

    /// Whether the list at `path` contains the string `needle`.
    pub fn list_contains(&self, path: &str, needle: &str) -> bool {
        self.resolve(path)
            .as_ref()
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(needle)))
    }
}

/// Walk object keys (and numeric array indices) from `root`.
fn descend<'v, 'p>(
    root: &'v Value,
    mut segments: impl Iterator<Item = &'p str>,
) -> Option<&'v Value> {
    segments.try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
