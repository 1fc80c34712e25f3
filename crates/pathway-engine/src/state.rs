//! Mutable evaluation state: output accumulators and suppression flags.
//!
//! Both halves only grow. Accumulators never hold the same line twice and
//! keep first-insertion order; suppression flags go from `false` to `true`
//! and never back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::types::Effect;

/// Suppression flags every evaluation starts with, all `false`.
pub const SUPPRESSION_FLAGS: [&str; 7] = [
    "cc",
    "ap",
    "middle_college",
    "testing",
    "internships",
    "extracurriculars",
    "essays",
];

/// One of the five output categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    /// Options that are effectively decided.
    Locked,
    /// Options still open.
    Viable,
    /// Recommended next steps.
    Actions,
    /// Things to stop doing.
    Stop,
    /// Free-form notes.
    Notes,
}

impl OutputCategory {
    /// Every category, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Locked,
        Self::Viable,
        Self::Actions,
        Self::Stop,
        Self::Notes,
    ];

    /// Category for a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "locked" => Some(Self::Locked),
            "viable" => Some(Self::Viable),
            "actions" => Some(Self::Actions),
            "stop" => Some(Self::Stop),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }

    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Viable => "viable",
            Self::Actions => "actions",
            Self::Stop => "stop",
            Self::Notes => "notes",
        }
    }
}

impl std::fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free list of output lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputAccumulator {
    items: Vec<String>,
}

impl OutputAccumulator {
    /// Append `line` unless it is already present.
    ///
    /// Returns `true` if the line was added.
    pub fn push(&mut self, line: &str) -> bool {
        if self.items.iter().any(|existing| existing == line) {
            return false;
        }
        self.items.push(line.to_owned());
        true
    }

    /// Append every line in order, skipping duplicates.
    pub fn extend<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            let _ = self.push(line);
        }
    }

    /// Current lines.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no lines have been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Monotonic map of suppression flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuppressionState {
    flags: BTreeMap<String, bool>,
}

impl Default for SuppressionState {
    fn default() -> Self {
        Self {
            flags: SUPPRESSION_FLAGS
                .iter()
                .map(|flag| ((*flag).to_owned(), false))
                .collect(),
        }
    }
}

impl SuppressionState {
    /// Whether `flag` has been set.
    pub fn is_suppressed(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    /// Set `flag` to `true`.
    pub fn suppress(&mut self, flag: &str) {
        let _ = self.flags.insert(flag.to_owned(), true);
    }

    /// Merge a patch. `true` entries are set; `false` entries are ignored.
    pub fn merge(&mut self, patch: &BTreeMap<String, bool>) {
        for (flag, &value) in patch {
            if value {
                self.suppress(flag);
            } else {
                trace!(flag = %flag, "ignoring false suppression patch");
            }
        }
    }

    /// Flags currently set, in name order.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, set)| **set)
            .map(|(flag, _)| flag.as_str())
    }

    /// JSON object of every known flag.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.flags
                .iter()
                .map(|(flag, set)| (flag.clone(), Value::Bool(*set)))
                .collect(),
        )
    }
}

/// The `state` namespace of an evaluation context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// `locked` lines.
    pub locked: OutputAccumulator,
    /// `viable` lines.
    pub viable: OutputAccumulator,
    /// `actions` lines.
    pub actions: OutputAccumulator,
    /// `stop` lines.
    pub stop: OutputAccumulator,
    /// `notes` lines.
    pub notes: OutputAccumulator,
    /// Suppression flags.
    pub suppress: SuppressionState,
}

impl EngineState {
    /// Accumulator for one category.
    pub fn accumulator(&self, category: OutputCategory) -> &OutputAccumulator {
        match category {
            OutputCategory::Locked => &self.locked,
            OutputCategory::Viable => &self.viable,
            OutputCategory::Actions => &self.actions,
            OutputCategory::Stop => &self.stop,
            OutputCategory::Notes => &self.notes,
        }
    }

    /// Mutable accumulator for one category.
    pub fn accumulator_mut(&mut self, category: OutputCategory) -> &mut OutputAccumulator {
        match category {
            OutputCategory::Locked => &mut self.locked,
            OutputCategory::Viable => &mut self.viable,
            OutputCategory::Actions => &mut self.actions,
            OutputCategory::Stop => &mut self.stop,
            OutputCategory::Notes => &mut self.notes,
        }
    }

    /// Apply an effect and return the next state.
    #[must_use]
    pub fn reduce(mut self, effect: &Effect) -> Self {
        for (category, lines) in effect.additions() {
            self.accumulator_mut(category)
                .extend(lines.iter().map(String::as_str));
        }
        self.suppress.merge(&effect.suppress);
        self
    }

    /// Value of `state.<segment>`: a category list or the `suppress` map.
    pub fn get(&self, segment: &str) -> Option<Value> {
        if segment == "suppress" {
            return Some(self.suppress.to_value());
        }
        let category = OutputCategory::from_name(segment)?;
        Some(Value::from(self.accumulator(category).as_slice().to_vec()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
