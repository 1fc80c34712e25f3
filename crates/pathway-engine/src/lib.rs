//! # pathway-engine
//!
//! Deterministic, declarative recommendation engine.
//!
//! - Rules are `{stage, when, then}` records loaded from a JSON ruleset
//! - Stages run in the ruleset's declared `execution_order`
//! - Effects accumulate into five duplicate-free categories plus a set of
//!   monotonic suppression flags
//! - Output shaping filters suppressed lines and truncates each category
//! - A fixed priority table picks one success narrative
//!
//! Evaluation is total: malformed conditions degrade to `false`, missing
//! templates fall back to a generic sentence, and nothing in the
//! evaluation path returns an error. Only the file loaders in [`loader`]
//! are fallible.

#![deny(unsafe_code)]

pub mod condition;
pub mod constraints;
pub mod context;
pub mod derived;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod state;
pub mod success;
pub mod types;

pub use condition::{Comparison, Condition, Operator};
pub use constraints::shape;
pub use context::EvaluationContext;
pub use derived::{DerivedFacts, GpaBand, TimeWindow};
pub use engine::{Evaluation, FiredRule, RuleEngine, recommend};
pub use errors::{EngineError, Result};
pub use loader::{load_input, load_ruleset, parse_input};
pub use state::{EngineState, OutputAccumulator, OutputCategory, SuppressionState};
pub use success::{FALLBACK_SUCCESS_TEXT, TemplateKey, select_template};
pub use types::{
    CategorizedOutputs, Effect, OutputConstraints, Recommendation, Rule, Ruleset, StageCount,
    StageSummary, StudentInput,
};
