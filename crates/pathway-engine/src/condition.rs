//! Rule conditions.
//!
//! A condition is either a leaf comparison `{field, operator, operand}` or
//! an `{all: [...]}` / `{any: [...]}` combinator. Anything else parses into
//! [`Condition::Unrecognized`], which evaluates to `false`. Evaluation
//! never fails.
//!
//! Leaf keys accept `op` for `operator` and `value` for `operand`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::EvaluationContext;

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Strict equality.
    Eq,
    /// Resolved value is an element of the operand list.
    In,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Resolved list contains the operand.
    Contains,
    /// Presence (operand `true`, or omitted) or absence (operand `false`).
    Exists,
}

impl Operator {
    /// Operator for a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::Eq),
            "in" => Some(Self::In),
            "gte" => Some(Self::Gte),
            "contains" => Some(Self::Contains),
            "exists" => Some(Self::Exists),
            _ => None,
        }
    }

    /// Wire name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::In => "in",
            Self::Gte => "gte",
            Self::Contains => "contains",
            Self::Exists => "exists",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf comparison between a context field and an operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Dotted path into `input`, `derived` or `state`.
    pub field: String,
    /// How to compare.
    pub operator: Operator,
    /// Right-hand side. `Null` when the document omitted it.
    pub operand: Value,
}

impl Comparison {
    /// Evaluate against `ctx`.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        let resolved = ctx.resolve(&self.field);
        match self.operator {
            Operator::Exists => {
                let present = resolved.as_ref().is_some_and(is_present);
                present == self.operand.as_bool().unwrap_or(true)
            }
            Operator::Eq => resolved.is_some_and(|value| strict_eq(&value, &self.operand)),
            Operator::In => match (&resolved, &self.operand) {
                (Some(value), Value::Array(options)) => {
                    options.iter().any(|option| strict_eq(value, option))
                }
                _ => false,
            },
            Operator::Gte => match (resolved.as_ref().and_then(number), number(&self.operand)) {
                (Some(lhs), Some(rhs)) => lhs >= rhs,
                _ => false,
            },
            Operator::Contains => match &resolved {
                Some(Value::Array(items)) => items.iter().any(|item| strict_eq(item, &self.operand)),
                _ => false,
            },
        }
    }
}

/// A boolean expression over an [`EvaluationContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Every child must hold; an empty list holds.
    All(Vec<Condition>),
    /// At least one child must hold; an empty list does not.
    Any(Vec<Condition>),
    /// Leaf comparison.
    Compare(Comparison),
    /// A shape matching none of the above. Always `false`.
    Unrecognized(Value),
}

impl Condition {
    /// Evaluate against `ctx`, short-circuiting combinators.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        match self {
            Self::All(children) => children.iter().all(|child| child.evaluate(ctx)),
            Self::Any(children) => children.iter().any(|child| child.evaluate(ctx)),
            Self::Compare(comparison) => comparison.evaluate(ctx),
            Self::Unrecognized(_) => false,
        }
    }

    /// Parse a recognized shape. Children that fail to parse become
    /// `Unrecognized` in place rather than failing the parent.
    fn parse(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        if let Some(children) = map.get("all") {
            return Some(Self::All(parse_children(children)?));
        }
        if let Some(children) = map.get("any") {
            return Some(Self::Any(parse_children(children)?));
        }
        parse_comparison(map).map(Self::Compare)
    }
}

fn parse_children(value: &Value) -> Option<Vec<Condition>> {
    let items = value.as_array()?;
    Some(items.iter().cloned().map(Condition::from).collect())
}

fn parse_comparison(map: &Map<String, Value>) -> Option<Comparison> {
    let field = map.get("field")?.as_str()?;
    let operator = map
        .get("operator")
        .or_else(|| map.get("op"))?
        .as_str()
        .and_then(Operator::from_name)?;
    let operand = map
        .get("operand")
        .or_else(|| map.get("value"))
        .cloned()
        .unwrap_or(Value::Null);

    // `exists` takes a boolean selector or nothing at all.
    if operator == Operator::Exists && !(operand.is_boolean() || operand.is_null()) {
        return None;
    }

    Some(Comparison {
        field: field.to_owned(),
        operator,
        operand,
    })
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        match Self::parse(&value) {
            Some(condition) => condition,
            None => Self::Unrecognized(value),
        }
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::All(children) => serde_json::json!({
                "all": children.into_iter().map(Value::from).collect::<Vec<_>>()
            }),
            Condition::Any(children) => serde_json::json!({
                "any": children.into_iter().map(Value::from).collect::<Vec<_>>()
            }),
            Condition::Compare(comparison) => {
                let mut map = Map::new();
                let _ = map.insert("field".into(), Value::String(comparison.field));
                let _ = map.insert(
                    "operator".into(),
                    Value::from(comparison.operator.as_str()),
                );
                if !comparison.operand.is_null() {
                    let _ = map.insert("operand".into(), comparison.operand);
                }
                Value::Object(map)
            }
            Condition::Unrecognized(raw) => raw,
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Present means defined, not `null`, and not an empty list.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// JSON equality where numbers compare by value, so `3` equals `3.0`.
#[allow(clippy::float_cmp)]
fn strict_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => lhs == rhs,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
