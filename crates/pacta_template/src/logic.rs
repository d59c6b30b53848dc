//! Contract logic carried by a template: an ordered rule list, dispatched
//! on the incoming request's `$class` by the execution engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Request class this rule fires on (first match wins).
    pub on: String,
    /// State mutations, applied in order.
    #[serde(default)]
    pub update: Vec<UpdateStep>,
    /// Response block; a rule without one responds with an empty object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respond: Option<Respond>,
    /// Events emitted when the rule fires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emit: Vec<EmitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStep {
    /// State class field the step writes to.
    pub target: String,
    pub op: Op,
    pub source: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Set,
    Add,
    Sub,
    Mul,
}

/// A rule operand: either a path reference into the execution context
/// (`{"path": "state.value"}`) or a literal JSON value. An object literal
/// with a single `path` key is always read as a reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Path { path: String },
    Literal(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Respond {
    /// Response class; when set, the built response is validated against it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Operand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitSpec {
    pub class: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Operand>,
}
