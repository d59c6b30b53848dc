use crate::error::{EngineError, Result};
use pacta_template::{Clause, EmitSpec, Op, Operand, Respond, Serializer, CLASS_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one engine call: the successor state, the response payload,
/// and the events the fired rule emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    pub state: Value,
    pub response: Value,
    pub emit: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Dispatch `request` to the first template rule whose `on` class
    /// matches the request's `$class`, apply its state updates, and build
    /// its response and emitted events.
    ///
    /// Update steps see the working state: a later step observes the
    /// writes of an earlier one, and response/emit fields resolve against
    /// the updated state. The returned state is validated against the
    /// template's state class, so persisted state stays schema-valid.
    pub fn execute(
        &self,
        clause: &Clause<'_>,
        request: &Value,
        state: &Value,
    ) -> Result<EngineResult> {
        let template = clause.template();
        let data = clause.data().ok_or(EngineError::UnboundClause)?;
        let request_class = request
            .get(CLASS_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| EngineError::BadRequest("missing '$class' tag".into()))?;
        let rule = template
            .logic()
            .iter()
            .find(|r| r.on == request_class)
            .ok_or_else(|| EngineError::NoDispatch {
                class: request_class.to_string(),
            })?;

        let serializer = template.serializer();
        serializer.validate(request, request_class)?;
        let mut state = serializer.validate(state, template.state_class())?;

        for step in &rule.update {
            let source = resolve(&step.source, &state, request, data)?;
            let slot = state.get_mut(&step.target).ok_or_else(|| EngineError::Path {
                path: format!("state.{}", step.target),
            })?;
            *slot = match step.op {
                Op::Set => source,
                op => combine(op, slot, &source, &step.target)?,
            };
        }
        let state = serializer.validate(&state, template.state_class())?;

        let response = build_response(rule.respond.as_ref(), &serializer, &state, request, data)?;
        let emit = rule
            .emit
            .iter()
            .map(|spec| build_emit(spec, &state, request, data))
            .collect::<Result<Vec<_>>>()?;

        Ok(EngineResult {
            state,
            response,
            emit,
        })
    }
}

fn build_response(
    respond: Option<&Respond>,
    serializer: &Serializer<'_>,
    state: &Value,
    request: &Value,
    data: &Value,
) -> Result<Value> {
    let Some(respond) = respond else {
        // A rule without a respond block acknowledges with an empty object.
        return Ok(Value::Object(Map::new()));
    };
    let mut obj = Map::new();
    if let Some(class) = &respond.class {
        obj.insert(CLASS_FIELD.to_string(), Value::String(class.clone()));
    }
    for (name, operand) in &respond.fields {
        obj.insert(name.clone(), resolve(operand, state, request, data)?);
    }
    let response = Value::Object(obj);
    if let Some(class) = &respond.class {
        serializer.validate(&response, class)?;
    }
    Ok(response)
}

fn build_emit(spec: &EmitSpec, state: &Value, request: &Value, data: &Value) -> Result<Value> {
    let mut obj = Map::new();
    obj.insert(CLASS_FIELD.to_string(), Value::String(spec.class.clone()));
    for (name, operand) in &spec.fields {
        obj.insert(name.clone(), resolve(operand, state, request, data)?);
    }
    Ok(Value::Object(obj))
}

fn resolve(operand: &Operand, state: &Value, request: &Value, data: &Value) -> Result<Value> {
    match operand {
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Path { path } => {
            let mut parts = path.split('.');
            let mut current = match parts.next() {
                Some("state") => state,
                Some("request") => request,
                Some("data") => data,
                _ => return Err(EngineError::Path { path: path.clone() }),
            };
            for part in parts {
                current = current.get(part).ok_or_else(|| EngineError::Path {
                    path: path.clone(),
                })?;
            }
            Ok(current.clone())
        }
    }
}

fn combine(op: Op, lhs: &Value, rhs: &Value, field: &str) -> Result<Value> {
    if let (Some(a), Some(b)) = (lhs.as_i64(), rhs.as_i64()) {
        let n = match op {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
            Op::Set => Some(b),
        }
        .ok_or_else(|| EngineError::Overflow {
            field: field.to_string(),
        })?;
        return Ok(Value::from(n));
    }
    let numeric = |v: &Value| {
        v.as_f64().ok_or_else(|| EngineError::Numeric {
            field: field.to_string(),
        })
    };
    let (a, b) = (numeric(lhs)?, numeric(rhs)?);
    let n = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Set => b,
    };
    if !n.is_finite() {
        return Err(EngineError::Overflow {
            field: field.to_string(),
        });
    }
    Ok(Value::from(n))
}
