use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use pacta_adapter::Invocation;
use pacta_config::BASE_URL;
use serde::Deserialize;
use serde_json::{json, Value};

/// Raw invocation surface: exactly what a host runtime would route.
pub async fn invoke(
    State(state): State<AppState>,
    Json(invocation): Json<Invocation>,
) -> Result<Json<Value>, AppError> {
    let payload = pacta_adapter::invoke(&state.ledger, &invocation).await?;
    let response = decode_payload(&payload)?;
    Ok(Json(json!({"ok": true, "payload": response})))
}

#[derive(Debug, Deserialize)]
pub struct DeployReq {
    pub contract_id: String,
    pub template_b64: String,
    pub clause_text: String,
    pub initial_state: Value,
}

pub async fn deploy(
    State(state): State<AppState>,
    Json(req): Json<DeployReq>,
) -> Result<Json<Value>, AppError> {
    let params = vec![
        req.contract_id.clone(),
        req.template_b64,
        req.clause_text,
        req.initial_state.to_string(),
    ];
    pacta_adapter::deploy(&state.ledger, &params).await?;
    Ok(Json(json!({
        "ok": true,
        "contract_id": req.contract_id,
        "state_url": format!("{}/v1/state/{}-State", BASE_URL.as_str(), req.contract_id),
    })))
}

#[derive(Debug, Deserialize)]
pub struct ExecuteReq {
    pub contract_id: String,
    pub request: Value,
}

pub async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteReq>,
) -> Result<Json<Value>, AppError> {
    let params = vec![req.contract_id, req.request.to_string()];
    let payload = pacta_adapter::execute(&state.ledger, &params).await?;
    Ok(Json(decode_payload(&payload)?))
}

/// Operational inspection of a raw ledger record.
pub async fn get_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let bytes = state
        .ledger
        .record(&key)
        .ok_or_else(|| AppError::not_found("ledger record"))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => Ok(Json(value).into_response()),
        // the template record holds base64 text, not JSON
        Err(_) => Ok(String::from_utf8_lossy(&bytes).into_owned().into_response()),
    }
}

pub async fn get_events(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.ledger.events()))
}

fn decode_payload(payload: &[u8]) -> Result<Value, AppError> {
    if payload.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(payload)
        .map_err(|e| AppError::internal(format!("response payload decode: {e}")))
}
