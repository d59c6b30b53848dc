//! Unified API error type — every 4xx/5xx response is JSON with a
//! consistent shape.
//!
//! ```json
//! { "code": "not_deployed", "message": "no active contract 'C1': ..." }
//! ```

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pacta_adapter::ChaincodeError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: msg.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: format!("{resource} not found"),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: msg.into(),
        }
    }
}

/// Failed invocations map onto transaction-rejection responses: caller
/// mistakes are 4xx, contract-content problems are 422, and only
/// infrastructure faults surface as 5xx.
impl From<ChaincodeError> for AppError {
    fn from(err: ChaincodeError) -> Self {
        let status = match &err {
            ChaincodeError::ArgumentCount { .. }
            | ChaincodeError::UnknownFunction(_)
            | ChaincodeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ChaincodeError::TemplateDecode(_)
            | ChaincodeError::ClauseParse(_)
            | ChaincodeError::StateSchema(_)
            | ChaincodeError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChaincodeError::NotDeployed { .. } => StatusCode::NOT_FOUND,
            ChaincodeError::Record { .. }
            | ChaincodeError::Json(_)
            | ChaincodeError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code,
            message: self.message,
        };
        let mut resp = (self.status, Json(body)).into_response();
        resp.headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        resp
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.status.as_u16(),
            self.code,
            self.message
        )
    }
}

impl std::error::Error for AppError {}
