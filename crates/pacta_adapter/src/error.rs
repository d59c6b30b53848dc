use pacta_engine::EngineError;
use pacta_ledger::LedgerError;
use pacta_template::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChaincodeError {
    #[error("{op}: incorrect number of arguments, expected {expected}, got {got}")]
    ArgumentCount {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("received unknown function '{0}'")]
    UnknownFunction(String),
    #[error("template archive: {0}")]
    TemplateDecode(#[source] TemplateError),
    #[error("clause text: {0}")]
    ClauseParse(#[source] TemplateError),
    #[error("initial state: {0}")]
    StateSchema(#[source] TemplateError),
    #[error("no active contract '{contract_id}': missing record '{key}', ensure it has been deployed")]
    NotDeployed { contract_id: String, key: String },
    #[error("request: {0}")]
    BadRequest(String),
    #[error("ledger record '{key}' is corrupt: {detail}")]
    Record { key: String, detail: String },
    #[error("engine: {0}")]
    Engine(#[from] EngineError),
    #[error("serialize: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ChaincodeError {
    /// Stable machine-readable code, used by hosts when translating a
    /// failure into their response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ChaincodeError::ArgumentCount { .. } => "argument_count",
            ChaincodeError::UnknownFunction(_) => "unknown_function",
            ChaincodeError::TemplateDecode(_) => "template_decode",
            ChaincodeError::ClauseParse(_) => "clause_parse",
            ChaincodeError::StateSchema(_) => "state_schema",
            ChaincodeError::NotDeployed { .. } => "not_deployed",
            ChaincodeError::BadRequest(_) => "bad_request",
            ChaincodeError::Record { .. } => "record_corrupt",
            ChaincodeError::Engine(_) => "engine_execution",
            ChaincodeError::Json(_) => "serialize",
            ChaincodeError::Ledger(_) => "ledger",
        }
    }
}

pub type Result<T> = std::result::Result<T, ChaincodeError>;
