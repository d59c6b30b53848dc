use pacta_template::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("clause has no bound data")]
    UnboundClause,
    #[error("request: {0}")]
    BadRequest(String),
    #[error("no rule matches request class '{class}'")]
    NoDispatch { class: String },
    #[error("path '{path}' cannot be resolved")]
    Path { path: String },
    #[error("field '{field}': operand is not numeric")]
    Numeric { field: String },
    #[error("field '{field}': numeric overflow")]
    Overflow { field: String },
    #[error(transparent)]
    Schema(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
