use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("archive: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("archive manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("grammar: {0}")]
    Grammar(String),
    #[error("model: {0}")]
    Model(String),
    #[error("clause text at byte {at}: expected {expected}")]
    Parse { at: usize, expected: String },
    #[error("clause text: '{raw}' is not a valid {ty} for field '{field}'")]
    Convert {
        field: String,
        ty: &'static str,
        raw: String,
    },
    #[error("schema: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
