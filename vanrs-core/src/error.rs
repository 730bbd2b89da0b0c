use hf_hub::api::sync::ApiError as HFHubApiError;
use thiserror::Error;

use crate::utils::tokens::TokenRetrievalError;

/// Errors raised while reading, writing or resolving configurations.
///
/// Constructing a configuration never fails. These errors only come from the
/// serialization, file and Hub layers, or from the opt-in stage check.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IoError: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("HF API error occurred: {0:?}")]
    HubApi(#[from] HFHubApiError),

    #[error("Could not retrieve HF API token: {0:?}")]
    Token(#[from] TokenRetrievalError),

    #[error("Unable to load {path} file from {model_id} repo.")]
    FileNotFound { model_id: String, path: String },

    #[error("Expected a JSON object for a configuration, found {0}.")]
    NotAnObject(&'static str),

    #[error("Unknown model type `{model_type}`. Possible model types: {known}.")]
    UnknownModelType { model_type: String, known: String },

    #[error("Unsupported architecture class `{0}`.")]
    UnknownArchitecture(String),

    #[error("Stage field `{field}` has {found} entries but `hidden_sizes` has {expected}.")]
    StageLengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
