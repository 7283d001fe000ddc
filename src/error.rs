use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be a boolean flag (1/0, true/false, yes/no, on/off), got '{value}'")]
    InvalidFlag { var: &'static str, value: String },
    #[error("{0}")]
    Invalid(String),
}

/// Failure to read one `code-suggestions` fence. Always absorbed by the caller.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("code-suggestions block is not a JSON array of suggestions: {0}")]
    Json(#[from] serde_json::Error),
}
