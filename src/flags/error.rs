use thiserror::Error;

/// Failures raised while evaluating or loading flags.
///
/// The resolver absorbs every one of these into the caller's default value; they only
/// escape at startup, when a flag file cannot be loaded.
#[derive(Debug, Error)]
pub enum FlagError {
    #[error("flag '{0}' not found")]
    FlagNotFound(String),

    #[error("flag '{flag_key}' resolved to a {actual} value, expected {expected}")]
    TypeMismatch {
        flag_key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("flag '{0}' is disabled")]
    Disabled(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("flag backend returned {code}: {details}")]
    Backend { code: String, details: String },

    #[error("invalid definition for flag '{flag_key}': {message}")]
    InvalidDefinition { flag_key: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
