use grinner_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("empty key size")]
    Empty,

    #[error("unrecognized key size \"{token}\"")]
    Unrecognized { token: String },

    #[error("key size \"{token}\" must be greater than zero")]
    NonPositive { token: String },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("saved parameters are not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("saved parameters must be a JSON object")]
    NotAnObject,

    #[error("saved parameters have no format version")]
    MissingVersion,

    #[error("unsupported saved parameter format version {found}")]
    UnsupportedVersion { found: String },

    #[error("malformed saved parameters (format {version}): {source}")]
    Field {
        version: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("saved key width {value} at index {index} is not a positive number")]
    Width { index: usize, value: f64 },

    #[error("saved parameters are out of range: {0}")]
    Params(#[from] ConfigError),
}
