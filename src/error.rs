//! Error types for the upload bridge.

use thiserror::Error;

/// Everything that can go wrong between receiving raw data and returning
/// the platform's response.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Batch size outside the platform's accepted range
    #[error("batch size must be between 1 and 1000, got {0}")]
    BatchSize(usize),

    /// Variant name not present in the registry
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// No declared shape takes the first row's field count
    #[error("no shape of variant {variant} takes {arity} fields")]
    NoMatchingShape { variant: String, arity: usize },

    /// Positional row is not a JSON array (1-based index)
    #[error("row {0} is not an array")]
    RowNotArray(usize),

    /// JSON upload element is not a JSON object (1-based index)
    #[error("element {0} is not an object")]
    ElementNotObject(usize),

    /// A value could not be converted to its field's declared type
    #[error("cannot coerce field {field}: {reason}")]
    Coerce { field: String, reason: String },

    /// Every row was filtered out before submission
    #[error("nothing to transmit")]
    NoRecords,

    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Service {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl UploadError {
    /// Text form handed back across the bridge. The `"ERROR"` prefix is the
    /// only failure signal the caller can check for.
    pub fn to_response_text(&self) -> String {
        format!("ERROR - {}", self)
    }
}
