// Errors raised while talking to the extension host
// They never leave the worker: listeners log and drop them

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// A host API call rejected or threw
    #[error("host call failed: {0}")]
    Js(String),

    /// A payload could not be converted to or from JSON
    #[error("invalid host payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
