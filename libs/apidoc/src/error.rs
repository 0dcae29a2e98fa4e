use thiserror::Error;

use crate::method::Method;

/// Rejected status code string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status code '{0}': expected a leading digit 1-5 followed by digits or a wildcard family (e.g. 200, 4XX)")]
pub struct InvalidStatusCode(pub String);

/// Errors raised while turning the accumulated routes into a final document.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("shared schema '{name}' registered twice with different shapes")]
    SchemaConflict { name: String },

    #[error("{location} parameters of {method} {path} must be described by an object schema")]
    ParametersNotObject {
        path: String,
        method: Method,
        location: &'static str,
    },

    #[error("operation {method} {path} registered more than once")]
    DuplicateOperation { path: String, method: Method },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
