/// Serializable envelopes written by the CLI.
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `CatalogError`.
    #[must_use]
    pub fn from_catalog_error(err: &CatalogError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_envelope() {
        let err = CatalogError::NodeNotFound {
            node: "doesnotexist".to_owned(),
        };
        let value = serde_json::to_value(ErrorOutput::from_catalog_error(&err)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ok": false,
                "error": {"code": "node_not_found", "message": "Couldn't find node doesnotexist"}
            })
        );
    }
}
