/// Errors from the catalog domain layer.
use thiserror::Error;

use crate::terminus::TerminusError;

/// Errors that can occur while resolving a node and displaying its catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The classifier has no node by that name.
    #[error("Couldn't find node {node}")]
    NodeNotFound {
        /// The requested node name.
        node: String,
    },

    /// The configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The compiled catalog does not have the expected shape.
    #[error("Malformed catalog: {0}")]
    Parse(String),

    /// A value could not be rendered in the selected output format.
    #[error("Cannot render output: {0}")]
    Render(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An underlying classifier or compiler error.
    #[error(transparent)]
    Terminus(#[from] TerminusError),
}

impl CatalogError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::NodeNotFound { .. } => 4,
            Self::Parse(_) | Self::Render(_) | Self::Io(_) | Self::Terminus(_) => 1,
        }
    }

    /// Machine-readable error code (snake_case).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NodeNotFound { .. } => "node_not_found",
            Self::Config(_) => "config_error",
            Self::Parse(_) => "parse_error",
            Self::Render(_) => "render_error",
            Self::Io(_) => "io_error",
            Self::Terminus(e) => e.code(),
        }
    }
}
