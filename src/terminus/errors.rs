/// Errors from the collaborator layer (classifier and compiler termini).
use std::process::ExitStatus;

use thiserror::Error;

/// Typed errors raised while talking to the node classifier or catalog compiler.
#[derive(Debug, Error)]
pub enum TerminusError {
    /// The classifier program could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// Program that was launched.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The classifier program exited unsuccessfully.
    #[error("Node classifier '{command}' failed ({status}): {stderr}")]
    ClassifierFailed {
        /// Program that was launched.
        command: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Trimmed standard error of the child.
        stderr: String,
    },

    /// The catalog compiler program exited unsuccessfully.
    #[error("Catalog compiler '{command}' failed ({status}): {stderr}")]
    CompilerFailed {
        /// Program that was launched.
        command: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Trimmed standard error of the child.
        stderr: String,
    },

    /// A collaborator answered with data we could not decode.
    #[error("Invalid {what} output: {message}")]
    InvalidOutput {
        /// Which collaborator produced the output ("classifier", "compiler").
        what: &'static str,
        /// Decoder message.
        message: String,
    },

    /// A PEM file for the REST client could not be read.
    #[error("Cannot read certificate '{path}': {source}")]
    Certificate {
        /// Path from the configuration.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TerminusError {
    /// Machine-readable code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn_failed",
            Self::ClassifierFailed { .. } => "classifier_failed",
            Self::CompilerFailed { .. } => "compiler_failed",
            Self::InvalidOutput { .. } => "invalid_output",
            Self::Certificate { .. } => "certificate_error",
            Self::HttpStatus { .. } | Self::Http(_) => "http_error",
        }
    }
}
