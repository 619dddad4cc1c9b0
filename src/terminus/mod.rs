/// Collaborator layer: node classification and catalog compilation.
pub mod errors;
pub mod exec;
pub mod node;
pub mod rest;

use serde_json::Value;

pub use errors::TerminusError;
pub use exec::{ExecClassifier, ExecCommand, ExecCompiler};
pub use node::{Node, parse_classlist};
pub use rest::{RestClassifier, TlsFiles};

/// Maps a node name to its classification.
pub trait NodeClassifier {
    /// Look up a node. `Ok(None)` means the classifier has no such node.
    ///
    /// # Errors
    ///
    /// Returns `TerminusError` if the classifier could not be queried.
    fn find(&self, name: &str) -> Result<Option<Node>, TerminusError>;
}

/// Turns a classified node into a compiled catalog document.
pub trait CatalogCompiler {
    /// Compile a catalog for `node`, returning the catalog as a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns `TerminusError` if compilation fails or its output is not JSON.
    fn compile(&self, node: &Node) -> Result<Value, TerminusError>;
}
