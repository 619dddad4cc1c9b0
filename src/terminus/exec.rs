/// Exec termini: an external node classifier (ENC) program and a catalog
/// compiler program, both driven through pipes.
use std::io::{self, Write};
use std::process::{ChildStdin, Command, Output, Stdio};

use serde_json::Value;

use super::errors::TerminusError;
use super::node::{ClassifierOutput, Node};
use super::{CatalogCompiler, NodeClassifier};

/// A program plus the arguments placed before the node name.
#[derive(Debug, Clone)]
pub struct ExecCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExecCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, node_name: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(node_name);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> TerminusError {
        TerminusError::Spawn {
            command: self.program.clone(),
            source,
        }
    }
}

/// Write the node to the compiler and close its stdin. A compiler that
/// ignores its input may close the pipe early.
fn write_payload(stdin: Option<ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(payload) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_owned()
}

/// Classifier that runs an ENC as `<program> <args...> <node>` and reads a
/// YAML document from its stdout.
///
/// Empty output means the classifier does not know the node.
#[derive(Debug, Clone)]
pub struct ExecClassifier {
    command: ExecCommand,
}

impl ExecClassifier {
    #[must_use]
    pub fn new(command: ExecCommand) -> Self {
        Self { command }
    }
}

impl NodeClassifier for ExecClassifier {
    fn find(&self, name: &str) -> Result<Option<Node>, TerminusError> {
        tracing::debug!(program = %self.command.program, node = name, "running node classifier");

        let output = self
            .command
            .command(name)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.command.spawn_error(e))?;

        if !output.status.success() {
            return Err(TerminusError::ClassifierFailed {
                command: self.command.program.clone(),
                status: output.status,
                stderr: stderr_text(&output),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            tracing::debug!(node = name, "classifier returned no data");
            return Ok(None);
        }

        let parsed: ClassifierOutput =
            serde_yml::from_str(&stdout).map_err(|e| TerminusError::InvalidOutput {
                what: "classifier",
                message: e.to_string(),
            })?;
        Ok(Some(parsed.into_node(name)))
    }
}

/// Compiler that runs `<program> <args...> <node>`, writes the node as JSON
/// on stdin, and reads the compiled catalog as JSON from stdout.
#[derive(Debug, Clone)]
pub struct ExecCompiler {
    command: ExecCommand,
}

impl ExecCompiler {
    #[must_use]
    pub fn new(command: ExecCommand) -> Self {
        Self { command }
    }
}

impl CatalogCompiler for ExecCompiler {
    fn compile(&self, node: &Node) -> Result<Value, TerminusError> {
        tracing::debug!(
            program = %self.command.program,
            node = %node.name,
            classes = ?node.classes.names(),
            "running catalog compiler"
        );

        let payload = serde_json::to_vec(node).map_err(|e| TerminusError::InvalidOutput {
            what: "node",
            message: e.to_string(),
        })?;

        let mut child = self
            .command
            .command(&node.name)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.command.spawn_error(e))?;

        // The compiler may write its catalog before it has read the whole
        // node, so stdin is fed from its own thread while stdout drains here.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || write_payload(stdin, &payload));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = output.map_err(|e| self.command.spawn_error(e))?;

        if !output.status.success() {
            return Err(TerminusError::CompilerFailed {
                command: self.command.program.clone(),
                status: output.status,
                stderr: stderr_text(&output),
            });
        }

        written.map_err(|e| self.command.spawn_error(e))?;

        serde_json::from_slice(&output.stdout).map_err(|e| TerminusError::InvalidOutput {
            what: "compiler",
            message: e.to_string(),
        })
    }
}
