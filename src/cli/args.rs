/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

/// minicat — make a mini-catalog to view data-driven template output.
#[derive(Debug, Parser)]
#[command(
    name = "minicat",
    about = "Compile and display a catalog locally, driven by the node classifier",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true, value_name = "PATH", env = "MINICAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Environment used when the classifier names none.
    #[arg(long, global = true, value_name = "ENV")]
    pub environment: Option<String>,

    /// External node classifier program (selects the exec classifier).
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub enc: Option<String>,

    /// Catalog compiler program.
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub compiler: Option<String>,

    /// Server URL (selects the REST classifier).
    #[arg(long, global = true, value_name = "URL", conflicts_with = "enc")]
    pub server: Option<String>,

    /// Rendering for catalog trees and error envelopes.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "json")]
    pub output: OutputFormat,

    /// Debug logging, including lookup timings.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only warnings and errors; no status notices.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Configuration entries given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            environment: self.environment.clone(),
            enc: self.enc.clone(),
            compiler: self.compiler.clone(),
            server: self.server.clone(),
        }
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Compact single-line JSON.
    Compact,
    /// YAML.
    Yaml,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile and display a catalog, optionally overriding the node's classes.
    Compile(CompileArgs),
}

/// How a compiled catalog is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only `File` resource content, screen-friendly.
    ContentOnly,
    /// Resources, edges, classes and tags, each sorted.
    Sorted,
    /// The whole catalog as compiled.
    Raw,
}

/// Arguments for `minicat compile`.
#[derive(Debug, Parser)]
pub struct CompileArgs {
    /// Fetch data from the classifier as if we were this node.
    #[arg(long, value_name = "NODENAME")]
    pub node: String,

    /// Comma-separated classes to compile instead of the classifier's list.
    #[arg(long, value_name = "CLASS1,CLASS2")]
    pub classlist: Option<String>,

    /// Display File resource content, ignoring non-File resources.
    #[arg(long, visible_alias = "content-only", conflicts_with = "sorted")]
    pub contentonly: bool,

    /// Display resources, edges, classes and tags sorted.
    #[arg(long)]
    pub sorted: bool,

    /// With --contentonly, only show files whose path contains this.
    #[arg(long, value_name = "PATH")]
    pub filename: Option<String>,
}

impl CompileArgs {
    /// The display mode selected by the flags.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        match (self.contentonly, self.sorted) {
            (true, _) => DisplayMode::ContentOnly,
            (false, true) => DisplayMode::Sorted,
            (false, false) => DisplayMode::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn compile_args(argv: &[&str]) -> Result<CompileArgs, clap::Error> {
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Command::Compile(args) => Ok(args),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_node_is_required() {
        let err = compile_args(&["minicat", "compile", "--sorted"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_display_modes() {
        let args = compile_args(&["minicat", "compile", "--node", "web01"]).unwrap();
        assert_eq!(args.display_mode(), DisplayMode::Raw);

        let args = compile_args(&["minicat", "compile", "--node", "web01", "--sorted"]).unwrap();
        assert_eq!(args.display_mode(), DisplayMode::Sorted);

        let args = compile_args(&[
            "minicat",
            "compile",
            "--node",
            "web01",
            "--content-only",
            "--filename",
            "motd",
        ])
        .unwrap();
        assert_eq!(args.display_mode(), DisplayMode::ContentOnly);
        assert_eq!(args.filename.as_deref(), Some("motd"));
    }

    #[test]
    fn test_contentonly_and_sorted_conflict() {
        let err = compile_args(&[
            "minicat",
            "compile",
            "--node",
            "web01",
            "--contentonly",
            "--sorted",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minicat",
            "compile",
            "--node",
            "web01",
            "--output",
            "yaml",
            "--server",
            "https://pm:8140",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Yaml);
        assert_eq!(cli.overrides().server.as_deref(), Some("https://pm:8140"));
    }
}
