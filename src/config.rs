//! Configuration: where the classifier and compiler live.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag (or `MINICAT_CONFIG`, via clap)
//! 2. XDG default: `~/.config/minicat/config.toml`
//! 3. Built-in defaults
//!
//! Individual entries can then be overridden from the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// Default environment for nodes whose classifier does not name one.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment used when the classifier supplies none.
    pub environment: String,
    pub classifier: ClassifierConfig,
    pub compiler: CompilerConfig,
    pub server: ServerConfig,
}

/// How nodes are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierTerminus {
    /// Run an external node classifier program.
    #[default]
    Exec,
    /// Ask the server's node endpoint.
    Rest,
}

/// Node classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub terminus: ClassifierTerminus,
    /// ENC program, for the `exec` terminus.
    pub command: String,
    /// Arguments placed before the node name.
    pub args: Vec<String>,
}

/// Catalog compiler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler program; receives the node as JSON on stdin.
    pub command: String,
    /// Arguments placed before the node name.
    pub args: Vec<String>,
}

/// Server connection, for the `rest` terminus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            classifier: ClassifierConfig::default(),
            compiler: CompilerConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            terminus: ClassifierTerminus::Exec,
            command: "/etc/puppetlabs/puppet/enc".to_owned(),
            args: Vec::new(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "puppet-compile-node".to_owned(),
            args: Vec::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://puppet:8140".to_owned(),
            ca_cert: None,
            client_cert: None,
            client_key: None,
        }
    }
}

/// Command-line overrides applied on top of the loaded file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub environment: Option<String>,
    pub enc: Option<String>,
    pub compiler: Option<String>,
    pub server: Option<String>,
}

impl Config {
    /// Load configuration from an explicit path or the XDG default.
    ///
    /// A missing default file yields built-in defaults; a missing explicit
    /// file is an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CatalogError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        tracing::debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))
    }

    /// Return the XDG default config path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("minicat").join("config.toml"))
    }

    /// Apply command-line overrides. `--server` also switches the classifier
    /// to the `rest` terminus.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(env) = overrides.environment {
            self.environment = env;
        }
        if let Some(enc) = overrides.enc {
            self.classifier.terminus = ClassifierTerminus::Exec;
            self.classifier.command = enc;
            self.classifier.args.clear();
        }
        if let Some(compiler) = overrides.compiler {
            self.compiler.command = compiler;
            self.compiler.args.clear();
        }
        if let Some(url) = overrides.server {
            self.classifier.terminus = ClassifierTerminus::Rest;
            self.server.url = url;
        }
        self
    }
}
