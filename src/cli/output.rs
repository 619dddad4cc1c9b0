/// Output formatting: raw tree, content-only, sorted banners, error envelopes.
use std::io::Write;

use serde::Serialize;

use super::args::OutputFormat;
use crate::catalog::{CatalogError, FileContent, SortedCatalog};
use crate::types::ErrorOutput;

/// Divider printed after each file in content-only mode.
pub const CONTENT_DIVIDER: &str = "----------------------------------";

/// Output context passed to commands: rendering format plus status notices.
#[derive(Debug, Clone)]
pub struct OutputCtx {
    pub format: OutputFormat,
    /// When true, status notices are suppressed.
    pub quiet: bool,
}

impl OutputCtx {
    #[must_use]
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Print a status notice to stderr. Catalog output stays on stdout.
    pub fn notice(&self, message: &str) {
        if !self.quiet {
            eprintln!("Notice: {message}");
        }
    }

    /// Start a named timer. Logs elapsed time at debug level on drop.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label)
    }
}

// --- Raw tree ---

/// Write any serializable value in the selected format.
///
/// # Errors
///
/// Returns `CatalogError::Render` if the value cannot be serialized and
/// `CatalogError::Io` if writing fails.
pub fn write_tree<W, T>(out: &mut W, value: &T, format: OutputFormat) -> Result<(), CatalogError>
where
    W: Write + ?Sized,
    T: Serialize,
{
    let rendered = render(value, format)?;
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CatalogError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| CatalogError::Render(e.to_string()))
        }
        OutputFormat::Compact => {
            serde_json::to_string(value).map_err(|e| CatalogError::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yml::to_string(value).map_err(|e| CatalogError::Render(e.to_string()))
        }
    }
}

// --- Content-only ---

/// Write each file's declaring manifest, filename and content, followed by a
/// divider and a blank line.
///
/// # Errors
///
/// Returns `CatalogError::Io` if writing fails.
pub fn write_file_contents<W: Write + ?Sized>(
    out: &mut W,
    files: &[FileContent<'_>],
) -> Result<(), CatalogError> {
    for file in files {
        writeln!(out, "{}", quoted(file.file))?;
        writeln!(out, "{}", quoted(Some(file.filename)))?;
        let text = file.text();
        if text.ends_with('\n') {
            write!(out, "{text}")?;
        } else {
            writeln!(out, "{text}")?;
        }
        writeln!(out, "{CONTENT_DIVIDER}\n")?;
    }
    Ok(())
}

/// A string as a JSON literal, or `null`.
fn quoted(s: Option<&str>) -> String {
    serde_json::Value::from(s).to_string()
}

// --- Sorted ---

fn banner(label: &str) -> String {
    format!("\n###############   {label:<10} ###############################\n")
}

/// Write the four sorted views under their banners: resources, targets,
/// classes, tags.
///
/// # Errors
///
/// Returns `CatalogError::Render` or `CatalogError::Io`.
pub fn write_sorted<W: Write + ?Sized>(
    out: &mut W,
    sorted: &SortedCatalog<'_>,
    format: OutputFormat,
) -> Result<(), CatalogError> {
    write!(out, "{}", banner("resources"))?;
    write_tree(out, &sorted.resources, format)?;

    write!(out, "{}", banner("targets"))?;
    write_tree(out, &sorted.edges, format)?;

    write!(out, "{}", banner("classes"))?;
    write_tree(out, &sorted.classes, format)?;

    write!(out, "{}", banner("tags"))?;
    write_tree(out, &sorted.tags, format)?;

    writeln!(out)?;
    Ok(())
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Compact => {
            let s = serde_json::to_string(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Yaml => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Visible with `--verbose`.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(label = self.label, elapsed_ms = ms, "timing");
    }
}
