/// Content-only extraction: pull rendered file bodies out of `File` resources.
use serde_json::Value;

use super::model::{Catalog, Resource};

/// Resource type whose `content` parameter is shown.
pub const FILE_TYPE: &str = "File";

/// One `File` resource with inline content, borrowed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent<'a> {
    /// Manifest that declared the resource, if known.
    pub file: Option<&'a str>,
    /// Managed path: the `path` parameter, else the resource title.
    pub filename: &'a str,
    /// The `content` parameter as compiled.
    pub content: &'a Value,
}

impl FileContent<'_> {
    /// Content as display text: strings verbatim, anything else as compact JSON.
    #[must_use]
    pub fn text(&self) -> String {
        match self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn display_filename(resource: &Resource) -> &str {
    resource
        .parameter("path")
        .and_then(Value::as_str)
        .unwrap_or(&resource.title)
}

/// Collect `File` resources that carry content, in catalog order.
///
/// When `filter` is given, only resources whose display filename contains it
/// are kept. Resources of other types and files without content are skipped.
#[must_use]
pub fn file_contents<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Vec<FileContent<'a>> {
    catalog
        .resources
        .iter()
        .filter(|res| res.kind == FILE_TYPE)
        .filter_map(|res| {
            let content = res.parameter("content")?;
            let filename = display_filename(res);
            if filter.is_some_and(|f| !filename.contains(f)) {
                return None;
            }
            Some(FileContent {
                file: res.file.as_deref(),
                filename,
                content,
            })
        })
        .collect()
}
