/// Sorted catalog view for stable diffs between compilations.
use super::model::{Catalog, Edge, Resource};

/// Four independently sorted views of one catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedCatalog<'a> {
    /// By `title + type`. Title and type are present on every valid resource.
    pub resources: Vec<&'a Resource>,
    /// By `target + source`.
    pub edges: Vec<&'a Edge>,
    pub classes: Vec<&'a str>,
    pub tags: Vec<&'a str>,
}

/// Build the sorted view. Ties keep catalog order.
#[must_use]
pub fn sort_catalog(catalog: &Catalog) -> SortedCatalog<'_> {
    let mut resources: Vec<&Resource> = catalog.resources.iter().collect();
    resources.sort_by_cached_key(|r| r.sort_key());

    let mut edges: Vec<&Edge> = catalog.edges.iter().collect();
    edges.sort_by_cached_key(|e| e.sort_key());

    let mut classes: Vec<&str> = catalog.classes.iter().map(String::as_str).collect();
    classes.sort_unstable();

    let mut tags: Vec<&str> = catalog.tags.iter().map(String::as_str).collect();
    tags.sort_unstable();

    SortedCatalog {
        resources,
        edges,
        classes,
        tags,
    }
}
