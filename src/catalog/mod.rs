/// Catalog domain layer: typed model, content-only extraction, sorted view.
pub mod content;
pub mod errors;
pub mod model;
pub mod sorted;

pub use content::{FileContent, file_contents};
pub use errors::CatalogError;
pub use model::Catalog;
pub use sorted::{SortedCatalog, sort_catalog};
