//! Content optimization pipeline.
//!
//! [`ContentOptimizer`] owns the per-post [`VersionCache`] and drives the save
//! pipeline; the other modules are its individual steps.

mod content;
mod schema;
mod structure;
mod versions;

pub use content::{ContentOptimizer, OptimizationReport};
pub use schema::{inject_schema_markup, SchemaAuthor, SchemaRecord};
pub use structure::{demote_extra_headings, fill_missing_alt, normalize_structure, NormalizedContent};
pub use versions::VersionCache;
