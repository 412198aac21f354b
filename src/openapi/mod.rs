//! OpenAPI v2 schema documents and the example overlay applied to them.

pub mod document;
pub mod extract;
pub mod merge;

pub use document::{Definition, Example, Schema, SchemaDocument};
pub use extract::{extract_example, schema_name};
pub use merge::merge;
