use crate::{error::LoadError, openapi::SchemaDocument};

use super::parse_document;

/// Curated examples compiled into the binary.
pub const BUNDLED_EXAMPLES: &str = include_str!("examples.yaml");

pub fn load() -> Result<SchemaDocument, LoadError> {
    parse_document(BUNDLED_EXAMPLES, "bundled examples")
}
