//! Sources of schema documents: the cluster, the bundled examples and user supplied files or URLs.

pub mod custom;
pub mod local;
pub mod upstream;

use crate::{error::LoadError, openapi::SchemaDocument};

fn parse_document(text: &str, origin: &str) -> Result<SchemaDocument, LoadError> {
    SchemaDocument::parse(text).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })
}
