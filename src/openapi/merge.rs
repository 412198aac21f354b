use std::collections::HashMap;

use tracing::{debug, instrument};

use super::document::{Example, SchemaDocument};
use crate::api::constants::{EXAMPLES_PREFIX, EXAMPLES_SUB_PREFIX};

/// Name of the upstream definition a curated definition overlays, if `name` is curated.
///
/// Only the first `config.examples/` is removed, so
/// `io.k8s.config.examples/api.apps.v1.Deployment` becomes `io.k8s.api.apps.v1.Deployment`.
pub fn overlay_key(name: &str) -> Option<String> {
    name.starts_with(EXAMPLES_PREFIX)
        .then(|| name.replacen(EXAMPLES_SUB_PREFIX, "", 1))
}

/// Collects the curated examples of `local`, keyed by the upstream definition they replace.
///
/// Curated definitions without an example are skipped. Later definitions win on key collisions.
pub fn build_overlay(local: &SchemaDocument) -> HashMap<String, Example> {
    local
        .definitions
        .iter()
        .filter_map(|definition| {
            let key = overlay_key(&definition.name)?;
            let example = definition.schema.example.clone()?;
            Some((key, example))
        })
        .collect()
}

/// Overlays the curated examples of `local` onto `upstream` and hands `upstream` back.
///
/// Only the `example` of a matching upstream definition changes.
#[instrument(skip_all, fields(upstream = upstream.definitions.len(), local = local.definitions.len()))]
pub fn merge(mut upstream: SchemaDocument, local: &SchemaDocument) -> SchemaDocument {
    let overlay = build_overlay(local);
    let mut applied = 0;
    for definition in upstream.definitions.iter_mut() {
        if let Some(example) = overlay.get(&definition.name) {
            definition.schema.example = Some(example.clone());
            applied += 1;
        }
    }
    debug!(overlay = overlay.len(), applied, "merged curated examples");
    upstream
}
