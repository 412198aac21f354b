use std::collections::BTreeSet;

use lazy_static::lazy_static;

/// Definitions whose name starts with this prefix carry curated examples.
pub const EXAMPLES_PREFIX: &str = "io.k8s.config.examples/";

/// Removed from a curated definition name to find the upstream definition it overlays.
/// Only this part of [`EXAMPLES_PREFIX`] is stripped so the leading `io.k8s.` survives.
pub const EXAMPLES_SUB_PREFIX: &str = "config.examples/";

/// Namespace of the built-in Kubernetes API definitions in the cluster's OpenAPI document.
pub const SCHEMA_NAME_PREFIX: &str = "io.k8s.api";

/// OpenAPI extension listing the group/version/kind a definition describes.
pub const GVK_EXTENSION: &str = "x-kubernetes-group-version-kind";

lazy_static! {
    /// Resource names accepted on the command line. All of them name Deployments;
    /// the cluster's discovery maps them to a kind.
    pub static ref SUPPORTED_RESOURCES: BTreeSet<&'static str> =
        BTreeSet::from(["deployment", "deployments", "deploy"]);
}
