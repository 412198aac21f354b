//! REST mapping backed by the cluster's API discovery.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::{core::GroupVersionKind, Client};
use tracing::{debug, instrument, warn};

use super::{ResourceRequest, RestMapper};
use crate::error::MappingError;

/// A resource the cluster serves, as seen by discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedResource {
    pub gvk: GroupVersionKind,
    pub plural: String,
    /// Abbreviations such as `deploy`, as advertised by the cluster.
    pub short_names: Vec<String>,
    /// Served in the preferred version of its group.
    pub preferred: bool,
}

impl MappedResource {
    pub fn new(gvk: GroupVersionKind, plural: &str, preferred: bool) -> MappedResource {
        MappedResource {
            gvk,
            plural: plural.to_string(),
            short_names: Vec::new(),
            preferred,
        }
    }

    pub fn with_short_names(self, short_names: &[&str]) -> MappedResource {
        MappedResource {
            short_names: short_names.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    fn matches(&self, request: &ResourceRequest) -> bool {
        let named = request.resource == self.plural
            || request.resource == self.gvk.kind.to_lowercase()
            || self.short_names.iter().any(|s| *s == request.resource);
        named
            && (request.group.is_empty() || request.group == self.gvk.group)
            && (request.version.is_empty() || request.version == self.gvk.version)
    }
}

/// Discovered resources in discovery order, core group first.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryMapper {
    resources: Vec<MappedResource>,
}

impl DiscoveryMapper {
    pub fn new(resources: Vec<MappedResource>) -> DiscoveryMapper {
        DiscoveryMapper { resources }
    }

    /// Runs API discovery against the cluster, core group first and then groups by name.
    ///
    /// Group versions that fail to list their resources are skipped, so an unavailable
    /// aggregated API does not hide the rest of the cluster.
    #[instrument(skip(client))]
    pub async fn discover(client: &Client) -> Result<DiscoveryMapper, kube::Error> {
        let mut resources = Vec::new();

        let core = client.list_core_api_versions().await?;
        for (i, version) in core.versions.iter().enumerate() {
            match client.list_core_api_resources(version).await {
                Ok(list) => resources.extend(mapped_resources(&list, "", version, i == 0)),
                Err(error) => warn!(%error, group_version = %version, "skipping unavailable api"),
            }
        }

        let mut groups = client.list_api_groups().await?.groups;
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        for group in &groups {
            let preferred = group
                .preferred_version
                .as_ref()
                .or(group.versions.first())
                .map(|v| v.version.as_str());
            for version in &group.versions {
                match client.list_api_group_resources(&version.group_version).await {
                    Ok(list) => resources.extend(mapped_resources(
                        &list,
                        &group.name,
                        &version.version,
                        preferred == Some(version.version.as_str()),
                    )),
                    Err(error) => warn!(
                        %error,
                        group_version = %version.group_version,
                        "skipping unavailable api"
                    ),
                }
            }
        }

        debug!(resources = resources.len(), "discovered api resources");
        Ok(DiscoveryMapper { resources })
    }
}

/// Top-level resources of one group version; subresources such as `deployments/scale` are left out.
fn mapped_resources<'a>(
    list: &'a APIResourceList,
    group: &'a str,
    version: &'a str,
    preferred: bool,
) -> impl Iterator<Item = MappedResource> + 'a {
    list.resources
        .iter()
        .filter(|r| !r.name.contains('/'))
        .map(move |r| MappedResource {
            gvk: GroupVersionKind::gvk(group, version, &r.kind),
            plural: r.name.clone(),
            short_names: r.short_names.clone().unwrap_or_default(),
            preferred,
        })
}

impl RestMapper for DiscoveryMapper {
    fn kind_for(&self, request: &ResourceRequest) -> Result<GroupVersionKind, MappingError> {
        let mut candidates = self.resources.iter().filter(|r| r.matches(request));
        let found = if request.version.is_empty() {
            let candidates: Vec<_> = candidates.collect();
            candidates
                .iter()
                .find(|r| r.preferred)
                .or_else(|| candidates.first())
                .copied()
        } else {
            candidates.next()
        };
        found
            .map(|r| r.gvk.clone())
            .ok_or_else(|| MappingError::NoMatch(request.to_string()))
    }
}
