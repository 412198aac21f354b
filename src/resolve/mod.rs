//! Resolution of a command line resource name to a group/version/kind.

pub mod discovery;

use std::fmt::Display;

use kube::core::GroupVersionKind;
use tracing::{debug, instrument};

use crate::error::{MappingError, ResolutionError};

pub use discovery::{DiscoveryMapper, MappedResource};

/// A resource as named by the user; empty group or version means "any".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl ResourceRequest {
    pub fn new(group: &str, version: &str, resource: &str) -> ResourceRequest {
        ResourceRequest {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn without_version(&self) -> ResourceRequest {
        ResourceRequest {
            version: String::new(),
            ..self.clone()
        }
    }
}

impl Display for ResourceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.resource)?;
        if !self.version.is_empty() {
            write!(f, ".{}", self.version)?;
        }
        if !self.group.is_empty() {
            write!(f, ".{}", self.group)?;
        }
        Ok(())
    }
}

/// Translates resource requests to the kind the cluster serves them as.
pub trait RestMapper {
    fn kind_for(&self, request: &ResourceRequest) -> Result<GroupVersionKind, MappingError>;
}

/// Splits a `resource[.version.group]` token.
///
/// The first element is set when the token names resource, version and group
/// (two or more dots). The second reads everything after the first dot as the group.
pub fn parse_resource_arg(
    token: &str,
) -> Result<(Option<ResourceRequest>, ResourceRequest), ResolutionError> {
    let invalid = || ResolutionError::InvalidResource(token.to_string());
    let fully_specified = match token.splitn(3, '.').collect::<Vec<_>>().as_slice() {
        [resource, version, group] => {
            if resource.is_empty() || version.is_empty() || group.is_empty() {
                return Err(invalid());
            }
            Some(ResourceRequest::new(group, version, resource))
        }
        _ => None,
    };
    let group_resource = match token.split_once('.') {
        Some((resource, group)) => ResourceRequest::new(group, "", resource),
        None => ResourceRequest::new("", "", token),
    };
    if group_resource.resource.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok((fully_specified, group_resource))
}

/// Parses `group/version`, or a bare `version` of the core group.
pub fn parse_api_version(api_version: &str) -> Result<(String, String), ResolutionError> {
    let invalid = || ResolutionError::InvalidApiVersion(api_version.to_string());
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => {
            if group.is_empty() || version.contains('/') {
                return Err(invalid());
            }
            (group, version)
        }
        None => ("", api_version),
    };
    if version.is_empty() {
        return Err(invalid());
    }
    Ok((group.to_string(), version.to_string()))
}

/// Resolves `token` to a group/version/kind, replacing group and version with
/// `api_version` when one is given.
#[instrument(skip(mapper))]
pub fn resolve(
    mapper: &impl RestMapper,
    token: &str,
    api_version: Option<&str>,
) -> Result<GroupVersionKind, ResolutionError> {
    let (fully_specified, group_resource) = parse_resource_arg(token)?;

    let specified = fully_specified
        .and_then(|request| mapper.kind_for(&request).ok())
        .filter(|gvk| !gvk.kind.is_empty());
    let gvk = match specified {
        Some(gvk) => gvk,
        None => {
            let request = group_resource.without_version();
            let gvk = mapper
                .kind_for(&request)
                .map_err(|source| ResolutionError::NoKind {
                    resource: token.to_string(),
                    source,
                })?;
            if gvk.kind.is_empty() {
                return Err(ResolutionError::NoKind {
                    resource: token.to_string(),
                    source: MappingError::NoMatch(request.to_string()),
                });
            }
            gvk
        }
    };
    debug!(group = %gvk.group, version = %gvk.version, kind = %gvk.kind, "mapped resource");

    match api_version {
        Some(api_version) => {
            let (group, version) = parse_api_version(api_version)?;
            Ok(GroupVersionKind::gvk(&group, &version, &gvk.kind))
        }
        None => Ok(gvk),
    }
}
