use tracing::{info, instrument};

use crate::{
    api::constants::SUPPORTED_RESOURCES,
    cluster::Cluster,
    error::{Error, ValidationError},
    loader::{custom, local},
    openapi::{extract_example, merge},
    resolve::resolve,
};

/// What to generate, as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Resource name, lowercased.
    pub resource: Option<String>,
    /// `group/version` replacing the resolved group and version.
    pub api_version: Option<String>,
    /// File path or URL of a schema whose curated examples replace the bundled ones.
    pub schema: Option<String>,
}

impl GenerateOptions {
    pub fn new(resource: &str) -> GenerateOptions {
        GenerateOptions {
            resource: Some(resource.to_lowercase()),
            ..Default::default()
        }
    }

    pub fn with_api_version(self, api_version: &str) -> GenerateOptions {
        GenerateOptions {
            api_version: Some(api_version.to_string()),
            ..self
        }
    }

    pub fn with_schema(self, schema: &str) -> GenerateOptions {
        GenerateOptions {
            schema: Some(schema.to_string()),
            ..self
        }
    }

    /// Checks the resource is named and supported, returning it.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let resource = self
            .resource
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(ValidationError::MissingResource)?;
        let name = resource.split('.').next().unwrap_or(resource);
        if !SUPPORTED_RESOURCES.contains(name) {
            return Err(ValidationError::Unsupported {
                resource: resource.to_string(),
                supported: SUPPORTED_RESOURCES
                    .iter()
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(resource)
    }
}

/// Runs the pipeline once: validate, resolve, load both schemas, merge and extract.
///
/// Returns the example manifest text without a trailing newline.
#[instrument(skip(cluster))]
pub async fn generate<C: Cluster>(options: &GenerateOptions, cluster: &C) -> Result<String, Error> {
    let resource = options.validate()?;

    let mapper = cluster.rest_mapper().await?;
    let gvk = resolve(&mapper, resource, options.api_version.as_deref())?;
    info!(group = %gvk.group, version = %gvk.version, kind = %gvk.kind, "resolved resource");

    let upstream = cluster.openapi_schema().await?;
    let examples = match &options.schema {
        Some(source) => custom::load(source).await?,
        None => local::load()?,
    };

    let merged = merge(upstream, &examples);
    Ok(extract_example(&merged, &gvk)?)
}
