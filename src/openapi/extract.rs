use kube::core::GroupVersionKind;
use tracing::{debug, instrument};

use super::document::{Definition, Example, SchemaDocument};
use crate::{api::constants::SCHEMA_NAME_PREFIX, error::ExtractionError};

/// Definition name the cluster's OpenAPI document uses for a built-in kind.
///
/// `apps/v1 Deployment` maps to `io.k8s.api.apps.v1.Deployment`, the core group
/// to `core`, and `*.k8s.io` groups to their first label (`rbac.authorization.k8s.io`
/// becomes `rbac`).
pub fn schema_name(gvk: &GroupVersionKind) -> String {
    let group = if gvk.group.is_empty() {
        "core"
    } else {
        let group = gvk.group.strip_suffix(".k8s.io").unwrap_or(&gvk.group);
        group.split('.').next().unwrap_or(group)
    };
    format!("{SCHEMA_NAME_PREFIX}.{group}.{}.{}", gvk.version, gvk.kind)
}

/// Finds the definition describing `gvk`: by conventional name first, then by
/// its `x-kubernetes-group-version-kind` extension.
pub fn find_definition<'a>(
    document: &'a SchemaDocument,
    gvk: &GroupVersionKind,
) -> Option<&'a Definition> {
    document.definition(&schema_name(gvk)).or_else(|| {
        document
            .definitions
            .iter()
            .find(|d| d.schema.group_version_kinds().contains(gvk))
    })
}

/// Raw text of an example, without trailing newlines.
pub fn render(name: &str, example: &Example) -> Result<String, ExtractionError> {
    let text = match example {
        Example::Text(text) => text.clone(),
        Example::Structured(value) => {
            serde_yaml::to_string(value).map_err(|source| ExtractionError::Render {
                name: name.to_string(),
                source,
            })?
        }
    };
    Ok(text.trim_end_matches('\n').to_string())
}

#[instrument(skip(document), fields(group = %gvk.group, version = %gvk.version, kind = %gvk.kind))]
pub fn extract_example(
    document: &SchemaDocument,
    gvk: &GroupVersionKind,
) -> Result<String, ExtractionError> {
    let definition =
        find_definition(document, gvk).ok_or_else(|| ExtractionError::NotFound(schema_name(gvk)))?;
    debug!(definition = %definition.name, "found definition");
    let example = definition
        .schema
        .example
        .as_ref()
        .ok_or_else(|| ExtractionError::MissingExample(definition.name.clone()))?;
    render(&definition.name, example)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::document::{Definition, Schema};
    use assert_matches::assert_matches;
    use rstest::rstest;
    use serde_json::{json, Map};

    #[rstest]
    #[case("apps", "v1", "Deployment", "io.k8s.api.apps.v1.Deployment")]
    #[case("", "v1", "Pod", "io.k8s.api.core.v1.Pod")]
    #[case("extensions", "v1beta1", "Deployment", "io.k8s.api.extensions.v1beta1.Deployment")]
    #[case("networking.k8s.io", "v1", "Ingress", "io.k8s.api.networking.v1.Ingress")]
    #[case("rbac.authorization.k8s.io", "v1", "Role", "io.k8s.api.rbac.v1.Role")]
    fn derives_schema_names(
        #[case] group: &str,
        #[case] version: &str,
        #[case] kind: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(schema_name(&GroupVersionKind::gvk(group, version, kind)), expected);
    }

    fn document() -> SchemaDocument {
        SchemaDocument::from_definitions(vec![
            Definition::new(
                "io.k8s.api.apps.v1.Deployment",
                Schema {
                    example: Some(Example::Text("apiVersion: apps/v1\nkind: Deployment\n".into())),
                    ..Default::default()
                },
            ),
            Definition::new("io.k8s.api.core.v1.Pod", Schema::default()),
            Definition::new(
                "com.example.v1.Widget",
                Schema {
                    example: Some(Example::Structured(json!({"kind": "Widget"}))),
                    extra: Map::from_iter([(
                        "x-kubernetes-group-version-kind".to_string(),
                        json!([{"group": "example.com", "version": "v1", "kind": "Widget"}]),
                    )]),
                    ..Default::default()
                },
            ),
        ])
    }

    #[test]
    fn extracts_text_example_without_trailing_newline() {
        let example =
            extract_example(&document(), &GroupVersionKind::gvk("apps", "v1", "Deployment"))
                .unwrap();
        assert_eq!(example, "apiVersion: apps/v1\nkind: Deployment");
    }

    #[test]
    fn falls_back_to_group_version_kind_extension() {
        let example =
            extract_example(&document(), &GroupVersionKind::gvk("example.com", "v1", "Widget"))
                .unwrap();
        assert_eq!(example, "kind: Widget");
    }

    #[test]
    fn missing_definition_is_not_found() {
        let result = extract_example(
            &document(),
            &GroupVersionKind::gvk("extensions", "v1beta1", "Deployment"),
        );
        assert_matches!(
            result,
            Err(ExtractionError::NotFound(name)) if name == "io.k8s.api.extensions.v1beta1.Deployment"
        );
    }

    #[test]
    fn definition_without_example_is_reported() {
        let result = extract_example(&document(), &GroupVersionKind::gvk("", "v1", "Pod"));
        assert_matches!(
            result,
            Err(ExtractionError::MissingExample(name)) if name == "io.k8s.api.core.v1.Pod"
        );
    }
}
