use kube::core::GroupVersionKind;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{api::constants::GVK_EXTENSION, error::ParseError};

/// An OpenAPI v2 document reduced to what example generation needs.
///
/// Definitions keep the order they had in the source document. Every other
/// top-level field (`swagger`, `info`, `paths`, ...) is kept as-is in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct SchemaDocument {
    pub definitions: Vec<Definition>,
    pub extra: Map<String, Value>,
}

/// A named entry of the document's `definitions` section.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub name: String,
    pub schema: Schema,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
    /// Schema keys not modelled above, e.g. `required` or `x-kubernetes-*` extensions.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Example payload attached to a definition.
///
/// Curated examples are YAML text stored as a string scalar; cluster documents
/// may carry arbitrary structured values instead.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Example {
    Text(String),
    Structured(Value),
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    definitions: Map<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Error)]
#[error("definition \"{name}\" is not a valid schema: {source}")]
pub struct InvalidDefinition {
    name: String,
    source: serde_json::Error,
}

impl TryFrom<RawDocument> for SchemaDocument {
    type Error = InvalidDefinition;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let definitions = raw
            .definitions
            .into_iter()
            .map(|(name, value)| match serde_json::from_value(value) {
                Ok(schema) => Ok(Definition { name, schema }),
                Err(source) => Err(InvalidDefinition { name, source }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaDocument {
            definitions,
            extra: raw.extra,
        })
    }
}

impl Serialize for SchemaDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.definitions.is_empty() {
            map.serialize_entry("definitions", &DefinitionMap(&self.definitions))?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serializes definitions back into a name-keyed map, in document order.
struct DefinitionMap<'a>(&'a [Definition]);

impl Serialize for DefinitionMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|d| (&d.name, &d.schema)))
    }
}

impl SchemaDocument {
    pub fn from_definitions(definitions: Vec<Definition>) -> SchemaDocument {
        SchemaDocument {
            definitions,
            extra: Map::new(),
        }
    }

    /// Parses a document, as JSON when it starts with `{` and as YAML otherwise.
    pub fn parse(text: &str) -> Result<SchemaDocument, ParseError> {
        if text.trim_start().starts_with('{') {
            Ok(serde_json::from_str(text)?)
        } else {
            Ok(serde_yaml::from_str(text)?)
        }
    }

    /// First definition with exactly this name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

impl Definition {
    pub fn new(name: impl Into<String>, schema: Schema) -> Definition {
        Definition {
            name: name.into(),
            schema,
        }
    }
}

#[derive(Deserialize)]
struct GvkExtension {
    #[serde(default)]
    group: String,
    version: String,
    kind: String,
}

impl Schema {
    /// Group/version/kinds listed in the `x-kubernetes-group-version-kind` extension.
    pub fn group_version_kinds(&self) -> Vec<GroupVersionKind> {
        self.extra
            .get(GVK_EXTENSION)
            .cloned()
            .and_then(|value| serde_json::from_value::<Vec<GvkExtension>>(value).ok())
            .unwrap_or_default()
            .into_iter()
            .map(|e| GroupVersionKind::gvk(&e.group, &e.version, &e.kind))
            .collect()
    }
}
