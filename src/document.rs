//! Swagger 2.0 document model.
//!
//! These types describe both the aggregate [`SpecificationDocument`] and the partial
//! values produced by the compilers. Collections use [`IndexMap`] so that the emitted
//! document keeps source order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Index;

/// Prefix used for every definition reference
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Specification format version written into every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Methods a path item can carry an operation for
pub const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// The aggregate document produced by a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationDocument {
    /// Specification format version
    #[serde(default = "default_swagger_version")]
    pub swagger: String,
    /// API info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "basePath", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Route -> path item
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable type definitions
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    #[serde(rename = "securityDefinitions", default)]
    pub security_definitions: IndexMap<String, Value>,
    /// Tag list, unique by name
    #[serde(default)]
    pub tags: Vec<TagEntry>,
    /// Any other caller-supplied top-level keys
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Path Item object.
///
/// Operations are keyed by lower-case method. Keys other than a method, `$ref` or
/// `parameters` (vendor extensions) are kept verbatim in `extensions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>")]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Parameters shared by every operation of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(flatten)]
    pub operations: IndexMap<String, Operation>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Operation object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Security requirements, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Parameter object, or a `$ref` to a shared one.
///
/// A compiled parameter carries either a `schema` or a bare `type` (optionally with
/// `enum`), never both; use [`Parameter::with_schema`] or [`Parameter::with_type`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Parameter location (query, path, body, header, formData)
    #[serde(rename = "in", default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Response object, or a `$ref` to a shared one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, ResponseHeader>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Header object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "type")]
    pub header_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Schema object.
///
/// Used for definitions, their properties, body and response schemas and array
/// `items`. Keywords the compilers produce are typed fields; any other keyword
/// (`format`, `minimum`, `additionalProperties`, `x-*`, ...) lands in `extensions`
/// and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "oneOf", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
    /// Inheritance references
    #[serde(rename = "allOf", default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(rename = "readOnly", default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Swagger Tag object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

fn default_swagger_version() -> String {
    SWAGGER_VERSION.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SpecificationDocument {
    /// Create an empty document with the given info
    pub fn new(info: Info) -> Self {
        Self {
            info: Some(info),
            ..Self::default()
        }
    }

    /// Forces the format version and guarantees every collection exists.
    ///
    /// Collections are always present on this type, so only the version needs
    /// resetting; caller metadata is left untouched.
    pub fn swaggerize(mut self) -> Self {
        self.swagger = SWAGGER_VERSION.to_string();
        self
    }

    /// Operation registered for `path` and `method`, if any
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.operations.get(method))
    }
}

impl Default for SpecificationDocument {
    fn default() -> Self {
        Self {
            swagger: default_swagger_version(),
            info: None,
            host: None,
            base_path: None,
            schemes: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            responses: IndexMap::new(),
            parameters: IndexMap::new(),
            security_definitions: IndexMap::new(),
            tags: Vec::new(),
            extensions: IndexMap::new(),
        }
    }
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            extensions: IndexMap::new(),
        }
    }
}

impl TryFrom<IndexMap<String, Value>> for PathItem {
    type Error = serde_json::Error;

    fn try_from(entries: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();
        for (key, value) in entries {
            if key == "$ref" {
                item.reference = Some(serde_json::from_value(value)?);
            } else if key == "parameters" {
                item.parameters = Some(serde_json::from_value(value)?);
            } else if HTTP_METHODS.contains(&key.as_str()) {
                item.operations.insert(key, serde_json::from_value(value)?);
            } else {
                item.extensions.insert(key, value);
            }
        }
        Ok(item)
    }
}

impl Index<&str> for PathItem {
    type Output = Operation;

    /// Operation for `method`; panics when the route has none
    fn index(&self, method: &str) -> &Operation {
        &self.operations[method]
    }
}

impl Operation {
    /// Operation parameters, empty when none are declared
    pub fn params(&self) -> &[Parameter] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

impl Parameter {
    /// Parameter described by a schema (references and arrays)
    pub fn with_schema(
        name: String,
        location: String,
        description: String,
        required: bool,
        schema: Schema,
    ) -> Self {
        Self {
            name,
            location,
            description: Some(description),
            required: Some(required),
            schema: Some(schema),
            ..Self::default()
        }
    }

    /// Parameter described by a bare type name
    pub fn with_type(
        name: String,
        location: String,
        description: String,
        required: bool,
        param_type: Option<String>,
    ) -> Self {
        Self {
            name,
            location,
            description: Some(description),
            required: Some(required),
            param_type,
            ..Self::default()
        }
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

impl ResponseHeader {
    pub fn new(header_type: impl Into<String>, description: Option<String>) -> Self {
        Self {
            header_type: header_type.into(),
            description,
            extensions: IndexMap::new(),
        }
    }
}

impl Schema {
    /// Reference to the definition called `name`
    pub fn definition(name: &str) -> Self {
        Self {
            reference: Some(format!("{DEFINITIONS_PREFIX}{name}")),
            ..Self::default()
        }
    }

    pub fn primitive(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    pub fn array(schema_type: impl Into<String>, items: Schema) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Alternatives, used as the `items` of a multi-element container
    pub fn one_of(alternatives: Vec<Schema>) -> Self {
        Self {
            one_of: Some(alternatives),
            ..Self::default()
        }
    }
}

impl TagEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            extensions: IndexMap::new(),
        }
    }
}
