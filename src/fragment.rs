//! Partial documents produced by compilers and fragment files.

use crate::document::{PathItem, Schema, TagEntry};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One category of data to fold into the aggregate document
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Route -> path item (operations by method, shared parameters, extensions)
    Paths(IndexMap<String, PathItem>),
    Tags(Vec<TagEntry>),
    Definitions(IndexMap<String, Schema>),
    Parameters(IndexMap<String, Value>),
    Responses(IndexMap<String, Value>),
    SecurityDefinitions(IndexMap<String, Value>),
    Consumes(Vec<String>),
    Produces(Vec<String>),
}

/// Root key category of a fragment file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Paths,
    Tags,
    Definitions,
    Parameters,
    Responses,
    SecurityDefinitions,
    Consumes,
    Produces,
}

impl Category {
    /// Classifies a root key; singular and plural spellings are equivalent.
    ///
    /// `schema`/`schemas` are folded into definitions. Unknown keys are path fragments.
    pub fn from_key(key: &str) -> Self {
        match key {
            "tag" | "tags" => Category::Tags,
            "definition" | "definitions" | "schema" | "schemas" => Category::Definitions,
            "parameter" | "parameters" => Category::Parameters,
            "response" | "responses" => Category::Responses,
            "securityDefinition" | "securityDefinitions" => Category::SecurityDefinitions,
            "consume" | "consumes" => Category::Consumes,
            "produce" | "produces" => Category::Produces,
            _ => Category::Paths,
        }
    }
}

impl Fragment {
    /// Splits a parsed fragment file into fragments, one per root key in file order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when the root is not a mapping or when a
    /// category value does not have the shape of its category.
    pub fn from_value(root: Value) -> Result<Vec<Fragment>> {
        let Value::Object(map) = root else {
            return Err(Error::Precondition(format!(
                "Fragment root must be a mapping, found {}",
                kind_of(&root)
            )));
        };

        map.into_iter()
            .map(|(key, value)| Fragment::from_category(&key, value))
            .collect()
    }

    fn from_category(key: &str, value: Value) -> Result<Fragment> {
        let fragment = match Category::from_key(key) {
            Category::Paths => Fragment::Paths(shaped(key, value)?),
            Category::Tags => Fragment::Tags(match value {
                Value::Array(_) => shaped(key, value)?,
                single => vec![shaped(key, single)?],
            }),
            Category::Definitions => Fragment::Definitions(shaped(key, value)?),
            Category::Parameters => Fragment::Parameters(shaped(key, value)?),
            Category::Responses => Fragment::Responses(shaped(key, value)?),
            Category::SecurityDefinitions => Fragment::SecurityDefinitions(shaped(key, value)?),
            Category::Consumes => Fragment::Consumes(shaped(key, value)?),
            Category::Produces => Fragment::Produces(shaped(key, value)?),
        };
        Ok(fragment)
    }
}

fn shaped<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::Precondition(format!("Fragment key '{key}' has the wrong shape: {e}")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Converts a YAML tree to JSON, stringifying non-string mapping keys (`200:`).
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_category_from_key() {
        assert_eq!(Category::from_key("tag"), Category::Tags);
        assert_eq!(Category::from_key("tags"), Category::Tags);
        assert_eq!(Category::from_key("securityDefinition"), Category::SecurityDefinitions);
        assert_eq!(Category::from_key("schemas"), Category::Definitions);
        assert_eq!(Category::from_key("consume"), Category::Consumes);
        assert_eq!(Category::from_key("paths"), Category::Paths);
        assert_eq!(Category::from_key("/users"), Category::Paths);
    }

    #[test]
    fn test_from_value_keeps_file_order() {
        let fragments = Fragment::from_value(json!({
            "tags": [{"name": "Users", "description": "User management"}],
            "produces": ["application/json"],
            "definitions": {"Error": {"properties": {"message": {"type": "string"}}}},
            "paths": {"/users": {"get": {"responses": {"200": {"description": "OK"}}}}}
        }))
        .unwrap();

        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0], Fragment::Tags(vec![TagEntry::new("Users", "User management")]));
        assert_eq!(fragments[1], Fragment::Produces(vec!["application/json".to_string()]));
        assert!(matches!(&fragments[2], Fragment::Definitions(d) if d.contains_key("Error")));
        match &fragments[3] {
            Fragment::Paths(paths) => {
                assert_eq!(
                    paths["/users"]["get"].responses["200"].description.as_deref(),
                    Some("OK")
                );
            }
            other => panic!("expected paths, got {other:?}"),
        }
    }

    #[test]
    fn test_single_tag_object() {
        let fragments = Fragment::from_value(json!({"tag": {"name": "Users"}})).unwrap();
        let expected = TagEntry {
            name: "Users".to_string(),
            ..TagEntry::default()
        };
        assert_eq!(fragments, vec![Fragment::Tags(vec![expected])]);
    }

    #[test]
    fn test_path_fragment_keeps_shared_parameters_and_references() {
        let route = json!({
            "parameters": [{"$ref": "#/parameters/tenant"}],
            "get": {
                "parameters": [
                    {"$ref": "#/parameters/limit"},
                    {"name": "ids", "in": "query", "type": "array", "items": {"type": "integer"}}
                ],
                "responses": {"default": {"$ref": "#/responses/Error"}}
            },
            "x-owner": "billing"
        });
        let fragments = Fragment::from_value(json!({"/orders": route.clone()})).unwrap();

        let Fragment::Paths(paths) = &fragments[0] else {
            panic!("expected paths, got {:?}", fragments[0]);
        };
        let item = &paths["/orders"];
        assert_eq!(item.operations.keys().collect::<Vec<_>>(), vec!["get"]);
        assert_eq!(item.extensions["x-owner"], json!("billing"));
        assert_eq!(serde_json::to_value(item).unwrap(), route);
    }

    #[test]
    fn test_non_mapping_root_is_precondition_error() {
        let err = Fragment::from_value(json!(["not", "a", "map"])).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("a sequence"));
    }

    #[test]
    fn test_wrong_category_shape_is_precondition_error() {
        let err = Fragment::from_value(json!({"parameters": ["limit"]})).unwrap_err();
        assert!(matches!(err, Error::Precondition(ref m) if m.contains("'parameters'")));
    }

    #[test]
    fn test_yaml_to_json_stringifies_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            "responses:\n  200:\n    description: OK\n  true: yes\nratio: 0.5\n",
        )
        .unwrap();
        assert_eq!(
            yaml_to_json(yaml),
            json!({
                "responses": {"200": {"description": "OK"}, "true": "yes"},
                "ratio": 0.5
            })
        );
    }
}
