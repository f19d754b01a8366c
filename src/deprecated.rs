//! Detection of legacy singular keys in raw fragment trees.

use serde_json::Value;

/// Singular or legacy spellings reported by [`find_deprecated`]
pub const DEPRECATED_KEYS: [&str; 10] = [
    "consume",
    "produce",
    "path",
    "tag",
    "definition",
    "securityDefinition",
    "scheme",
    "response",
    "parameter",
    "deprecated",
];

/// Key that introduces user-defined property names
const PROPERTIES_KEY: &str = "properties";

/// Untyped document tree walked by the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// Mapping entries in source order
    Map(Vec<(String, DocNode)>),
    List(Vec<DocNode>),
    Scalar,
}

impl From<&Value> for DocNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(map) => DocNode::Map(
                map.iter()
                    .map(|(key, child)| (key.clone(), DocNode::from(child)))
                    .collect(),
            ),
            Value::Array(items) => DocNode::List(items.iter().map(DocNode::from).collect()),
            _ => DocNode::Scalar,
        }
    }
}

/// A reported key together with the path of keys leading to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedKey {
    pub key: String,
    /// Keys from the root down to and including `key`; list positions are indices
    pub path: Vec<String>,
}

/// Reports every deprecated key in `sources`, depth-first in document order.
///
/// Keys sitting directly under a `properties` mapping are user-defined property
/// names and are never reported.
pub fn find_deprecated(sources: &[DocNode]) -> Vec<DeprecatedKey> {
    let mut problems = Vec::new();

    for source in sources {
        let mut stack: Vec<(&DocNode, Vec<String>)> = vec![(source, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                DocNode::Map(entries) => {
                    let under_properties = path.last().map(String::as_str) == Some(PROPERTIES_KEY);
                    for (key, _) in entries {
                        if !under_properties && DEPRECATED_KEYS.contains(&key.as_str()) {
                            let mut key_path = path.clone();
                            key_path.push(key.clone());
                            problems.push(DeprecatedKey {
                                key: key.clone(),
                                path: key_path,
                            });
                        }
                    }
                    for (key, child) in entries.iter().rev() {
                        let mut child_path = path.clone();
                        child_path.push(key.clone());
                        stack.push((child, child_path));
                    }
                }
                DocNode::List(items) => {
                    for (index, child) in items.iter().enumerate().rev() {
                        let mut child_path = path.clone();
                        child_path.push(index.to_string());
                        stack.push((child, child_path));
                    }
                }
                DocNode::Scalar => {}
            }
        }
    }

    problems
}
