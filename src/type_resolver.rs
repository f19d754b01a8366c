use crate::comment::TypeExpression;
use crate::document::Schema;
use log::debug;

/// Element names emitted inline as `{type: ...}` rather than as references
const PRIMITIVE_ITEM_TYPES: [&str; 4] = ["object", "string", "integer", "boolean"];

/// Name suffix marking a reference to a definition (`Pet.model`)
const MODEL_SUFFIX: &str = "model";

/// Type resolver - turns tag type expressions into type names and schemas.
///
/// All functions are stateless: references are emitted as `#/definitions/<name>`
/// without checking that the definition exists.
pub struct TypeResolver;

impl TypeResolver {
    /// Resolves the bare type name of an expression.
    ///
    /// `X.model` yields `X`, other names are returned verbatim, generic containers
    /// yield their lower-cased container name and unions fall back to `string`.
    /// Returns `None` when the tag had no type at all.
    pub fn type_name(expr: Option<&TypeExpression>) -> Option<String> {
        let name = match expr? {
            TypeExpression::Named(name) => match model_reference(name) {
                Some(definition) => definition.to_string(),
                None => name.clone(),
            },
            TypeExpression::Generic { container, .. } => container.to_lowercase(),
            TypeExpression::Union(_) => "string".to_string(),
        };
        Some(name)
    }

    /// Resolves an expression into a schema when it needs one.
    ///
    /// Only definition references (`X.model`) and generic containers produce a
    /// schema; plain names are expressed with a bare type by the caller.
    ///
    /// A container with several elements produces `{items: {oneOf: [...]}}` with one
    /// entry per element.
    pub fn schema(expr: Option<&TypeExpression>) -> Option<Schema> {
        match expr? {
            TypeExpression::Named(name) => model_reference(name).map(Schema::definition),
            TypeExpression::Generic {
                container,
                elements,
            } => {
                let schema_type = container.to_lowercase();
                match elements.as_slice() {
                    [] => None,
                    [element] => Some(Schema::array(schema_type, item_schema(element))),
                    elements => {
                        debug!(
                            "Building oneOf items for {} with {} elements",
                            container,
                            elements.len()
                        );
                        let one_of = elements.iter().map(|e| item_schema(e)).collect();
                        Some(Schema::array(schema_type, Schema::one_of(one_of)))
                    }
                }
            }
            TypeExpression::Union(_) => None,
        }
    }

    /// Resolves the `items` of a property from the first container element.
    pub fn items(expr: Option<&TypeExpression>) -> Option<Schema> {
        match expr? {
            TypeExpression::Generic { elements, .. } => elements
                .first()
                .filter(|e| !e.is_empty())
                .map(|e| item_schema(e)),
            _ => None,
        }
    }
}

/// `Pet.model` -> `Some("Pet")`
fn model_reference(name: &str) -> Option<&str> {
    let mut parts = name.split('.');
    let head = parts.next()?;
    match parts.next() {
        Some(MODEL_SUFFIX) => Some(head),
        _ => None,
    }
}

fn item_schema(element: &str) -> Schema {
    if PRIMITIVE_ITEM_TYPES.contains(&element) {
        Schema::primitive(element)
    } else {
        Schema::definition(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(name: &str) -> TypeExpression {
        TypeExpression::Named(name.to_string())
    }

    fn generic(container: &str, elements: &[&str]) -> TypeExpression {
        TypeExpression::Generic {
            container: container.to_string(),
            elements: elements.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_type_name_of_plain_name() {
        assert_eq!(TypeResolver::type_name(Some(&named("integer"))), Some("integer".to_string()));
    }

    #[test]
    fn test_type_name_of_model_reference() {
        assert_eq!(TypeResolver::type_name(Some(&named("Pet.model"))), Some("Pet".to_string()));
        // Only the exact `model` suffix counts as a reference
        assert_eq!(
            TypeResolver::type_name(Some(&named("Pet.other"))),
            Some("Pet.other".to_string())
        );
    }

    #[test]
    fn test_type_name_of_container_is_lowercased() {
        assert_eq!(
            TypeResolver::type_name(Some(&generic("Array", &["Pet"]))),
            Some("array".to_string())
        );
    }

    #[test]
    fn test_type_name_absent() {
        assert_eq!(TypeResolver::type_name(None), None);
    }

    #[test]
    fn test_type_name_of_union_defaults_to_string() {
        let union = TypeExpression::Union(vec![named("string"), named("integer")]);
        assert_eq!(TypeResolver::type_name(Some(&union)), Some("string".to_string()));
    }

    #[test]
    fn test_schema_of_model_reference() {
        assert_eq!(
            TypeResolver::schema(Some(&named("ReqNameJSON.model"))),
            Some(Schema::definition("ReqNameJSON"))
        );
    }

    #[test]
    fn test_schema_of_plain_name_is_not_applicable() {
        assert_eq!(TypeResolver::schema(Some(&named("string"))), None);
        assert_eq!(TypeResolver::schema(None), None);
    }

    #[test]
    fn test_schema_of_primitive_array() {
        assert_eq!(
            TypeResolver::schema(Some(&generic("Array", &["string"]))),
            Some(Schema::array("array", Schema::primitive("string")))
        );
    }

    #[test]
    fn test_schema_of_reference_array() {
        assert_eq!(
            TypeResolver::schema(Some(&generic("Array", &["Point"]))),
            Some(Schema::array("array", Schema::definition("Point")))
        );
    }

    #[test]
    fn test_multi_element_generic_builds_complete_one_of() {
        // Every element contributes a oneOf entry, not only the first one.
        assert_eq!(
            TypeResolver::schema(Some(&generic("Array", &["integer", "Cat", "Dog"]))),
            Some(Schema::array(
                "array",
                Schema::one_of(vec![
                    Schema::primitive("integer"),
                    Schema::definition("Cat"),
                    Schema::definition("Dog"),
                ])
            ))
        );
    }

    #[test]
    fn test_schema_of_empty_container() {
        assert_eq!(TypeResolver::schema(Some(&generic("Array", &[]))), None);
    }

    #[test]
    fn test_items() {
        assert_eq!(
            TypeResolver::items(Some(&generic("Array", &["boolean"]))),
            Some(Schema::primitive("boolean"))
        );
        assert_eq!(
            TypeResolver::items(Some(&generic("Array", &["Color", "Point"]))),
            Some(Schema::definition("Color"))
        );
        assert_eq!(TypeResolver::items(Some(&named("string"))), None);
        assert_eq!(TypeResolver::items(Some(&generic("Array", &[]))), None);
        assert_eq!(TypeResolver::items(None), None);
    }
}
