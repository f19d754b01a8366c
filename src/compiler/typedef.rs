use super::annotations::{parse_enum, EXAMPLE_MARKER};
use crate::comment::{Tag, TypeExpression};
use crate::document::Schema;
use crate::error::CompileError;
use crate::type_resolver::TypeResolver;
use indexmap::IndexMap;
use log::debug;
use serde_json::{Number, Value};

/// Compiles a `@typedef` block into a named definition.
///
/// The first tag must be the `@typedef` itself; every later `@property` tag adds a
/// property. Property names may carry `.required` and `.readOnly` modifiers. A plain
/// type on the typedef (`@typedef {Pet} Dog`) becomes an `allOf` parent reference.
pub fn compile_typedef(tags: &[Tag]) -> Result<(String, Schema), CompileError> {
    let Some(head) = tags.first() else {
        return Err(CompileError::MissingTypedefName);
    };
    if head.name.is_empty() {
        return Err(CompileError::MissingTypedefName);
    }
    let type_name = head.name.clone();
    debug!("Compiling typedef {}", type_name);

    let all_of = match &head.type_expr {
        Some(expr @ TypeExpression::Named(_)) => {
            TypeResolver::type_name(Some(expr)).map(|parent| vec![Schema::definition(&parent)])
        }
        _ => None,
    };
    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    for tag in tags.iter().skip(1).filter(|t| t.title == "property") {
        let mut segments = tag.name.split('.');
        let prop_name = segments.next().unwrap_or("").to_string();
        if prop_name.is_empty() {
            return Err(CompileError::MissingPropertyName {
                typedef: type_name.clone(),
            });
        }
        let modifiers: Vec<&str> = segments.collect();

        if modifiers.contains(&"required") {
            required.push(prop_name.clone());
        }

        let property = match TypeResolver::schema(tag.type_expr.as_ref()) {
            Some(schema) => schema,
            None => inline_property(tag, modifiers.contains(&"readOnly")),
        };
        properties.insert(prop_name, property);
    }

    let definition = Schema {
        all_of,
        properties: Some(properties),
        required: (!required.is_empty()).then_some(required),
        ..Schema::default()
    };
    Ok((type_name, definition))
}

/// Inline `{type, description, items}` property with its example.
fn inline_property(tag: &Tag, read_only: bool) -> Schema {
    let resolved_type = TypeResolver::type_name(tag.type_expr.as_ref());
    let type_name = resolved_type.clone().unwrap_or_else(|| "string".to_string());

    let mut sections = EXAMPLE_MARKER.split(&tag.description);
    let description = sections.next().unwrap_or("").to_string();
    let example = sections.next();

    let mut property = Schema {
        schema_type: Some(type_name.clone()),
        description: Some(description),
        items: TypeResolver::items(tag.type_expr.as_ref()).map(Box::new),
        read_only: read_only.then_some(true),
        ..Schema::default()
    };

    if type_name == "enum" {
        let shorthand = match example {
            Some(example) => parse_enum(&format!("-eg:{example}")),
            None => parse_enum(""),
        };
        property.schema_type = Some(shorthand.base_type);
        property.enum_values = Some(shorthand.values.into_iter().map(Value::String).collect());
    }

    if let Some(example) = example.filter(|e| !e.is_empty()) {
        property.example = coerce_example(resolved_type.as_deref(), example);
    }

    property
}

/// Converts example text according to the declared property type.
fn coerce_example(type_name: Option<&str>, example: &str) -> Option<Value> {
    match type_name {
        Some("boolean") => Some(Value::Bool(example == "true")),
        Some("integer") => Some(numeric_example(example)),
        Some("enum") => None,
        _ => Some(Value::String(example.to_string())),
    }
}

/// Numeric value of `text`, or `null` when it is not a number.
fn numeric_example(text: &str) -> Value {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Value::Number(int.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
