use super::annotations::{
    parse_enum, parse_field, parse_group, parse_mime_types, parse_returns, parse_route,
    parse_security, Route,
};
use crate::comment::{CommentBlock, Tag};
use crate::document::{Operation, Parameter, PathItem, TagEntry};
use crate::error::CompileError;
use crate::type_resolver::TypeResolver;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

/// Operations and tag entries compiled from one route block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledOperations {
    /// Route -> path item holding one operation per method
    pub paths: IndexMap<String, PathItem>,
    /// One entry per `@route` tag, duplicates included
    pub tags: Vec<TagEntry>,
}

/// Compiles a route block into operations.
///
/// Tags are read in order. Metadata tags (`@summary`, `@operationId`, `@produces`,
/// `@consumes`, `@security`, `@deprecated`) attach to the most recent `@route` and
/// are dropped when no route has been declared yet. Every route of the block shares
/// the block's full parameter list and responses.
pub fn compile_operations(block: &CommentBlock) -> Result<CompiledOperations, CompileError> {
    let description = block.description.replacen("/**", "", 1);
    let group = parse_group(&block.tags);

    let mut compiled = CompiledOperations::default();
    let mut parameters = Vec::new();
    let mut routes: Vec<Route> = Vec::new();
    let mut active: Option<Route> = None;

    for tag in &block.tags {
        match tag.title.as_str() {
            "route" => {
                let route = parse_route(&tag.description);
                debug!("Compiling route {} {}", route.method, route.path);

                let operation = operation_mut(&mut compiled.paths, &route);
                operation.description = Some(description.clone());
                operation.tags = vec![group.name.clone()];
                compiled.tags.push(group.clone());

                if !routes.contains(&route) {
                    routes.push(route.clone());
                }
                active = Some(route);
            }
            "param" => parameters.push(compile_parameter(tag)?),
            title => {
                if let Some(route) = &active {
                    apply_metadata(operation_mut(&mut compiled.paths, route), title, tag);
                }
            }
        }
    }

    let responses = parse_returns(&block.tags);
    for route in &routes {
        let operation = operation_mut(&mut compiled.paths, route);
        operation.parameters = Some(parameters.clone());
        operation.responses = responses.clone();
    }

    Ok(compiled)
}

fn operation_mut<'a>(paths: &'a mut IndexMap<String, PathItem>, route: &Route) -> &'a mut Operation {
    paths
        .entry(route.path.clone())
        .or_default()
        .operations
        .entry(route.method.clone())
        .or_default()
}

fn apply_metadata(operation: &mut Operation, title: &str, tag: &Tag) {
    match title {
        "operationId" => operation.operation_id = Some(tag.description.clone()),
        "summary" => operation.summary = Some(tag.description.clone()),
        "produces" => operation.produces = Some(parse_mime_types(&tag.description)),
        "consumes" => operation.consumes = Some(parse_mime_types(&tag.description)),
        "security" => operation.security = Some(parse_security(&tag.description).into_value()),
        "deprecated" => operation.deprecated = true,
        _ => {}
    }
}

/// Builds a parameter from a `@param {Type} name.location.required - description` tag.
fn compile_parameter(tag: &Tag) -> Result<Parameter, CompileError> {
    if tag.name.is_empty() {
        return Err(CompileError::MissingParameterName {
            title: tag.title.clone(),
        });
    }
    let field = parse_field(&tag.name);

    if let Some(schema) = TypeResolver::schema(tag.type_expr.as_ref()) {
        return Ok(Parameter::with_schema(
            field.name,
            field.location,
            tag.description.clone(),
            field.required,
            schema,
        ));
    }

    let mut parameter = Parameter::with_type(
        field.name,
        field.location,
        tag.description.clone(),
        field.required,
        TypeResolver::type_name(tag.type_expr.as_ref()),
    );
    if parameter.param_type.as_deref() == Some("enum") {
        let shorthand = parse_enum(&tag.description);
        parameter.param_type = Some(shorthand.base_type);
        parameter.enum_values = Some(shorthand.values.into_iter().map(Value::String).collect());
    }

    Ok(parameter)
}
