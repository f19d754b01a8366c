//! Leaf parsers for the annotation micro-language.
//!
//! Each function interprets the raw text of one tag (or, for headers and returns,
//! the full tag list of a block) and returns a typed value. None of them fail:
//! malformed input degrades to defaults the same way every time.

use crate::comment::Tag;
use crate::document::{Response, ResponseHeader, TagEntry};
use crate::type_resolver::TypeResolver;
use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Separates a description from its example, e.g. `name - eg: John`
pub(crate) static EXAMPLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*eg:\s*").expect("example marker regex should be valid"));

static HEADER_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s+").expect("header separator regex should be valid"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex should be valid"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digits regex should be valid"));

/// Method and path of a `@route` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Lower-case method; any token is accepted
    pub method: String,
    pub path: String,
}

/// Parsed `name.location.modifier` descriptor of a `@param` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub location: String,
    pub required: bool,
}

/// Result of the `-eg: type:a,b,c` enum shorthand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShorthand {
    pub base_type: String,
    pub values: Vec<String>,
}

/// Security requirement text, either a JSON literal or a bare scheme name
#[derive(Debug, Clone, PartialEq)]
pub enum SecuritySpec {
    Structured(Value),
    BareScheme(String),
}

/// Headers collected per status code
pub type HeaderMap = IndexMap<String, IndexMap<String, ResponseHeader>>;

/// `"POST /users"` -> `{post, /users}`
pub fn parse_route(text: &str) -> Route {
    let mut parts = text.split(' ');
    let method = parts.next().unwrap_or("").to_lowercase();
    let path = parts.next().unwrap_or("").to_string();

    Route {
        method: if method.is_empty() { "get".to_string() } else { method },
        path,
    }
}

/// `"id.path.required"` -> `{id, path, true}`.
///
/// A missing location defaults to the literal `"get"`, which downstream tooling
/// treats as a query string parameter.
pub fn parse_field(text: &str) -> Field {
    let mut parts = text.split('.');
    let name = parts.next().unwrap_or("").to_string();
    let location = parts
        .next()
        .filter(|l| !l.is_empty())
        .unwrap_or("get")
        .to_string();
    let required = parts.next() == Some("required");

    Field {
        name,
        location,
        required,
    }
}

/// Parses the enum shorthand found after the example marker of a description.
pub fn parse_enum(description: &str) -> EnumShorthand {
    let Some(example) = EXAMPLE_MARKER.split(description).nth(1) else {
        return EnumShorthand {
            base_type: "string".to_string(),
            values: Vec::new(),
        };
    };

    let mut parts = example.split(':');
    let head = parts.next().unwrap_or("");
    match parts.next() {
        Some(values) => EnumShorthand {
            base_type: head.to_string(),
            values: values.split(',').map(str::to_string).collect(),
        },
        None => EnumShorthand {
            base_type: "string".to_string(),
            values: vec![head.to_string()],
        },
    }
}

/// Interprets `@security` text as a JSON literal or a bare scheme name.
pub fn parse_security(text: &str) -> SecuritySpec {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => SecuritySpec::Structured(value),
        _ => SecuritySpec::BareScheme(text.to_string()),
    }
}

impl SecuritySpec {
    /// The security requirement list stored on the operation
    pub fn into_value(self) -> Value {
        match self {
            SecuritySpec::Structured(value) => value,
            SecuritySpec::BareScheme(scheme) => {
                let mut requirement = serde_json::Map::new();
                requirement.insert(scheme, Value::Array(Vec::new()));
                Value::Array(vec![Value::Object(requirement)])
            }
        }
    }
}

/// Whitespace-separated mime types of `@produces` / `@consumes`
pub fn parse_mime_types(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Group of the block from its first `@group` tag, `default` otherwise.
pub fn parse_group(tags: &[Tag]) -> TagEntry {
    match tags.iter().find(|tag| tag.title == "group") {
        Some(tag) => {
            let mut parts = tag.description.split('-');
            let name = parts.next().unwrap_or("").trim();
            let description = parts.next().unwrap_or("").trim();
            TagEntry::new(name, description)
        }
        None => TagEntry::new("default", ""),
    }
}

/// Collects `@header`/`@headers` tags of the form `{type} CODE.Name - description`.
///
/// A malformed header tag stops collection for the rest of the block; headers
/// gathered before it are kept.
pub fn parse_headers(tags: &[Tag]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for tag in tags.iter().filter(|t| t.title == "headers" || t.title == "header") {
        let mut sections = HEADER_SEPARATOR.split(&tag.description);
        let target = sections.next().unwrap_or("");
        let description = sections.next().map(str::to_string);

        let mut code_and_name = target.split('.');
        let code_part = code_and_name.next().unwrap_or("");
        let Some(header_name) = code_and_name.next() else {
            warn!("Header tag without CODE.Name, skipping remaining headers: {}", tag.description);
            break;
        };

        let (Some(header_type), Some(code)) = (WORD.find(code_part), DIGITS.find(code_part)) else {
            warn!("Header tag without type or status code, skipping remaining headers: {}", tag.description);
            break;
        };

        headers.entry(code.as_str().trim().to_string()).or_default().insert(
            header_name.to_string(),
            ResponseHeader::new(header_type.as_str(), description),
        );
    }

    headers
}

/// Builds the responses of a block from its `@returns`/`@return` tags.
///
/// Descriptions look like `200 - OK`; headers collected for the same status code
/// are attached.
pub fn parse_returns(tags: &[Tag]) -> IndexMap<String, Response> {
    let headers = parse_headers(tags);
    let mut responses = IndexMap::new();

    for tag in tags.iter().filter(|t| t.title == "returns" || t.title == "return") {
        let mut parts = tag.description.split('-');
        let code = parts.next().unwrap_or("").trim().to_string();
        let description = parts.next().unwrap_or("").trim().to_string();

        let response = Response {
            headers: headers.get(&code).cloned(),
            schema: TypeResolver::schema(tag.type_expr.as_ref()),
            ..Response::new(description)
        };
        responses.insert(code, response);
    }

    responses
}
