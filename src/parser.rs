use crate::comment::{CommentBlock, Tag, TypeExpression};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Documentation comment parser for annotated source files.
///
/// The `CommentParser` finds every `/** ... */` block in a source file and splits it
/// into a free-text description and a list of `@tag` directives. Blocks that carry no
/// tags are dropped, since they cannot contribute to the document.
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::parser::CommentParser;
/// use std::path::Path;
///
/// let parsed = CommentParser::parse_file(Path::new("routes/users.js")).unwrap();
/// println!("Found {} documented blocks", parsed.blocks.len());
/// ```
pub struct CommentParser;

/// A source file together with the comment blocks found in it.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Tagged comment blocks in source order
    pub blocks: Vec<CommentBlock>,
}

/// How the text after `@title` is split up.
enum TagLayout {
    /// `{Type} name description`
    TypeAndName,
    /// `{Type} description`
    TypeOnly,
    /// Everything is description
    Description,
}

impl TagLayout {
    fn for_title(title: &str) -> Self {
        match title {
            "param" | "arg" | "argument" | "property" | "prop" | "typedef" => TagLayout::TypeAndName,
            "returns" | "return" => TagLayout::TypeOnly,
            _ => TagLayout::Description,
        }
    }
}

impl CommentParser {
    /// Reads a source file and extracts its tagged comment blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let blocks = Self::parse_source(&content);
        debug!(
            "Found {} tagged comment blocks in {}",
            blocks.len(),
            path.display()
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            blocks,
        })
    }

    /// Extracts every tagged `/** ... */` block from source text.
    pub fn parse_source(source: &str) -> Vec<CommentBlock> {
        let mut blocks = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("/**") {
            let after_open = &rest[start..];
            if after_open.starts_with("/**/") {
                rest = &after_open[4..];
                continue;
            }
            let body_start = &after_open[3..];
            let Some(end) = body_start.find("*/") else {
                break;
            };

            let block = Self::parse_comment(&body_start[..end]);
            if !block.tags.is_empty() {
                blocks.push(block);
            }
            rest = &body_start[end + 2..];
        }

        blocks
    }

    /// Parses the inside of one comment (without `/**` and `*/`).
    pub fn parse_comment(body: &str) -> CommentBlock {
        let mut description_lines: Vec<&str> = Vec::new();
        let mut tag_texts: Vec<String> = Vec::new();

        for line in body.lines().map(unwrap_line) {
            if line.trim_start().starts_with('@') {
                tag_texts.push(line.trim_start()[1..].to_string());
            } else if let Some(current) = tag_texts.last_mut() {
                current.push('\n');
                current.push_str(line);
            } else {
                description_lines.push(line);
            }
        }

        CommentBlock {
            description: description_lines.join("\n").trim().to_string(),
            tags: tag_texts.iter().map(|text| parse_tag(text)).collect(),
        }
    }
}

/// Removes the leading `*` decoration of a comment line.
fn unwrap_line(line: &str) -> &str {
    let trimmed = line.trim_start();
    let without_star = match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    };
    without_star.trim_end()
}

/// Parses the text following `@` into a tag.
fn parse_tag(text: &str) -> Tag {
    let (title, body) = match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim_start()),
        None => (text, ""),
    };

    let mut tag = Tag {
        title: title.to_string(),
        ..Tag::default()
    };
    let mut rest = body;

    match TagLayout::for_title(title) {
        TagLayout::TypeAndName => {
            tag.type_expr = take_type(&mut rest);
            tag.name = take_name(&mut rest);
        }
        TagLayout::TypeOnly => {
            tag.type_expr = take_type(&mut rest);
        }
        TagLayout::Description => {}
    }

    tag.description = clean_description(rest);
    tag
}

/// Consumes a balanced `{...}` prefix and parses it.
fn take_type(rest: &mut &str) -> Option<TypeExpression> {
    if !rest.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let expr = TypeExpression::parse(&rest[1..i]);
                    *rest = rest[i + 1..].trim_start();
                    return Some(expr);
                }
            }
            _ => {}
        }
    }

    None
}

/// Consumes a name token. `[name=default]` optional syntax is reduced to `name`.
fn take_name(rest: &mut &str) -> String {
    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(close) = inner.find(']') {
            let name = inner[..close].split('=').next().unwrap_or("").trim();
            *rest = inner[close + 1..].trim_start();
            return name.to_string();
        }
    }

    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = rest[..end].to_string();
    *rest = rest[end..].trim_start();
    name
}

/// Trims the description and drops a leading `- ` separator.
fn clean_description(text: &str) -> String {
    let text = text.trim();
    match text.strip_prefix('-') {
        Some(after) if after.starts_with(char::is_whitespace) => after.trim_start().to_string(),
        _ => text.to_string(),
    }
}
