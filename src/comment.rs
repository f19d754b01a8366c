//! Comment block data model shared by the comment parser and the compilers.
//!
//! A [`CommentBlock`] is one `/** ... */` documentation unit: its free text plus an
//! ordered list of [`Tag`]s. Tags carry an optional [`TypeExpression`] parsed from
//! the `{...}` part of the annotation.

/// One documentation unit extracted from a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBlock {
    /// Free text preceding the first tag
    pub description: String,
    /// Tags in source order
    pub tags: Vec<Tag>,
}

/// A single `@title {Type} name description` directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Tag title without the `@` (e.g. "route", "param")
    pub title: String,
    /// Name token; empty when the tag kind carries no name
    pub name: String,
    /// Remaining free text
    pub description: String,
    /// Parsed `{...}` expression, if the tag had one
    pub type_expr: Option<TypeExpression>,
}

/// Type annotation attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    /// A plain name such as `string` or `Pet.model`
    Named(String),
    /// A container applied to element names, e.g. `Array.<Pet>`
    Generic {
        container: String,
        elements: Vec<String>,
    },
    /// `(A|B)` alternatives
    Union(Vec<TypeExpression>),
}

impl CommentBlock {
    pub fn new(description: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            description: description.into(),
            tags,
        }
    }

    /// Whether the block describes a reusable type rather than a route.
    pub fn is_typedef(&self) -> bool {
        self.tags.first().is_some_and(|tag| tag.title == "typedef")
    }
}

impl Tag {
    /// Create a tag with only a title and description
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach a type parsed from annotation text such as `Array.<Pet>`
    pub fn with_type(mut self, type_text: &str) -> Self {
        self.type_expr = Some(TypeExpression::parse(type_text));
        self
    }
}

impl TypeExpression {
    /// Parse the text found between `{` and `}`.
    ///
    /// Supports `(A|B)` unions, `T[]` arrays, and both `C.<A, B>` and `C<A, B>`
    /// applications. Nullable (`?T`, `!T`) and optional (`T=`) markers are ignored.
    /// Anything else is taken verbatim as a name.
    pub fn parse(text: &str) -> Self {
        let text = text
            .trim()
            .trim_start_matches(['?', '!'])
            .trim_end_matches('=')
            .trim();

        let unwrapped = strip_parens(text);
        let members = split_top_level(unwrapped, '|');
        if members.len() > 1 {
            return TypeExpression::Union(members.iter().map(|m| Self::parse(m)).collect());
        }

        if let Some(inner) = unwrapped.strip_suffix("[]") {
            return TypeExpression::Generic {
                container: "Array".to_string(),
                elements: vec![inner.trim().to_string()],
            };
        }

        if let (Some(open), true) = (unwrapped.find('<'), unwrapped.ends_with('>')) {
            let container = unwrapped[..open].trim_end_matches('.').trim().to_string();
            let elements = split_top_level(&unwrapped[open + 1..unwrapped.len() - 1], ',')
                .into_iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
            return TypeExpression::Generic {
                container,
                elements,
            };
        }

        TypeExpression::Named(unwrapped.to_string())
    }
}

/// Removes one pair of parentheses enclosing the whole text, so `(A)|(B)` is kept.
fn strip_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return text,
            ')' => depth -= 1,
            _ => {}
        }
    }
    inner.trim()
}

/// Split on `sep` while ignoring separators nested inside `<>`, `()` or `{}`.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '{' => depth += 1,
            '>' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
