use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into
const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

/// File scanner resolving glob patterns against a base directory.
///
/// The `FileScanner` walks the base directory once and matches every file against the
/// given patterns. It skips `target`, `node_modules` and hidden directories (those
/// starting with `.`).
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-api"));
/// let result = scanner.scan(&["routes/**/*.js".to_string()]).unwrap();
/// println!("Found {} source files", result.files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of resolving patterns.
///
/// Patterns that match nothing and entries that cannot be read are logged as
/// warnings while scanning.
#[derive(Debug)]
pub struct ScanResult {
    /// Matched files, grouped by pattern and sorted by path within each pattern
    pub files: Vec<PathBuf>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified base directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The directory patterns are resolved against
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Resolves `patterns` to files under the base directory.
    ///
    /// Patterns support `*` (within one path segment), `**` (any number of segments),
    /// `?`, `[abc]`/`[a-z]`/`[!abc]` classes and `{a,b}` alternatives, which may nest.
    /// A file matched by several patterns is listed once, at its first match.
    /// Patterns that match nothing produce a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory does not exist or a pattern is invalid.
    pub fn scan(&self, patterns: &[String]) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("Base directory does not exist: {}", self.root_path.display());
        }

        let candidates = self.walk();
        let mut files = IndexSet::new();

        for pattern in patterns {
            let matcher = glob_to_regex(&self.relative_pattern(pattern))
                .with_context(|| format!("Invalid file pattern: {}", pattern))?;

            let mut matched = 0;
            for (relative, path) in &candidates {
                if matcher.is_match(relative) {
                    matched += 1;
                    files.insert(path.clone());
                }
            }
            debug!("Pattern {} matched {} file(s)", pattern, matched);

            if matched == 0 {
                warn!("Pattern matched no files: {}", pattern);
            }
        }

        Ok(ScanResult {
            files: files.into_iter().collect(),
        })
    }

    /// Collects every file as (`/`-separated relative path, full path), sorted by name.
    fn walk(&self) -> Vec<(String, PathBuf)> {
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_skipped = e.file_type().is_dir() && SKIPPED_DIRS.contains(&&*file_name);

                !is_hidden && !is_skipped
            })
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if let Some(relative) = relative_slash_path(&self.root_path, entry.path()) {
                        candidates.push((relative, entry.path().to_path_buf()));
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to access path: {}", e),
            }
        }

        candidates
    }

    /// Strips `./` and, for absolute patterns, the base directory prefix.
    fn relative_pattern(&self, pattern: &str) -> String {
        let pattern = pattern.trim_start_matches("./");
        let root = self.root_path.to_string_lossy().replace('\\', "/");
        let root = root.trim_end_matches('/');
        match pattern.strip_prefix(root) {
            Some(rest) if Path::new(pattern).is_absolute() => rest.trim_start_matches('/').to_string(),
            _ => pattern.to_string(),
        }
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Translates a glob into an anchored regex over `/`-separated relative paths.
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut regex = String::from("^");
    let mut chars = glob.chars().peekable();
    let mut alternation_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    regex.push_str("(?:.*/)?");
                } else {
                    regex.push_str(".*");
                }
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '[' => {
                regex.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    regex.push_str("^/");
                }
                // A leading `]` is a literal member
                if chars.peek() == Some(&']') {
                    chars.next();
                    regex.push_str("\\]");
                }
                let mut closed = false;
                for member in chars.by_ref() {
                    match member {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' | '[' | '^' | '&' | '~' => {
                            regex.push('\\');
                            regex.push(member);
                        }
                        other => regex.push(other),
                    }
                }
                if !closed {
                    bail!("Unclosed character class");
                }
                regex.push(']');
            }
            '{' => {
                alternation_depth += 1;
                regex.push_str("(?:");
            }
            '}' if alternation_depth > 0 => {
                alternation_depth -= 1;
                regex.push(')');
            }
            ',' if alternation_depth > 0 => regex.push('|'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    if alternation_depth > 0 {
        bail!("Unclosed alternation");
    }
    regex.push('$');

    Ok(Regex::new(&regex)?)
}
