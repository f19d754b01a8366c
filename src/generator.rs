//! End-to-end generation: resolve files, compile their comments, merge fragments.

use crate::comment::CommentBlock;
use crate::compiler::compile_block;
use crate::config::ValidatedOptions;
use crate::deprecated::{find_deprecated, DeprecatedKey, DocNode};
use crate::document::SpecificationDocument;
use crate::error::{Error, Result};
use crate::fragment::{yaml_to_json, Fragment};
use crate::merger::add_data;
use crate::parser::CommentParser;
use crate::scanner::FileScanner;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds a document from the annotated sources matched by `patterns`.
///
/// The initial document keeps its metadata; its format version is forced to 2.0.
/// Files are compiled and merged one at a time in resolved order.
///
/// # Errors
///
/// Returns [`Error::Precondition`] if the base directory cannot be resolved,
/// [`Error::Read`] if a matched file cannot be read and [`Error::Compile`] for the
/// first block that fails to compile. No partial document is returned.
pub fn compile(
    base_dir: &Path,
    patterns: &[String],
    initial: SpecificationDocument,
) -> Result<SpecificationDocument> {
    let mut doc = initial.swaggerize();

    for file in resolve(base_dir, patterns)? {
        let parsed = CommentParser::parse_file(&file).map_err(|e| Error::Read {
            file: file.clone(),
            message: format!("{e:#}"),
        })?;
        compile_blocks(&mut doc, &parsed.path, &parsed.blocks)?;
    }

    Ok(doc)
}

/// Compiles the annotated sources, then merges the fragment files on top.
///
/// # Errors
///
/// Fails like [`compile`], and with [`Error::Precondition`] for a fragment file whose
/// root or categories are malformed.
pub fn generate(options: ValidatedOptions) -> Result<SpecificationDocument> {
    let mut doc = compile(&options.basedir, &options.files, options.swagger_definition)?;

    if !options.fragments.is_empty() {
        for file in resolve(&options.basedir, &options.fragments)? {
            merge_fragment_file(&mut doc, &file)?;
        }
    }

    info!(
        "Document has {} path(s), {} definition(s), {} tag(s)",
        doc.paths.len(),
        doc.definitions.len(),
        doc.tags.len()
    );
    Ok(doc)
}

/// Compiles the comment blocks of one source text into `doc`.
///
/// # Errors
///
/// Returns [`Error::Compile`] naming `file` and the failing block's description.
pub fn compile_source(doc: &mut SpecificationDocument, file: &Path, source: &str) -> Result<()> {
    let blocks = CommentParser::parse_source(source);
    compile_blocks(doc, file, &blocks)
}

fn compile_blocks(
    doc: &mut SpecificationDocument,
    file: &Path,
    blocks: &[CommentBlock],
) -> Result<()> {
    for block in blocks {
        let fragments = compile_block(block).map_err(|source| Error::Compile {
            file: file.to_path_buf(),
            comment: block.description.clone(),
            source,
        })?;
        add_data(doc, fragments);
    }
    debug!("Merged {} block(s) from {}", blocks.len(), file.display());
    Ok(())
}

/// Reads a YAML or JSON fragment file, reports deprecated keys and merges it into `doc`.
///
/// Returns the deprecated keys found, which are also logged as warnings.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its shape is invalid.
pub fn merge_fragment_file(doc: &mut SpecificationDocument, file: &Path) -> Result<Vec<DeprecatedKey>> {
    let root = read_fragment_file(file)?;

    let problems = find_deprecated(&[DocNode::from(&root)]);
    for problem in &problems {
        warn!(
            "Deprecated key '{}' in {} at {}; use its plural form",
            problem.key,
            file.display(),
            problem.path.join(".")
        );
    }

    add_data(doc, Fragment::from_value(root)?);
    debug!("Merged fragment file {}", file.display());
    Ok(problems)
}

fn read_fragment_file(file: &Path) -> Result<Value> {
    let content = fs::read_to_string(file).map_err(|e| Error::Read {
        file: file.to_path_buf(),
        message: e.to_string(),
    })?;

    match file.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Ok(yaml_to_json(serde_yaml::from_str(&content)?)),
    }
}

fn resolve(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let scan = FileScanner::new(base_dir.to_path_buf())
        .scan(patterns)
        .map_err(|e| Error::Precondition(format!("{e:#}")))?;

    info!("Resolved {} file(s) from {} pattern(s)", scan.files.len(), patterns.len());
    Ok(scan.files)
}
