use crate::document::SpecificationDocument;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Generator options, loaded from a YAML or JSON file and completed from the CLI.
///
/// ```yaml
/// basedir: ./server
/// files:
///   - routes/**/*.js
/// fragments:
///   - docs/*.yaml
/// swaggerDefinition:
///   info:
///     title: Pet store
///     version: 1.0.0
///   basePath: /v1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Directory patterns are resolved against; the config file's directory by default
    pub basedir: Option<PathBuf>,
    /// Glob patterns of annotated source files
    pub files: Option<Vec<String>>,
    /// Glob patterns of YAML/JSON fragment files
    pub fragments: Vec<String>,
    /// Initial document metadata
    pub swagger_definition: Option<SpecificationDocument>,
}

/// Options after validation
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    pub basedir: PathBuf,
    pub files: Vec<String>,
    pub fragments: Vec<String>,
    pub swagger_definition: SpecificationDocument,
}

impl GeneratorOptions {
    /// Checks that the document metadata and the file patterns are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] naming the first missing option.
    pub fn validate(self) -> Result<ValidatedOptions> {
        let Some(swagger_definition) = self.swagger_definition else {
            return Err(Error::Precondition("'swaggerDefinition' is required.".to_string()));
        };
        let Some(files) = self.files else {
            return Err(Error::Precondition("'files' is required.".to_string()));
        };

        Ok(ValidatedOptions {
            basedir: self.basedir.unwrap_or_else(|| PathBuf::from(".")),
            files,
            fragments: self.fragments,
            swagger_definition,
        })
    }
}

/// Loads options from `path`; `.json` files are read as JSON, anything else as YAML.
///
/// A relative `basedir` is resolved against the config file's directory, and a
/// missing one defaults to that directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_options(path: &Path) -> Result<GeneratorOptions> {
    let content = fs::read_to_string(path).map_err(|e| Error::Read {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut options: GeneratorOptions = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    options.basedir = Some(match options.basedir.take() {
        Some(dir) if dir.is_relative() => config_dir.join(dir),
        Some(dir) => dir,
        None => config_dir.to_path_buf(),
    });

    Ok(options)
}
