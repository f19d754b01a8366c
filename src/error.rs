use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug, Error)]
pub enum Error {
    /// Required input was missing or malformed before any work started
    #[error("{0}")]
    Precondition(String),

    /// A comment block could not be compiled; aborts the whole run
    #[error("Incorrect comment format. Method was not documented.\nFile: {}\nComment: {comment}\nCause: {source}", file.display())]
    Compile {
        file: PathBuf,
        comment: String,
        #[source]
        source: CompileError,
    },

    #[error("failed to read {}: {message}", file.display())]
    Read { file: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures raised by the typedef and operation compilers for a single block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("@typedef tag has no name")]
    MissingTypedefName,

    #[error("@property tag in typedef `{typedef}` has no name")]
    MissingPropertyName { typedef: String },

    #[error("@{title} tag has no field name")]
    MissingParameterName { title: String },
}
