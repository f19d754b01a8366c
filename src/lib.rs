//! OpenAPI from Comments - Swagger 2.0 documents from annotated doc comments.
//!
//! This library compiles structured annotations written in `/** ... */` comments
//! (`@route`, `@param`, `@returns`, `@headers`, `@typedef`, `@property`, ...) into a
//! single Swagger 2.0 document. Hand-written YAML or JSON fragment files can be merged
//! on top.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Resolves glob patterns against a base directory
//! 2. [`parser`] - Extracts tagged comment blocks from source files
//! 3. [`compiler`] - Compiles typedef blocks into definitions and route blocks into operations
//! 4. [`type_resolver`] - Resolves tag type expressions into type names and schemas
//! 5. [`merger`] - Folds [`fragment`]s into the aggregate [`document`]
//! 6. [`deprecated`] - Reports legacy singular keys in fragment files
//! 7. [`generator`] - Drives the whole pipeline
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_comments::{
//!     document::{Info, SpecificationDocument},
//!     generator::compile,
//!     serializer::serialize_yaml,
//! };
//! use std::path::Path;
//!
//! let initial = SpecificationDocument::new(Info::new("Pet store", "1.0.0"));
//! let document = compile(Path::new("./server"), &["routes/**/*.js".to_string()], initial).unwrap();
//!
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod comment;
pub mod compiler;
pub mod config;
pub mod deprecated;
pub mod document;
pub mod error;
pub mod fragment;
pub mod generator;
pub mod merger;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod type_resolver;
