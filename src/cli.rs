use crate::config::{load_options, GeneratorOptions};
use crate::document::{Info, SpecificationDocument};
use crate::generator::generate;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Default API version when a title is given without one
const DEFAULT_API_VERSION: &str = "1.0.0";

/// OpenAPI from Comments - Generate a Swagger 2.0 document from annotated doc comments
#[derive(Parser, Debug)]
#[command(name = "openapi-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Glob patterns of annotated source files, relative to the base directory
    #[arg(value_name = "PATTERNS")]
    pub patterns: Vec<String>,

    /// Options file (YAML or JSON) with basedir, files, fragments and swaggerDefinition
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory patterns are resolved against
    #[arg(short = 'b', long = "basedir", value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Glob pattern of YAML/JSON fragment files (repeatable)
    #[arg(long = "fragments", value_name = "GLOB")]
    pub fragments: Vec<String>,

    /// API title
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Host serving the API
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Base path of every route
    #[arg(long = "base-path")]
    pub base_path: Option<String>,

    /// Transfer scheme (repeatable)
    #[arg(long = "scheme", value_name = "SCHEME")]
    pub schemes: Vec<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref config) = args.config {
        if !config.is_file() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
        info!("Config file: {}", config.display());
    }

    if let Some(ref basedir) = args.basedir {
        if !basedir.is_dir() {
            anyhow::bail!("Base directory is not a directory: {}", basedir.display());
        }
        info!("Base directory: {}", basedir.display());
    }

    if args.config.is_none() && args.patterns.is_empty() {
        anyhow::bail!("No file patterns given. Pass PATTERNS or a --config file with 'files'");
    }

    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Combines the options file (if any) with command line overrides.
///
/// Patterns and `--basedir` replace the file's values; fragments are appended;
/// document metadata flags overwrite the matching `swaggerDefinition` fields.
pub fn build_options(args: &CliArgs) -> Result<GeneratorOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorOptions::default(),
    };

    if let Some(basedir) = &args.basedir {
        options.basedir = Some(basedir.clone());
    }
    if !args.patterns.is_empty() {
        options.files = Some(args.patterns.clone());
    }
    options.fragments.extend(args.fragments.iter().cloned());

    let has_metadata = args.title.is_some()
        || args.api_version.is_some()
        || args.host.is_some()
        || args.base_path.is_some()
        || !args.schemes.is_empty();
    if has_metadata || (options.swagger_definition.is_none() && args.config.is_none()) {
        let doc = options
            .swagger_definition
            .get_or_insert_with(SpecificationDocument::default);
        apply_metadata(doc, args);
    }

    Ok(options)
}

fn apply_metadata(doc: &mut SpecificationDocument, args: &CliArgs) {
    let info = doc
        .info
        .get_or_insert_with(|| Info::new("", DEFAULT_API_VERSION));
    if let Some(title) = &args.title {
        info.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        info.version = version.clone();
    }
    if let Some(host) = &args.host {
        doc.host = Some(host.clone());
    }
    if let Some(base_path) = &args.base_path {
        doc.base_path = Some(base_path.clone());
    }
    if !args.schemes.is_empty() {
        doc.schemes = args.schemes.clone();
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting specification generation...");

    // Step 1: Combine options file and command line
    let options = build_options(&args)?.validate()?;
    info!("Base directory: {}", options.basedir.display());
    debug!("File patterns: {:?}", options.files);
    debug!("Fragment patterns: {:?}", options.fragments);

    // Step 2: Compile annotated sources and merge fragment files
    let document = generate(options)?;

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote specification to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 5: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Paths: {}", document.paths.len());
    info!(
        "  - Operations: {}",
        document.paths.values().map(|item| item.operations.len()).sum::<usize>()
    );
    info!("  - Definitions: {}", document.definitions.len());
    info!("  - Tags: {}", document.tags.len());

    Ok(())
}
