//! OpenAPI from Comments - Command-line tool for generating Swagger documents.
//!
//! This binary compiles the `@route`, `@param`, `@returns` and `@typedef` annotations
//! found in `/** ... */` comments of a project into one Swagger 2.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-comments [OPTIONS] [PATTERNS]...
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-comments 'routes/**/*.js' --title "Pet store" -o swagger.yaml
//! ```
//!
//! Generate JSON from an options file:
//! ```bash
//! openapi-from-comments --config swagger.config.yaml -f json -o swagger.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-comments 'src/*.ts' -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_comments::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from Comments starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Specification generation completed successfully");

    Ok(())
}
