//! apidoc-swagger - Command-line tool for generating Swagger 2.0 documents.
//!
//! Reads apidoc-style annotation comments from a controller directory and
//! writes a single Swagger 2.0 YAML document.
//!
//! # Usage
//!
//! ```bash
//! apidoc-swagger [OPTIONS] <TITLE> <HOST> <CONTROLLER_DIR> <OUTPUT_FILE> [ADD_QUOTA]
//! ```
//!
//! # Examples
//!
//! ```bash
//! apidoc-swagger "Pet Store" localhost:10010 ./api/controllers ./api/swagger/swagger.yaml
//! ```
//!
//! With the quota marker and verbose logging:
//! ```bash
//! apidoc-swagger -v "Pet Store" localhost:10010 ./api/controllers ./api/swagger/swagger.yaml quota
//! ```

use anyhow::Result;
use apidoc_swagger::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("apidoc-swagger starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
