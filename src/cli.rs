use crate::config::GeneratorConfig;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// apidoc-swagger - Generate a Swagger 2.0 document from apidoc-style controller comments
#[derive(Parser, Debug)]
#[command(name = "apidoc-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Title of the API (`info.title`)
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Host serving the API, e.g. `localhost:10010`
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Directory containing the annotated controllers
    #[arg(value_name = "CONTROLLER_DIR")]
    pub controller_dir: PathBuf,

    /// Path of the YAML document to write
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: PathBuf,

    /// Any value enables the default quota marker on every path
    #[arg(value_name = "ADD_QUOTA")]
    pub add_quota: Option<String>,

    /// File extensions to scan (repeatable, defaults to js and go)
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Document settings derived from the positional arguments
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(&self.title, &self.host).with_quota(self.add_quota.is_some())
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.controller_dir.exists() {
        anyhow::bail!(
            "Controller directory does not exist: {}",
            args.controller_dir.display()
        );
    }

    if !args.controller_dir.is_dir() {
        anyhow::bail!(
            "Controller path is not a directory: {}",
            args.controller_dir.display()
        );
    }

    info!("Title: {}", args.title);
    info!("Host: {}", args.host);
    info!("Controller directory: {}", args.controller_dir.display());
    info!("Output file: {}", args.output_file.display());
    if args.add_quota.is_some() {
        info!("Quota marker: enabled");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::emitter::write_to_file;
    use crate::scanner::FileScanner;
    use crate::source::load_files;

    let config = args.generator_config();

    // Step 1: Find controller files
    info!("Scanning controller directory...");
    let scanner = FileScanner::new(args.controller_dir.clone()).with_extensions(&args.extensions);
    let scan_result = scanner.scan()?;

    info!(
        "Found {} source files ({})",
        scan_result.source_files.len(),
        scanner.extensions().join(", ")
    );
    if scan_result.source_files.is_empty() {
        log::warn!("No source files found in the controller directory");
    }

    // Step 2: Read them
    let sources = load_files(&scan_result.source_files)?;

    // Step 3: Generate the document in memory
    info!("Generating Swagger document...");
    let generated = crate::generate_document(&sources, &config)
        .context("Failed to generate Swagger document")?;

    if generated.stats.routes == 0 {
        log::warn!("No routes found in the controller directory");
    }

    // Step 4: Write it out
    info!("Writing output to: {}", args.output_file.display());
    write_to_file(&generated.yaml, &args.output_file)?;

    let stats = generated.stats;
    debug!("Stats: {}", serde_json::to_string(&stats).unwrap_or_default());
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", stats.files);
    info!("  - Comment blocks: {}", stats.blocks);
    info!("  - Routes found: {}", stats.routes);
    info!("  - Paths: {}", stats.paths);
    info!(
        "  - Definitions: {} declared, {} implicit",
        stats.definitions, stats.implicit_models
    );
    if !scan_result.warnings.is_empty() {
        info!("  - Warnings: {}", scan_result.warnings.len());
    }

    Ok(())
}
