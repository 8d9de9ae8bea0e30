//! apidoc-swagger - Swagger 2.0 documents from apidoc-style annotation comments.
//!
//! Controllers describe their routes in `/** ... */` comment blocks using
//! `@api`, `@apiParam`, `@apiDefine` and related tags. This library reads
//! those blocks from a set of source files and renders a single Swagger 2.0
//! YAML document.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Finds controller source files in a directory tree
//! 2. [`source`] - Reads them into [`source::SourceFile`] values
//! 3. [`comment`] - Splits file contents into comment blocks
//! 4. [`annotation`] - Classifies blocks and reads their tag grammars
//! 5. [`resolver`] - Merges routes with the Definitions they reference
//! 6. [`document_builder`] - Renders the `paths` fragments
//! 7. [`schema_generator`] - Renders types and models into `definitions`
//! 8. [`templates`] - The fixed YAML fragments, as minijinja templates
//! 9. [`emitter`] - Assembles the document and writes it out
//!
//! # Example Usage
//!
//! ```
//! use apidoc_swagger::{config::GeneratorConfig, generate, source::SourceFile};
//!
//! let controller = SourceFile::new(
//!     "items.js",
//!     r#"
//! /**
//!  * @api {get} /items/:id Get one item
//!  * @apiName getItem
//!  * @apiGroup Items
//!  * @apiParam {String} id item id
//!  */
//! "#,
//! );
//! let config = GeneratorConfig::new("Items API", "localhost:8080");
//! let yaml = generate(&[controller], &config).unwrap();
//! assert!(yaml.contains("  /items/{id}:"));
//! assert!(yaml.contains("      operationId: getItem"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod cli;
pub mod comment;
pub mod config;
pub mod document_builder;
pub mod emitter;
pub mod error;
pub mod model;
pub mod resolver;
pub mod scanner;
pub mod schema_generator;
pub mod source;
pub mod templates;

use annotation::Collector;
use config::GeneratorConfig;
use document_builder::DocumentBuilder;
use log::debug;
use resolver::Resolver;
use serde::Serialize;
use source::SourceFile;
use templates::Templates;

/// A generated document together with counts describing what went into it.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub yaml: String,
    pub stats: GenerationStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub files: usize,
    pub blocks: usize,
    pub routes: usize,
    pub paths: usize,
    pub definitions: usize,
    pub implicit_models: usize,
}

/// Generate the Swagger document for a set of source files.
///
/// # Errors
///
/// Fails when any `@apiParam`/`@apiHeader` line carries an unreadable type
/// expression, or when a document template cannot be rendered; no partial
/// document is produced.
pub fn generate(sources: &[SourceFile], config: &GeneratorConfig) -> error::Result<String> {
    generate_document(sources, config).map(|doc| doc.yaml)
}

/// [`generate`], also reporting what was collected.
pub fn generate_document(
    sources: &[SourceFile],
    config: &GeneratorConfig,
) -> error::Result<GeneratedDocument> {
    let mut collector = Collector::new();
    for source in sources {
        collector.add_source(source)?;
    }
    let catalog = collector.finish();
    let blocks = catalog.block_count;

    let api = Resolver::new(catalog).resolve()?;

    let templates = Templates::new()?;
    let mut builder = DocumentBuilder::new(&templates, config.include_quota);
    for route in api.routes.values() {
        builder.add_route(route)?;
    }
    let paths = builder.path_count();
    let path_lines = builder.build();

    let stats = GenerationStats {
        files: sources.len(),
        blocks,
        routes: api.routes.len(),
        paths,
        definitions: api.definitions.len(),
        implicit_models: api.implicit_models.len(),
    };
    debug!("Generation stats: {:?}", stats);

    Ok(GeneratedDocument {
        yaml: emitter::emit(&templates, config, &path_lines, &api)?,
        stats,
    })
}
