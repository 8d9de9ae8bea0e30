//! Annotation parsing: classifying comment blocks and reading their tag grammars.
//!
//! Blocks are classified by their first line, in priority order:
//!
//! 1. `@apiDefine <Name>` - a reusable Definition
//! 2. `@apiModel <Name>` - a Model, stored in the same table as Definitions
//! 3. `@apiDescribe <Name>` - a reusable Description
//! 4. anything else - a route candidate, read by [`route::parse_route`] once
//!    every Definition and Description of the source tree is known
//!
//! # Example
//!
//! ```
//! use apidoc_swagger::annotation::Collector;
//! use apidoc_swagger::source::SourceFile;
//!
//! let source = SourceFile::new(
//!     "users.js",
//!     "/**\n * @apiDefine Paging\n * @apiParam {Number} limit page size\n */\n",
//! );
//! let mut collector = Collector::new();
//! collector.add_source(&source).unwrap();
//! let catalog = collector.finish();
//! assert!(catalog.definitions.contains_key("Paging"));
//! ```

mod cursor;
pub mod field;
pub mod route;

use crate::comment::{extract_blocks, CommentBlock};
use crate::error::Result;
use crate::model::{DefinitionTable, DescriptionTable, FieldMap};
use crate::source::SourceFile;
use cursor::{is_word, scan_tag};
use log::debug;

/// What a comment block turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// `@apiDefine` or `@apiModel`
    Definition { name: String, fields: FieldMap },
    /// `@apiDescribe`
    Description { name: String, lines: Vec<String> },
    /// Everything else, kept for the route pass
    RouteCandidate(CommentBlock),
}

/// Classify a block and read it if it is a Definition, Model or Description.
///
/// # Errors
///
/// Fails when a Definition/Model field carries an unreadable type expression.
pub fn classify(block: CommentBlock) -> Result<Entity> {
    let first = block.first_line();

    if let Some(name) =
        declared_name(first, "@apiDefine").or_else(|| declared_name(first, "@apiModel"))
    {
        let fields = field::extract_fields(block.body()).map_err(|e| e.in_file(&block.source))?;
        return Ok(Entity::Definition { name, fields });
    }

    if let Some(name) = scan_tag(first, "@apiDescribe", |c| Some(c.take_while(is_word))) {
        return Ok(Entity::Description {
            name: name.to_string(),
            lines: block.body().to_vec(),
        });
    }

    Ok(Entity::RouteCandidate(block))
}

/// `@apiDefine <ws>+ <word>+`
fn declared_name(line: &str, tag: &str) -> Option<String> {
    scan_tag(line, tag, |c| {
        c.skip_ws();
        c.take_while1(is_word).map(str::to_string)
    })
}

/// Everything collected from a source tree in the first pass.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Definitions and Models by name, last declaration wins
    pub definitions: DefinitionTable,
    /// Descriptions by name, last declaration wins
    pub descriptions: DescriptionTable,
    /// Blocks to be read as routes in the second pass
    pub route_candidates: Vec<CommentBlock>,
    /// Number of comment blocks seen
    pub block_count: usize,
}

/// First pass: accumulates every non-route block across all source files.
///
/// Routes may refer to Definitions declared in files processed later, so
/// route candidates are only stored here and read by the resolver.
#[derive(Debug, Default)]
pub struct Collector {
    catalog: Catalog,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract and classify every comment block of one source file.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable type expression in a Definition/Model.
    pub fn add_source(&mut self, source: &SourceFile) -> Result<()> {
        debug!("Collecting annotations from {}", source.identifier);

        for block in extract_blocks(&source.identifier, &source.content) {
            self.catalog.block_count += 1;
            match classify(block)? {
                Entity::Definition { name, fields } => {
                    if self.catalog.definitions.contains_key(&name) {
                        debug!("Definition {} redeclared in {}", name, source.identifier);
                    }
                    self.catalog.definitions.insert(name, fields);
                }
                Entity::Description { name, lines } => {
                    self.catalog.descriptions.insert(name, lines);
                }
                Entity::RouteCandidate(block) => self.catalog.route_candidates.push(block),
            }
        }

        Ok(())
    }

    pub fn finish(self) -> Catalog {
        debug!(
            "Collected {} definitions, {} descriptions, {} route candidates",
            self.catalog.definitions.len(),
            self.catalog.descriptions.len(),
            self.catalog.route_candidates.len()
        );
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeDescriptor;

    fn block(lines: &[&str]) -> CommentBlock {
        CommentBlock {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            source: "a.js".to_string(),
        }
    }

    #[test]
    fn test_classify_definition() {
        let entity = classify(block(&[
            " * @apiDefine Paging",
            " * @apiParam {Number} [limit] page size",
            " * @apiParam {Number} [offset] first row",
        ]))
        .unwrap();

        match entity {
            Entity::Definition { name, fields } => {
                assert_eq!(name, "Paging");
                assert_eq!(fields.len(), 2);
                assert!(fields["limit"].optional);
                assert_eq!(fields["offset"].type_desc, TypeDescriptor::scalar("Number"));
            }
            other => panic!("expected a definition, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_model_uses_definition_table() {
        let entity = classify(block(&[" * @apiModel   User", " * @apiParam {String} name"])).unwrap();
        assert!(matches!(entity, Entity::Definition { ref name, .. } if name == "User"));
    }

    #[test]
    fn test_define_wins_over_describe() {
        let entity = classify(block(&["@apiDefine A @apiDescribe B"])).unwrap();
        assert!(matches!(entity, Entity::Definition { ref name, .. } if name == "A"));
    }

    #[test]
    fn test_classify_description() {
        let entity = classify(block(&[" * @apiDescribe Notes", " * line one", "", " * line two"])).unwrap();
        assert_eq!(
            entity,
            Entity::Description {
                name: "Notes".to_string(),
                lines: vec![" * line one".to_string(), String::new(), " * line two".to_string()],
            }
        );
    }

    #[test]
    fn test_everything_else_is_a_route_candidate() {
        let candidate = block(&[" * @api {get} /a Do a"]);
        assert_eq!(
            classify(candidate.clone()).unwrap(),
            Entity::RouteCandidate(candidate)
        );
        assert!(matches!(
            classify(block(&[" * @apiDefine"])).unwrap(),
            Entity::RouteCandidate(_)
        ));
    }

    #[test]
    fn test_collector_last_definition_wins_in_first_position() {
        let mut collector = Collector::new();
        collector
            .add_source(&SourceFile::new(
                "a.js",
                "/**\n * @apiDefine A\n * @apiParam {String} x\n */\n/**\n * @apiDefine B\n */\n",
            ))
            .unwrap();
        collector
            .add_source(&SourceFile::new(
                "b.js",
                "/**\n * @apiDefine A\n * @apiParam {Number} y\n */\n/**\n * @api {get} /a Do a\n */\n",
            ))
            .unwrap();
        let catalog = collector.finish();

        let names: Vec<_> = catalog.definitions.keys().cloned().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(catalog.definitions["A"].contains_key("y"));
        assert!(!catalog.definitions["A"].contains_key("x"));
        assert_eq!(catalog.route_candidates.len(), 1);
        assert_eq!(catalog.route_candidates[0].source, "b.js");
        assert_eq!(catalog.block_count, 4);
    }

    #[test]
    fn test_collector_fails_on_bad_definition_type() {
        let mut collector = Collector::new();
        let result = collector.add_source(&SourceFile::new(
            "bad.js",
            "/**\n * @apiDefine A\n * @apiParam {!} x\n */\n",
        ));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad.js"));
    }
}
