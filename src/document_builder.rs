//! Rendering of resolved routes into the `paths` section.

use crate::error::Result;
use crate::model::{FieldSpec, Route, TypeKind};
use crate::schema_generator::{render_type, DEFAULT_RESPONSE_MODEL};
use crate::templates::{Templates, BODY_PARAMETER, METHOD, PARAMETER, PATH_HEADER};
use indexmap::IndexMap;
use log::debug;
use minijinja::context;

/// Name of the body parameter bound to a route's implicit model
const IMPLICIT_BODY_NAME: &str = "body";

/// Document builder - renders routes into `paths` fragments
///
/// Routes sharing a path share one fragment: the path header is written
/// once, followed by one method block per route in the order routes were
/// added.
pub struct DocumentBuilder<'t> {
    templates: &'t Templates,
    /// Emit the `x-a127-apply` default quota marker under each path
    include_quota: bool,
    /// Raw path pattern -> rendered lines, in first-encounter order
    paths: IndexMap<String, Vec<String>>,
}

impl<'t> DocumentBuilder<'t> {
    pub fn new(templates: &'t Templates, include_quota: bool) -> Self {
        debug!("Initializing DocumentBuilder (quota marker: {})", include_quota);
        Self {
            templates,
            include_quota,
            paths: IndexMap::new(),
        }
    }

    /// Render a route and append it to the fragment of its path
    ///
    /// # Errors
    ///
    /// Fails when a fragment template cannot be rendered.
    pub fn add_route(&mut self, route: &Route) -> Result<()> {
        debug!("Adding route: {} {}", route.method.as_str(), route.path);

        if !self.paths.contains_key(&route.path) {
            let header = self.templates.render_lines(
                PATH_HEADER,
                context! {
                    path => route.document_path(),
                    controller => &route.controller,
                    quota => self.include_quota,
                },
            )?;
            self.paths.insert(route.path.clone(), header);
        }

        let (indicator, description) = description_text(&route.description);
        let method = self.templates.render_lines(
            METHOD,
            context! {
                method => route.method.as_str(),
                summary => &route.summary,
                indicator => indicator,
                description => description,
                operation_id => &route.operation_id,
                consumes => &route.consumes,
                produces => &route.produces,
                tag => &route.tag,
                parameters => self.render_parameters(route)?,
                default_model => DEFAULT_RESPONSE_MODEL,
                responses => &route.responses,
            },
        )?;

        if let Some(lines) = self.paths.get_mut(&route.path) {
            lines.extend(method);
        }
        Ok(())
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Rendered lines of every path fragment, in path declaration order
    pub fn build(self) -> Vec<String> {
        debug!("Building {} path fragments", self.paths.len());
        self.paths.into_values().flatten().collect()
    }

    /// One `in: <location>` parameter entry.
    fn render_parameter(&self, location: &str, name: &str, spec: &FieldSpec, required: bool) -> Result<Vec<String>> {
        // the any-type has no parameter schema
        let type_lines = if spec.type_desc.kind == TypeKind::Any {
            Vec::new()
        } else {
            render_type(&spec.type_desc, None, 10)
        };
        self.templates.render_lines(
            PARAMETER,
            context! {
                location => location,
                name => name,
                description => &spec.description,
                required => required,
                type_lines => type_lines,
            },
        )
    }

    fn render_body_parameter(&self, name: &str, model: &str) -> Result<Vec<String>> {
        self.templates
            .render_lines(BODY_PARAMETER, context! { name => name, model => model })
    }

    /// Entries of the `parameters` section: header, then path, then query,
    /// then body bindings.
    ///
    /// Object-like "other" parameters never become query parameters; they only
    /// travel in the implicit body model. An empty list omits the section.
    fn render_parameters(&self, route: &Route) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        if route.params.is_empty() {
            return Ok(entries);
        }

        let partition = route.partition();

        for (name, spec) in &partition.header {
            entries.extend(self.render_parameter("header", name, spec, !spec.optional)?);
        }
        for (name, spec) in &partition.path {
            entries.extend(self.render_parameter("path", name, spec, true)?);
        }
        for (name, spec) in &partition.other {
            if spec.type_desc.is_object_like() {
                debug!("Parameter {} of {} only travels in the body", name, route.path);
                continue;
            }
            entries.extend(self.render_parameter("query", name, spec, !spec.optional)?);
        }

        if route.method.is_mutating() {
            // Swagger 2 allows one body parameter per operation: declared
            // `@apiBody` bindings replace the implicit model binding, which
            // then only appears under `definitions`.
            if !route.body.is_empty() {
                for binding in &route.body {
                    entries.extend(self.render_body_parameter(&binding.name, &binding.model)?);
                }
            } else if let Some(model) = &route.implicit_model {
                entries.extend(self.render_body_parameter(IMPLICIT_BODY_NAME, model)?);
            }
        }

        Ok(entries)
    }
}

/// Text of the `description` literal block and its indentation indicator.
///
/// Comment decoration (`*` gutters) is stripped and the text dedented. When
/// the first line still starts with whitespace the explicit indicator `2`
/// keeps the block well-formed.
fn description_text(raw: &[String]) -> (&'static str, Vec<&str>) {
    let cleaned: Vec<&str> = raw
        .iter()
        .map(|line| {
            let trimmed = line.trim_end();
            match trimmed.trim_start().strip_prefix('*') {
                Some(text) => text.strip_prefix(' ').unwrap_or(text),
                None => trimmed,
            }
        })
        .collect();

    let margin = cleaned
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let body: Vec<&str> = cleaned
        .iter()
        .copied()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.get(margin..).unwrap_or_else(|| line.trim_start())
            }
        })
        .collect();

    let indented_first = body
        .iter()
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with(char::is_whitespace));

    (if indented_first { "2" } else { "" }, body)
}
