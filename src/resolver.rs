use crate::annotation::route::{parse_route, RouteDraft};
use crate::annotation::Catalog;
use crate::error::Result;
use crate::model::{route_param_names, DefinitionTable, DescriptionTable, FieldMap, Route, RouteKey};
use indexmap::IndexMap;
use inflections::case::{to_camel_case, to_pascal_case};
use log::{debug, log_enabled, Level};

/// Resolver - second pass over the route candidates of a [`Catalog`]
///
/// Owns the Definition and Description tables collected in the first pass
/// and turns every route draft into a [`Route`] with its references merged.
pub struct Resolver {
    definitions: DefinitionTable,
    descriptions: DescriptionTable,
    route_candidates: Vec<crate::comment::CommentBlock>,
}

/// The resolved model handed to the renderers.
#[derive(Debug, Default)]
pub struct ResolvedApi {
    /// Routes by `(method, path)`, in first-declaration order
    pub routes: IndexMap<RouteKey, Route>,
    /// Declared Definitions and Models
    pub definitions: DefinitionTable,
    /// Models built from the non-header, non-path parameters of mutating routes
    pub implicit_models: DefinitionTable,
}

impl Resolver {
    pub fn new(catalog: Catalog) -> Self {
        debug!(
            "Initializing Resolver with {} definitions and {} descriptions",
            catalog.definitions.len(),
            catalog.descriptions.len()
        );
        Self {
            definitions: catalog.definitions,
            descriptions: catalog.descriptions,
            route_candidates: catalog.route_candidates,
        }
    }

    /// Resolve every route candidate.
    ///
    /// A later route with the same method and path replaces the earlier one
    /// but keeps its position.
    ///
    /// # Errors
    ///
    /// Fails when an inline parameter carries an unreadable type expression.
    pub fn resolve(mut self) -> Result<ResolvedApi> {
        let mut routes: IndexMap<RouteKey, Route> = IndexMap::new();

        for block in std::mem::take(&mut self.route_candidates) {
            let Some(draft) = parse_route(&block)? else {
                continue;
            };
            let route = self.resolve_route(draft);
            debug!("Resolved route: {} {}", route.method.as_str(), route.path);
            routes.insert((route.method, route.path.clone()), route);
        }

        let implicit_models = register_implicit_models(&mut routes);

        if log_enabled!(Level::Debug) {
            debug!(
                "Resolved definitions: {}",
                serde_json::to_string_pretty(&self.definitions).unwrap_or_default()
            );
        }

        Ok(ResolvedApi {
            routes,
            definitions: self.definitions,
            implicit_models,
        })
    }

    /// Merge a route draft with the Definitions and Descriptions it references.
    pub fn resolve_route(&self, draft: RouteDraft) -> Route {
        let mut params = self.merge_uses(&draft.uses);
        for (name, spec) in draft.inline_params {
            params.insert(name, spec);
        }

        let description = draft
            .descriptions
            .iter()
            .filter_map(|name| {
                let lines = self.descriptions.get(name);
                if lines.is_none() {
                    debug!("@apiDescription {} does not name a known description", name);
                }
                lines
            })
            .flatten()
            .cloned()
            .collect();

        Route {
            controller: draft.controller,
            method: draft.method,
            route_params: route_param_names(&draft.path),
            path: draft.path,
            operation_id: to_camel_case(&draft.name),
            tag: draft.group,
            summary: draft.summary,
            description,
            params,
            body: draft.body,
            consumes: draft.consumes,
            produces: draft.produces,
            responses: draft.responses,
            implicit_model: None,
        }
    }

    /// Fields of every used Definition, later references overwriting earlier ones.
    fn merge_uses(&self, uses: &[String]) -> FieldMap {
        let mut params = FieldMap::new();
        for name in uses {
            match self.definitions.get(name) {
                Some(fields) => {
                    for (field, spec) in fields {
                        params.insert(field.clone(), spec.clone());
                    }
                }
                // unknown names contribute nothing
                None => debug!("@apiUse {} does not name a known definition", name),
            }
        }
        params
    }
}

/// Register the "other" parameters of `post`/`put`/`patch` routes as models
/// named after the PascalCase operation id.
fn register_implicit_models(routes: &mut IndexMap<RouteKey, Route>) -> DefinitionTable {
    let mut models = DefinitionTable::new();

    for route in routes.values_mut() {
        if !route.method.is_mutating() || route.operation_id.is_empty() {
            continue;
        }
        let other: FieldMap = route
            .partition()
            .other
            .into_iter()
            .map(|(name, spec)| (name.to_string(), spec.clone()))
            .collect();
        if other.is_empty() {
            continue;
        }

        let model_name = to_pascal_case(&route.operation_id);
        debug!(
            "Registering implicit model {} for {} {}",
            model_name,
            route.method.as_str(),
            route.path
        );
        models.insert(model_name.clone(), other);
        route.implicit_model = Some(model_name);
    }

    models
}
