//! Entity model shared by the annotation parser, resolver and renderers.
//!
//! Every table in here is an [`IndexMap`]: output ordering is the order in
//! which names were first seen, and overwriting an entry keeps its slot.

use indexmap::IndexMap;
use serde::Serialize;

/// Field name -> field specification, in declaration order.
pub type FieldMap = IndexMap<String, FieldSpec>;

/// Definition/Model name -> fields.
pub type DefinitionTable = IndexMap<String, FieldMap>;

/// Description name -> text lines.
pub type DescriptionTable = IndexMap<String, Vec<String>>;

/// The shape of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    /// `{Any}`: no type information at all
    Any,
    /// A scalar such as `String` or `Number`
    Scalar(String),
    /// `{#Name}`: a reference to a Definition/Model
    Reference(String),
    /// `{Name[]}`: an array whose items are described by the inner kind
    Array(Box<TypeKind>),
}

/// Numeric bounds attached to a type expression.
///
/// `a..b` fills the length bounds, `a-b` the value bounds. Only positive
/// bounds are ever recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Range {
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(rename = "minLength")]
    pub min_length: Option<i64>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<i64>,
}

impl Range {
    /// Returns the bounds that are set, keyed by their rendered name.
    pub fn entries(&self) -> Vec<(&'static str, i64)> {
        [
            ("minLength", self.min_length),
            ("maxLength", self.max_length),
            ("min", self.min),
            ("max", self.max),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// A parsed `{...}` type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    /// Enumerated literal values, in declaration order
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            enum_values: Vec::new(),
            range: None,
        }
    }

    pub fn scalar(name: &str) -> Self {
        Self::new(TypeKind::Scalar(name.to_string()))
    }

    pub fn reference(name: &str) -> Self {
        Self::new(TypeKind::Reference(name.to_string()))
    }

    /// Whether values of this type can only travel inside a request body.
    ///
    /// Scalars named `Object`, the any-type and model references all qualify.
    pub fn is_object_like(&self) -> bool {
        match &self.kind {
            TypeKind::Any | TypeKind::Reference(_) => true,
            TypeKind::Scalar(name) => name.eq_ignore_ascii_case("object"),
            TypeKind::Array(_) => false,
        }
    }
}

/// One field of a Definition/Model, or one route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub type_desc: TypeDescriptor,
    pub optional: bool,
    pub description: String,
    #[serde(rename = "header")]
    pub is_header: bool,
}

/// HTTP methods accepted in a route declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Parse a method name case-insensitively; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    /// Lowercase name as used for the method key in the document
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// `post`, `put` and `patch` carry a request body
    pub fn is_mutating(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// An `@apiBody <name> <#Model>` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyBinding {
    pub name: String,
    pub model: String,
}

/// An `@apiResponse <code> <#Model> <description>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSpec {
    pub code: String,
    pub model: String,
    pub description: String,
}

/// Routes are unique per method and raw path pattern.
pub type RouteKey = (HttpMethod, String);

/// A fully resolved route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Source file identifier the route was declared in
    pub controller: String,
    pub method: HttpMethod,
    /// Raw path pattern, colon-prefixed parameters kept (`/items/:id`)
    pub path: String,
    /// Camel-cased `@apiName`
    pub operation_id: String,
    /// `@apiGroup`
    pub tag: String,
    pub summary: String,
    /// Lines spliced in from referenced Description blocks
    pub description: Vec<String>,
    /// Names of `:param` segments in `path`
    pub route_params: Vec<String>,
    /// Used definitions merged with inline parameters
    pub params: FieldMap,
    pub body: Vec<BodyBinding>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub responses: Vec<ResponseSpec>,
    /// Name of the implicit model built from the "other" parameters, if any
    pub implicit_model: Option<String>,
}

/// Parameters of a route split by where they travel.
///
/// The three groups never overlap: header wins over path, path over other.
#[derive(Debug, Default)]
pub struct ParamPartition<'a> {
    pub header: Vec<(&'a str, &'a FieldSpec)>,
    pub path: Vec<(&'a str, &'a FieldSpec)>,
    pub other: Vec<(&'a str, &'a FieldSpec)>,
}

impl Route {
    /// Split `params` into header, path and other parameters, keeping declaration order.
    pub fn partition(&self) -> ParamPartition<'_> {
        let mut partition = ParamPartition::default();
        for (name, spec) in &self.params {
            if spec.is_header {
                partition.header.push((name.as_str(), spec));
            } else if self.route_params.iter().any(|p| p == name) {
                partition.path.push((name.as_str(), spec));
            } else {
                partition.other.push((name.as_str(), spec));
            }
        }
        partition
    }

    /// Path pattern with `:param` segments rewritten to `{param}`
    pub fn document_path(&self) -> String {
        convert_path_format(&self.path)
    }
}

/// Collect the names of colon-prefixed segments (`/a/:id/b/:rev` -> `id`, `rev`).
pub fn route_param_names(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(idx) = rest.find(':') {
        let after = &rest[idx + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len > 0 {
            names.push(after[..len].to_string());
        }
        rest = &after[len..];
    }
    names
}

/// Convert `:param` placeholders into the `{param}` form used in the document.
pub fn convert_path_format(path: &str) -> String {
    let mut converted = String::with_capacity(path.len() + 2);
    let mut rest = path;
    while let Some(idx) = rest.find(':') {
        converted.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len > 0 {
            converted.push('{');
            converted.push_str(&after[..len]);
            converted.push('}');
        } else {
            converted.push(':');
        }
        rest = &after[len..];
    }
    converted.push_str(rest);
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(type_desc: TypeDescriptor, is_header: bool) -> FieldSpec {
        FieldSpec {
            type_desc,
            optional: false,
            description: String::new(),
            is_header,
        }
    }

    #[test]
    fn test_route_param_names() {
        assert_eq!(route_param_names("/items/:id"), vec!["id"]);
        assert_eq!(
            route_param_names("/users/:userId/posts/:post_id"),
            vec!["userId", "post_id"]
        );
        assert!(route_param_names("/items").is_empty());
    }

    #[test]
    fn test_convert_path_format() {
        assert_eq!(convert_path_format("/items/:id"), "/items/{id}");
        assert_eq!(
            convert_path_format("/a/:x/b/:y-z"),
            "/a/{x}/b/{y}-z"
        );
        assert_eq!(convert_path_format("/plain/path"), "/plain/path");
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("fetch"), None);
        assert!(HttpMethod::Put.is_mutating());
        assert!(!HttpMethod::Delete.is_mutating());
    }

    #[test]
    fn test_range_entries_skip_unset_bounds() {
        let range = Range {
            max_length: Some(10),
            ..Default::default()
        };
        assert_eq!(range.entries(), vec![("maxLength", 10)]);
        assert!(Range::default().is_empty());
    }

    #[test]
    fn test_object_like_types() {
        assert!(TypeDescriptor::new(TypeKind::Any).is_object_like());
        assert!(TypeDescriptor::scalar("Object").is_object_like());
        assert!(TypeDescriptor::reference("User").is_object_like());
        assert!(!TypeDescriptor::scalar("String").is_object_like());
        assert!(!TypeDescriptor::new(TypeKind::Array(Box::new(TypeKind::Scalar(
            "String".to_string()
        ))))
        .is_object_like());
    }

    #[test]
    fn test_partition_is_exclusive() {
        let mut params = FieldMap::new();
        params.insert("Authorization".to_string(), field(TypeDescriptor::scalar("String"), true));
        params.insert("id".to_string(), field(TypeDescriptor::scalar("String"), false));
        // a header named like a path segment stays a header
        params.insert("rev".to_string(), field(TypeDescriptor::scalar("Number"), true));
        params.insert("limit".to_string(), field(TypeDescriptor::scalar("Number"), false));

        let route = Route {
            controller: "items.js".to_string(),
            method: HttpMethod::Get,
            path: "/items/:id/:rev".to_string(),
            operation_id: "getItem".to_string(),
            tag: "Items".to_string(),
            summary: "Get item".to_string(),
            description: Vec::new(),
            route_params: route_param_names("/items/:id/:rev"),
            params,
            body: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            responses: Vec::new(),
            implicit_model: None,
        };

        let partition = route.partition();
        let names = |group: &[(&str, &FieldSpec)]| -> Vec<String> {
            group.iter().map(|(n, _)| n.to_string()).collect()
        };
        assert_eq!(names(&partition.header), vec!["Authorization", "rev"]);
        assert_eq!(names(&partition.path), vec!["id"]);
        assert_eq!(names(&partition.other), vec!["limit"]);
        assert_eq!(route.document_path(), "/items/{id}/{rev}");
    }
}
