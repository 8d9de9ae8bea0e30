//! `@apiParam` / `@apiHeader` field grammar, shared by Definitions, Models and routes.
//!
//! ```text
//! @apiParam  [(location)] {type-expr} name-token [description]
//! @apiHeader [(location)] {type-expr} name-token [description]
//! ```
//!
//! Type expressions:
//!
//! | literal              | meaning                                   |
//! |----------------------|-------------------------------------------|
//! | `{String}`           | scalar                                    |
//! | `{#User}`            | reference to a Definition/Model           |
//! | `{Number[]}`         | array of scalars (or `{#User[]}`)         |
//! | `{String}{1..10}`    | `minLength`/`maxLength` (positive only)   |
//! | `{Number}{1-5}`      | `min`/`max` (positive only)               |
//! | `{String}{'a','b'}`  | enumerated values                         |
//! | `{String={'a','b'}}` | enumerated values                         |
//!
//! The constraint may also be nested, as in `{String{1..10}}`.

use super::cursor::{is_word, scan_tag, Cursor};
use crate::error::{Error, Result};
use crate::model::{FieldMap, FieldSpec, Range, TypeDescriptor, TypeKind};
use log::{debug, warn};

/// Syntactic pieces of one field line, before the type token is interpreted.
#[derive(Debug, PartialEq, Eq)]
struct RawField<'a> {
    /// Contents of the outer braces of the type token
    type_expr: &'a str,
    name: &'a str,
    /// Name token was written as `[name]`
    bracketed: bool,
    description: &'a str,
    is_header: bool,
}

/// Extract every field declared in `lines`, in declaration order.
///
/// Lines without a field tag are ignored, as are fields with dotted names
/// (`user.name`). When a name is declared twice the first declaration wins.
///
/// # Errors
///
/// Returns [`Error::TypeExpression`] when a type token cannot be read.
pub fn extract_fields<S: AsRef<str>>(lines: &[S]) -> Result<FieldMap> {
    let mut fields = FieldMap::new();

    for line in lines {
        let line = line.as_ref();
        let Some((name, spec)) = parse_field_line(line)? else {
            continue;
        };
        if fields.contains_key(&name) {
            debug!("Ignoring repeated field `{}`", name);
            continue;
        }
        fields.insert(name, spec);
    }

    Ok(fields)
}

/// Parse a single annotation line into a named field, if it declares one.
pub fn parse_field_line(line: &str) -> Result<Option<(String, FieldSpec)>> {
    let Some(raw) = raw_field(line) else {
        return Ok(None);
    };
    if raw.name.contains('.') {
        debug!("Skipping nested field `{}`", raw.name);
        return Ok(None);
    }

    let type_desc = parse_type_expr(raw.type_expr).map_err(|message| Error::TypeExpression {
        file: String::new(),
        line: line.to_string(),
        message,
    })?;

    let preceded = preceded_by_bracket(line, raw.name);
    if preceded != raw.bracketed {
        warn!(
            "Field `{}` is marked optional only by a `[` elsewhere on the line: {}",
            raw.name,
            line.trim()
        );
    }

    let spec = FieldSpec {
        type_desc,
        optional: raw.bracketed || preceded,
        description: raw.description.to_string(),
        is_header: raw.is_header,
    };
    Ok(Some((raw.name.to_string(), spec)))
}

/// `@apiHeader` takes precedence when a line carries both tags.
fn raw_field(line: &str) -> Option<RawField<'_>> {
    scan_tag(line, "@apiHeader", |c| field_body(c, true))
        .or_else(|| scan_tag(line, "@apiParam", |c| field_body(c, false)))
}

fn field_body<'a>(cursor: &mut Cursor<'a>, is_header: bool) -> Option<RawField<'a>> {
    // optional `(location) `, which carries no meaning for the document
    if cursor.eat('(') {
        cursor.take_while1(is_word)?;
        if !cursor.eat(')') || !cursor.eat_ws() {
            return None;
        }
    }

    let token = cursor.take_while(|c| !c.is_whitespace());
    if token.len() < 3 || !token.starts_with('{') || !token.ends_with('}') {
        return None;
    }
    let type_expr = &token[1..token.len() - 1];
    if !cursor.eat_ws() {
        return None;
    }

    let opened = cursor.eat('[');
    let name_start = cursor.rest();
    let mut name_len = cursor.take_while1(|c| is_word(c) || c == '.')?.len();
    if cursor.eat_str("[]") {
        name_len += 2;
    }
    let name = &name_start[..name_len];
    // size hints such as `name{1..3}` and defaults such as `[name=10]`
    cursor.take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '{' | '}'));
    if cursor.eat('=') {
        cursor.take_while(is_word);
    }
    let closed = cursor.eat(']');
    cursor.eat_ws();

    let rest = cursor.rest();
    let description = if is_header {
        rest.split('*').next().unwrap_or("")
    } else {
        rest
    };

    Some(RawField {
        type_expr,
        name,
        bracketed: opened && closed,
        description,
        is_header,
    })
}

/// Whether a `[` (optionally followed by whitespace) directly precedes `name` somewhere on the line.
fn preceded_by_bracket(line: &str, name: &str) -> bool {
    line.match_indices('[')
        .any(|(idx, _)| line[idx + 1..].trim_start().starts_with(name))
}

/// Read the contents of a `{...}` type token.
///
/// Fails when the expression does not start with a type name or carries
/// trailing text the grammar does not know.
pub fn parse_type_expr(expr: &str) -> std::result::Result<TypeDescriptor, String> {
    let mut cursor = Cursor::new(expr);
    let is_reference = cursor.eat('#');
    let name = cursor
        .take_while1(is_word)
        .ok_or_else(|| format!("expected a type name, found `{}`", expr))?;
    let is_array = cursor.eat_str("[]");

    let mut enum_values = Vec::new();
    let mut range = None;
    if cursor.eat('=') {
        enum_values = parse_enum(strip_braces(cursor.rest()));
    } else if cursor.eat_str("}{") || cursor.eat('{') {
        let constraint = strip_braces(cursor.rest());
        match parse_range(constraint) {
            Some(parsed) => range = Some(parsed),
            None => enum_values = parse_enum(constraint),
        }
    } else if !cursor.is_empty() {
        return Err(format!("unexpected `{}` after type `{}`", cursor.rest(), name));
    }

    let element = if is_reference {
        TypeKind::Reference(name.to_string())
    } else if name.eq_ignore_ascii_case("any") {
        TypeKind::Any
    } else {
        TypeKind::Scalar(first_upper(name))
    };
    let kind = if is_array {
        TypeKind::Array(Box::new(element))
    } else {
        element
    };

    Ok(TypeDescriptor {
        kind,
        enum_values,
        range: range.filter(|r: &Range| !r.is_empty()),
    })
}

fn strip_braces(s: &str) -> &str {
    let s = s.strip_prefix('{').unwrap_or(s);
    s.trim_end_matches('}')
}

/// `a..b` gives length bounds, `a-b` value bounds. Either side may be empty.
fn parse_range(constraint: &str) -> Option<Range> {
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let positive = |s: &str| s.parse::<i64>().ok().filter(|v| *v > 0);

    if let Some((low, high)) = constraint.split_once("..") {
        if digits(low) && digits(high) {
            return Some(Range {
                min_length: positive(low),
                max_length: positive(high),
                ..Default::default()
            });
        }
    }
    if let Some((low, high)) = constraint.split_once('-') {
        if digits(low) && digits(high) {
            return Some(Range {
                min: positive(low),
                max: positive(high),
                ..Default::default()
            });
        }
    }
    None
}

fn parse_enum(list: &str) -> Vec<String> {
    list.replace(['\'', '"'], "")
        .split(',')
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn first_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> (String, FieldSpec) {
        parse_field_line(line).unwrap().expect("line should declare a field")
    }

    #[test]
    fn test_scalar_param() {
        let (name, spec) = parse(" * @apiParam {String} id item id");

        assert_eq!(name, "id");
        assert_eq!(spec.type_desc, TypeDescriptor::scalar("String"));
        assert_eq!(spec.description, "item id");
        assert!(!spec.optional);
        assert!(!spec.is_header);
    }

    #[test]
    fn test_lowercase_scalar_is_capitalized() {
        let (_, spec) = parse("@apiParam {number} limit");
        assert_eq!(spec.type_desc, TypeDescriptor::scalar("Number"));
        assert_eq!(spec.description, "");
    }

    #[test]
    fn test_location_prefix_is_accepted() {
        let (name, spec) = parse(" * @apiParam (query) {Number} page page number");
        assert_eq!(name, "page");
        assert_eq!(spec.description, "page number");
    }

    #[test]
    fn test_array_and_reference_types() {
        let (_, spec) = parse("@apiParam {Number[]} ids list of ids");
        assert_eq!(
            spec.type_desc.kind,
            TypeKind::Array(Box::new(TypeKind::Scalar("Number".to_string())))
        );

        let (_, spec) = parse("@apiParam {#User[]} users the users");
        assert_eq!(
            spec.type_desc.kind,
            TypeKind::Array(Box::new(TypeKind::Reference("User".to_string())))
        );

        let (_, spec) = parse("@apiParam {#Address} address where");
        assert_eq!(spec.type_desc, TypeDescriptor::reference("Address"));
    }

    #[test]
    fn test_any_type() {
        let (_, spec) = parse("@apiParam {any} payload raw payload");
        assert_eq!(spec.type_desc.kind, TypeKind::Any);
    }

    #[test]
    fn test_length_range() {
        let (_, spec) = parse("@apiParam {String}{1..10} name display name");
        assert_eq!(
            spec.type_desc.range,
            Some(Range {
                min_length: Some(1),
                max_length: Some(10),
                ..Default::default()
            })
        );
        assert_eq!(spec.description, "display name");
    }

    #[test]
    fn test_range_drops_non_positive_bounds() {
        let desc = parse_type_expr("String}{0..8").unwrap();
        assert_eq!(
            desc.range,
            Some(Range {
                max_length: Some(8),
                ..Default::default()
            })
        );

        let desc = parse_type_expr("Number}{5-").unwrap();
        assert_eq!(
            desc.range,
            Some(Range {
                min: Some(5),
                ..Default::default()
            })
        );

        // nothing positive: no range at all
        assert_eq!(parse_type_expr("Number}{0-0").unwrap().range, None);
    }

    #[test]
    fn test_value_range() {
        let (_, spec) = parse("@apiParam {Number}{1-5} rating stars");
        assert_eq!(
            spec.type_desc.range,
            Some(Range {
                min: Some(1),
                max: Some(5),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_nested_range_form() {
        let desc = parse_type_expr("String{1..255}").unwrap();
        assert_eq!(desc.kind, TypeKind::Scalar("String".to_string()));
        assert_eq!(
            desc.range.unwrap().entries(),
            vec![("minLength", 1), ("maxLength", 255)]
        );
    }

    #[test]
    fn test_enum_forms() {
        let desc = parse_type_expr("String={'a','b'}").unwrap();
        assert_eq!(desc.enum_values, vec!["a", "b"]);
        assert_eq!(desc.range, None);

        let desc = parse_type_expr("String}{'asc','desc'").unwrap();
        assert_eq!(desc.enum_values, vec!["asc", "desc"]);

        let desc = parse_type_expr("String=\"on\",\"off\"").unwrap();
        assert_eq!(desc.enum_values, vec!["on", "off"]);
    }

    #[test]
    fn test_malformed_type_expression_is_an_error() {
        assert!(parse_type_expr("[]").is_err());
        assert!(parse_type_expr("#").is_err());
        assert!(parse_type_expr("Str-ing").is_err());

        let err = parse_field_line(" * @apiParam {$x} id").unwrap_err();
        assert!(err.to_string().contains("expected a type name"));
    }

    #[test]
    fn test_bracketed_name_is_optional() {
        let (name, spec) = parse("@apiParam {String} [nickname] optional nickname");
        assert_eq!(name, "nickname");
        assert!(spec.optional);
        assert_eq!(spec.description, "optional nickname");
    }

    #[test]
    fn test_stray_bracket_before_name_is_optional() {
        // opening bracket without a closing one
        let (name, spec) = parse("@apiParam {String} [nickname optional nickname");
        assert_eq!(name, "nickname");
        assert!(spec.optional);
        assert_eq!(spec.description, "optional nickname");
    }

    #[test]
    fn test_bare_name_is_required() {
        let (_, spec) = parse("@apiParam {String} nickname the nickname");
        assert!(!spec.optional);
    }

    #[test]
    fn test_default_value_is_discarded() {
        let (name, spec) = parse("@apiParam {Number} [limit=20] page size");
        assert_eq!(name, "limit");
        assert!(spec.optional);
        assert_eq!(spec.description, "page size");
    }

    #[test]
    fn test_header_tag() {
        let (name, spec) = parse(" * @apiHeader {String} Authorization bearer token */");
        assert_eq!(name, "Authorization");
        assert!(spec.is_header);
        assert_eq!(spec.description, "bearer token ");

        let (name, spec) = parse("@apiHeader {String} [X-Trace] trace id");
        // `-` ends the name token, the remainder is description
        assert_eq!(name, "X");
        assert!(spec.optional);
        assert_eq!(spec.description, "-Trace] trace id");
    }

    #[test]
    fn test_optional_header() {
        let (name, spec) = parse("@apiHeader {String} [Accept_Language] locale");
        assert_eq!(name, "Accept_Language");
        assert!(spec.optional);
        assert!(spec.is_header);
    }

    #[test]
    fn test_dotted_names_are_skipped() {
        assert!(parse_field_line("@apiParam {String} user.name the name")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_untagged_and_malformed_lines_are_ignored() {
        assert!(parse_field_line(" * some prose").unwrap().is_none());
        assert!(parse_field_line("@apiParam String id").unwrap().is_none());
        assert!(parse_field_line("@apiParam {String}").unwrap().is_none());
        assert!(parse_field_line("@apiParam (query {String} id").unwrap().is_none());
    }

    #[test]
    fn test_extract_fields_keeps_first_declaration() {
        let lines = vec![
            " * @apiParam {String} id first",
            " * not a field",
            " * @apiParam {Number} limit page size",
            " * @apiParam {Number} id second",
        ];
        let fields = extract_fields(&lines).unwrap();

        let names: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(names, vec!["id", "limit"]);
        assert_eq!(fields["id"].description, "first");
    }

    #[test]
    fn test_extract_fields_propagates_type_errors() {
        let lines = vec!["@apiParam {String} ok fine", "@apiParam {[]} broken"];
        assert!(extract_fields(&lines).is_err());
    }
}
