//! Rendering of type descriptors and models into `definitions` entries.

use crate::model::{FieldMap, TypeDescriptor, TypeKind};
use log::debug;
use serde_json::json;

/// Name of the placeholder schema every default response points at.
pub const DEFAULT_RESPONSE_MODEL: &str = "DefaultResponse";

/// `$ref` line pointing at a named definition
pub fn definition_ref(name: &str) -> String {
    format!("$ref: \"#/definitions/{}\"", name)
}

/// HTML-escape text placed inside single-quoted scalars, so a `'` can never end the quote.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the schema keys of a type, each line prefixed by `indent` spaces.
///
/// * references become a single `$ref`
/// * arrays get `type: array` and an `items` block rendered the same way
/// * scalars get `type`, then `enum`, range bounds and `description`
/// * the any-type renders as a flow mapping, `{}` or `{"description": ...}`
///
/// `description` is only rendered for model properties; parameters carry
/// their description on the parameter itself.
pub fn render_type(desc: &TypeDescriptor, description: Option<&str>, indent: usize) -> Vec<String> {
    let description = description.filter(|d| !d.is_empty());
    let mut lines = Vec::new();

    match &desc.kind {
        TypeKind::Any => {
            let value = match description {
                Some(text) => json!({ "description": escape(text) }),
                None => json!({}),
            };
            lines.push(value.to_string());
        }
        TypeKind::Reference(name) => lines.push(definition_ref(name)),
        TypeKind::Scalar(_) | TypeKind::Array(_) => {
            render_kind(&desc.kind, &mut lines);
            if !desc.enum_values.is_empty() {
                lines.push(format!("enum: {}", json!(desc.enum_values)));
            }
            if let Some(range) = &desc.range {
                for (key, value) in range.entries() {
                    lines.push(format!("{}: {}", key, value));
                }
            }
            if let Some(text) = description {
                lines.push(format!("description: '{}'", escape(text)));
            }
        }
    }

    indent_lines(lines, indent)
}

/// `type`/`$ref`/`items` keys for a bare kind, unindented.
fn render_kind(kind: &TypeKind, lines: &mut Vec<String>) {
    match kind {
        TypeKind::Any => lines.push("{}".to_string()),
        TypeKind::Reference(name) => lines.push(definition_ref(name)),
        TypeKind::Scalar(name) => lines.push(format!("type: {}", name.to_lowercase())),
        TypeKind::Array(items) => {
            lines.push("type: array".to_string());
            lines.push("items:".to_string());
            let mut item_lines = Vec::new();
            render_kind(items, &mut item_lines);
            lines.extend(indent_lines(item_lines, 2));
        }
    }
}

fn indent_lines(lines: Vec<String>, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    lines.into_iter().map(|line| format!("{}{}", pad, line)).collect()
}

/// Render one model as an entry of the `definitions` block.
///
/// ```text
///   Name:
///     type: object
///     required:
///       - id
///     properties:
///       id:
///         type: string
/// ```
pub fn render_model(name: &str, fields: &FieldMap) -> Vec<String> {
    debug!("Rendering model {} with {} fields", name, fields.len());

    let mut lines = vec![format!("  {}:", name), "    type: object".to_string()];

    let required: Vec<&String> = fields
        .iter()
        .filter(|(_, spec)| !spec.optional)
        .map(|(field, _)| field)
        .collect();
    if !required.is_empty() {
        lines.push("    required:".to_string());
        lines.extend(required.iter().map(|field| format!("      - {}", field)));
    }

    if !fields.is_empty() {
        lines.push("    properties:".to_string());
        for (field, spec) in fields {
            lines.push(format!("      {}:", field));
            lines.extend(render_type(&spec.type_desc, Some(&spec.description), 8));
        }
    }

    lines
}

/// Render the whole `definitions` block, closed by the `DefaultResponse` placeholder.
pub fn render_definitions<'a>(models: impl IntoIterator<Item = (&'a String, &'a FieldMap)>) -> Vec<String> {
    let mut lines = vec!["definitions:".to_string()];
    for (name, fields) in models {
        lines.extend(render_model(name, fields));
    }
    lines.push(format!("  {}: {{}}", DEFAULT_RESPONSE_MODEL));
    lines
}
