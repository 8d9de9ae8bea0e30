//! Fixed YAML fragments of the document, rendered with minijinja.
//!
//! Free text reaches the document through one of two filters:
//! `quoted` emits a single-quoted YAML scalar, `html` HTML-escapes text
//! placed between single quotes by the template itself.

use crate::error::Result;
use crate::schema_generator::escape;
use minijinja::{AutoEscape, Environment, Value};

pub const HEAD: &str = "head";
pub const PATH_HEADER: &str = "path_header";
pub const METHOD: &str = "method";
pub const PARAMETER: &str = "parameter";
pub const BODY_PARAMETER: &str = "body_parameter";

const HEAD_TEMPLATE: &str = r#"swagger: "2.0"
info:
  version: "0.0.1"
  title: {{ title|quoted }}
schemes:
- http
- https
host: {{ host|quoted }}
basePath: {{ base_path }}
paths:
"#;

const PATH_HEADER_TEMPLATE: &str = r#"  {{ path }}:
    x-swagger-router-controller: {{ controller|quoted }}
{% if quota %}
    x-a127-apply:
      defaultQuota: {}
{% endif %}
"#;

const METHOD_TEMPLATE: &str = r##"    {{ method }}:
      summary: {{ summary }}
      description: |{{ indicator }}
{% for line in description %}
        {{ line }}
{% endfor %}
      operationId: {{ operation_id }}
      consumes:
{% for media in consumes %}
        - {{ media }}
{% endfor %}
      produces:
{% for media in produces %}
        - {{ media }}
{% endfor %}
      tags:
        - {{ tag }}
{% if parameters %}
      parameters:
{% for line in parameters %}
{{ line }}
{% endfor %}
{% endif %}
      responses:
        default:
          description: Default Response
          schema:
            $ref: "#/definitions/{{ default_model }}"
{% for response in responses %}
        {{ response.code }}:
          description: '{{ response.description|html }}'
          schema:
            $ref: "#/definitions/{{ response.model }}"
{% endfor %}
"##;

const PARAMETER_TEMPLATE: &str = r#"        - in: {{ location }}
          name: {{ name }}
          description: '{{ description|html }}'
          required: {{ required }}
{% for line in type_lines %}
{{ line }}
{% endfor %}
"#;

const BODY_PARAMETER_TEMPLATE: &str = r##"        - in: body
          name: {{ name }}
          schema:
            $ref: "#/definitions/{{ model }}"
"##;

/// A single-quoted YAML scalar; embedded quotes are doubled.
pub fn yaml_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// The template environment shared by the document renderers.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// # Errors
    ///
    /// Fails when a built-in template does not compile.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("quoted", |value: String| yaml_quote(&value));
        env.add_filter("html", |value: String| escape(&value));

        env.add_template(HEAD, HEAD_TEMPLATE)?;
        env.add_template(PATH_HEADER, PATH_HEADER_TEMPLATE)?;
        env.add_template(METHOD, METHOD_TEMPLATE)?;
        env.add_template(PARAMETER, PARAMETER_TEMPLATE)?;
        env.add_template(BODY_PARAMETER, BODY_PARAMETER_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a template into lines without trailing whitespace.
    pub fn render_lines(&self, name: &str, ctx: Value) -> Result<Vec<String>> {
        let rendered = self.env.get_template(name)?.render(ctx)?;
        Ok(rendered
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yaml_quote() {
        assert_eq!(yaml_quote("Pet Store"), "'Pet Store'");
        assert_eq!(yaml_quote("Admin's: API"), "'Admin''s: API'");
    }

    #[test]
    fn test_head() {
        let templates = Templates::new().unwrap();
        let lines = templates
            .render_lines(HEAD, context! { title => "A: B", host => "h:1", base_path => "/" })
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "swagger: \"2.0\"",
                "info:",
                "  version: \"0.0.1\"",
                "  title: 'A: B'",
                "schemes:",
                "- http",
                "- https",
                "host: 'h:1'",
                "basePath: /",
                "paths:",
            ]
        );
    }

    #[test]
    fn test_path_header_quota_block() {
        let templates = Templates::new().unwrap();
        let without = templates
            .render_lines(PATH_HEADER, context! { path => "/a", controller => "a.js", quota => false })
            .unwrap();
        let with = templates
            .render_lines(PATH_HEADER, context! { path => "/a", controller => "a.js", quota => true })
            .unwrap();

        assert_eq!(without, vec!["  /a:", "    x-swagger-router-controller: 'a.js'"]);
        assert_eq!(
            with,
            vec![
                "  /a:",
                "    x-swagger-router-controller: 'a.js'",
                "    x-a127-apply:",
                "      defaultQuota: {}",
            ]
        );
    }

    #[test]
    fn test_parameter_text_is_not_auto_escaped_as_json() {
        let templates = Templates::new().unwrap();
        let lines = templates
            .render_lines(
                PARAMETER,
                context! {
                    location => "query",
                    name => "q",
                    description => "a \"b\" & c",
                    required => false,
                    type_lines => vec!["          type: string"],
                },
            )
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "        - in: query",
                "          name: q",
                "          description: 'a &quot;b&quot; &amp; c'",
                "          required: false",
                "          type: string",
            ]
        );
    }
}
