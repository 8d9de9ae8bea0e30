/// Result type alias for the annotation pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised by the annotation pipeline.
///
/// Almost every malformed annotation is skipped silently; only a type
/// expression that cannot be read at all aborts the run.
#[derive(Debug)]
pub enum Error {
    /// A `{...}` type token on a `@apiParam`/`@apiHeader` line has an unexpected shape
    TypeExpression {
        /// Source file identifier the block came from
        file: String,
        /// The offending annotation line
        line: String,
        /// What the type reader expected
        message: String,
    },
    /// A document template failed to compile or render
    Template(minijinja::Error),
}

impl Error {
    /// Attach the source file identifier to an error raised while reading a block
    pub fn in_file(self, file: &str) -> Self {
        match self {
            Error::TypeExpression { line, message, .. } => Error::TypeExpression {
                file: file.to_string(),
                line,
                message,
            },
            other => other,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::TypeExpression { file, line, message } => {
                if file.is_empty() {
                    write!(f, "invalid type expression: {} in `{}`", message, line.trim())
                } else {
                    write!(
                        f,
                        "invalid type expression in {}: {} in `{}`",
                        file,
                        message,
                        line.trim()
                    )
                }
            }
            Error::Template(err) => write!(f, "failed to render document template: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::TypeExpression { .. } => None,
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Error::Template(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_file_and_line() {
        let err = Error::TypeExpression {
            file: String::new(),
            line: "  * @apiParam {[]} id".to_string(),
            message: "expected a type name".to_string(),
        }
        .in_file("controllers/items.js");

        let msg = err.to_string();
        assert!(msg.contains("controllers/items.js"));
        assert!(msg.contains("expected a type name"));
        assert!(msg.contains("`* @apiParam {[]} id`"));
    }

    #[test]
    fn test_display_without_file() {
        let err = Error::TypeExpression {
            file: String::new(),
            line: "@apiParam {=} id".to_string(),
            message: "expected a type name".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "invalid type expression: expected a type name in `@apiParam {=} id`"
        );
    }

    #[test]
    fn test_template_error_is_not_tagged_with_file() {
        let err: Error = minijinja::Error::new(minijinja::ErrorKind::TemplateNotFound, "missing").into();
        let err = err.in_file("a.js");

        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().starts_with("failed to render document template"));
    }
}
