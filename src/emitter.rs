//! Assembly of the final Swagger 2.0 document and writing it to disk.

use crate::config::GeneratorConfig;
use crate::model::FieldMap;
use crate::resolver::ResolvedApi;
use crate::schema_generator::render_definitions;
use crate::templates::{Templates, HEAD};
use anyhow::{Context, Result};
use log::debug;
use minijinja::context;
use std::fs;
use std::path::Path;

/// Models for the `definitions` block: every declared model, then the
/// implicit body models whose name no declared model already takes.
pub fn definition_models(api: &ResolvedApi) -> Vec<(&String, &FieldMap)> {
    let shadowed = api
        .implicit_models
        .keys()
        .filter(|name| api.definitions.contains_key(*name));
    for name in shadowed {
        debug!("Implicit model {} is shadowed by a declared model", name);
    }

    api.definitions
        .iter()
        .chain(
            api.implicit_models
                .iter()
                .filter(|(name, _)| !api.definitions.contains_key(*name)),
        )
        .collect()
}

/// Concatenate header, path fragments and definitions into the document text.
///
/// Lines are joined with `\n` and the document ends with a newline. Title
/// and host are written as single-quoted scalars.
///
/// # Errors
///
/// Fails when the header template cannot be rendered.
pub fn emit(
    templates: &Templates,
    config: &GeneratorConfig,
    path_lines: &[String],
    api: &ResolvedApi,
) -> crate::error::Result<String> {
    let definitions = render_definitions(definition_models(api));

    let mut lines = templates.render_lines(
        HEAD,
        context! {
            title => &config.title,
            host => &config.host,
            base_path => &config.base_path,
        },
    )?;
    lines.extend_from_slice(path_lines);
    lines.extend(definitions);
    debug!("Emitting document with {} lines", lines.len());

    let mut document = lines.join("\n");
    document.push('\n');
    Ok(document)
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
