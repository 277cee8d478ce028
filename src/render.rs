//! Generated Terraform artifact.
//!
//! The aggregated list ends up in a `locals` block that other modules read
//! as `local.<variable>`. The file carries a "DO NOT EDIT" header since it
//! is rewritten on every run.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::CidrcapError;
use crate::validation::validate_variable_name;

/// Name written into the generated-file header.
pub const GENERATOR: &str = "cidrcap";

/// JSON array with `", "` between items.
fn json_list<S: AsRef<str>>(items: &[S]) -> crate::error::Result<String> {
    let quoted = items
        .iter()
        .map(|s| serde_json::to_string(s.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CidrcapError::Render(e.to_string()))?;
    Ok(format!("[{}]", quoted.join(", ")))
}

/// Render the Terraform `locals` block holding `cidrs`.
///
/// # Examples
/// ```
/// use cidrcap::render::render_locals;
/// let tf = render_locals(&["10.0.0.0/23"], "cidrs", "cidrcap").unwrap();
/// assert!(tf.contains("# DO NOT EDIT"));
/// assert!(tf.contains("cidrs = [\"10.0.0.0/23\"]"));
/// ```
pub fn render_locals<S: AsRef<str>>(
    cidrs: &[S],
    variable: &str,
    generator: &str,
) -> crate::error::Result<String> {
    validate_variable_name(variable)?;
    if generator.contains('\n') || generator.contains('\r') {
        return Err(CidrcapError::Render(
            "generator name must be a single line".to_string(),
        ));
    }

    Ok(format!(
        "\n# This file is generated by {generator}\n\
         # DO NOT EDIT\n\
         locals {{\n    \
         # tflint-ignore: terraform_unused_declarations\n    \
         {variable} = {list}\n\
         }}\n",
        generator = generator,
        variable = variable,
        list = json_list(cidrs)?,
    ))
}

/// Write `content` to `path` atomically.
///
/// The data goes to a temporary file in the same directory, is synced, then
/// renamed over the target. Missing parent directories are created.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {:?}", parent_dir))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {:?}", path))?;

    Ok(())
}
