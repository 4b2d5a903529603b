use askama::Template;
use std::path::Path;

use super::table::{DispatchEntry, DispatchTable};
use crate::config::{ForwardArg, GenerateConfig};
use crate::error::Result;

/// Template data for generating the dispatch function
#[derive(Template)]
#[template(path = "dispatch.rs.txt", escape = "none")]
pub struct DispatchTemplateData {
    /// `@generated` comment line, empty to omit
    pub header: String,
    pub function_name: String,
    pub key_param: String,
    /// Extra parameters after the key
    pub forward_args: Vec<ForwardArg>,
    /// Forwarded argument names, comma separated, as passed to the import routine
    pub call_args: String,
    pub import_fn: String,
    pub error_type: String,
    pub unknown_variant: String,
    /// Name bound to the unmatched key in the fallback arm
    pub binding: String,
    pub entries: Vec<DispatchEntry>,
}

impl DispatchTemplateData {
    pub fn new(table: &DispatchTable, config: &GenerateConfig, source: Option<&Path>) -> Self {
        let header = match (config.header, source) {
            (false, _) => String::new(),
            (true, Some(path)) => format!(
                "// @generated by dispatchgen from {}. Do not edit by hand.",
                display_path(path)
            ),
            (true, None) => "// @generated by dispatchgen. Do not edit by hand.".to_string(),
        };

        let call_args = config
            .forward_args
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        DispatchTemplateData {
            header,
            function_name: config.function_name.clone(),
            key_param: config.key_param.clone(),
            forward_args: config.forward_args.clone(),
            call_args,
            import_fn: config.import_fn.clone(),
            error_type: table.fallback.error_type.clone(),
            unknown_variant: table.fallback.unknown_variant.clone(),
            binding: table.fallback.binding.to_string(),
            entries: table.entries.clone(),
        }
    }
}

/// Render the dispatch function for `table`.
///
/// The result always ends with exactly one newline.
///
/// # Errors
///
/// Returns [`crate::DispatchGenError::Render`] if the template engine fails.
pub fn render_dispatch(
    table: &DispatchTable,
    config: &GenerateConfig,
    source: Option<&Path>,
) -> Result<String> {
    let rendered = DispatchTemplateData::new(table, config, source).render()?;
    let mut out = rendered.trim_end().to_string();
    out.push('\n');
    Ok(out)
}

/// Forward slashes regardless of platform so the header is stable across machines.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
