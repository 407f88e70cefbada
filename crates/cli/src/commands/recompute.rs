use std::path::Path;

use super::{destination, emit_form, open_form};
use crate::config::AppraiseConfig;
use crate::{DataArgs, OutArgs, OutputFormat};

/// Settle a saved form: full passes until nothing changes. Overrides are
/// kept; use `edit --regenerate` to clear them.
pub(crate) fn cmd_recompute(
    form_path: &Path,
    data: &DataArgs,
    out: &OutArgs,
    config: &AppraiseConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, String> {
    let (mut form, _) = open_form(form_path, data, config)?;
    let report = form.settle().map_err(|e| format!("error: {}", e))?;
    emit_form(&form, &report, destination(out, form_path), output, quiet)?;
    Ok(true)
}
