use std::path::Path;

use appraise_pricing::{Template, ValuationForm, ValuationMethod};

use super::{emit_form, load_inputs};
use crate::config::AppraiseConfig;
use crate::io::read_json;
use crate::{DataArgs, OutputFormat};

pub(crate) fn cmd_generate(
    method: ValuationMethod,
    template_path: &Path,
    data: &DataArgs,
    out: Option<&Path>,
    config: &AppraiseConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, String> {
    let template: Template = read_json(template_path, "template")?;
    let (surveys, context) = load_inputs(data, config)?;

    let missing = template.missing_mandatory(&surveys);
    for (survey_id, factor_code) in &missing {
        tracing::warn!(
            target: "appraise.cli",
            survey = %survey_id,
            factor = %factor_code,
            "survey lacks a mandatory comparative factor"
        );
    }

    let (form, report) =
        ValuationForm::generate(method, &template, surveys, context, config.engine())
            .map_err(|e| format!("error: {}", e))?;
    emit_form(&form, &report, out, output, quiet)?;
    Ok(true)
}
