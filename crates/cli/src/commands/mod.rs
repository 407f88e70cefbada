//! Subcommand implementations.
//!
//! Every command returns `Ok(true)` on success, `Ok(false)` when it ran
//! but the result is a failure (validation issues), and `Err(message)`
//! when it could not run.

pub(crate) mod edit;
pub(crate) mod generate;
pub(crate) mod recompute;
pub(crate) mod rules;
pub(crate) mod validate;

use std::path::Path;

use serde_json::json;

use appraise_engine::{FieldValue, PassReport};
use appraise_pricing::{FormDocument, PricingContext, PropertyRecord, Survey, ValuationForm};

use crate::config::AppraiseConfig;
use crate::io::{read_json, to_pretty, write_json};
use crate::{DataArgs, OutArgs, OutputFormat};

pub(crate) fn load_inputs(
    data: &DataArgs,
    config: &AppraiseConfig,
) -> Result<(Vec<Survey>, PricingContext), String> {
    let surveys: Vec<Survey> = read_json(&data.surveys, "surveys")?;
    let property = match &data.property {
        Some(path) => read_json::<PropertyRecord>(path, "property")?,
        None => PropertyRecord::default(),
    };
    Ok((surveys, PricingContext::new(property, config.defaults.clone())))
}

pub(crate) fn open_form(
    form_path: &Path,
    data: &DataArgs,
    config: &AppraiseConfig,
) -> Result<(ValuationForm, Vec<Survey>), String> {
    let document: FormDocument = read_json(form_path, "form")?;
    let (surveys, context) = load_inputs(data, config)?;
    let form = ValuationForm::open(&document, &surveys, context, config.engine())
        .map_err(|e| format!("error: {}", e))?
        .with_max_passes(config.engine.max_passes);
    Ok((form, surveys))
}

fn number_json(value: Option<rust_decimal::Decimal>) -> serde_json::Value {
    value.map_or(serde_json::Value::Null, |d| FieldValue::Number(d).to_json())
}

fn number_text(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.normalize().to_string())
}

/// Write the form document, then report what changed.
///
/// Without a destination the document itself goes to stdout and no
/// summary is printed.
pub(crate) fn emit_form(
    form: &ValuationForm,
    report: &PassReport,
    destination: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let document = form.document();
    let Some(path) = destination else {
        println!("{}", to_pretty(&document)?);
        return Ok(());
    };
    write_json(path, &document)?;
    if quiet {
        return Ok(());
    }

    match output {
        OutputFormat::Json => {
            let writes: Vec<serde_json::Value> = report
                .writes
                .iter()
                .map(|w| json!({ "path": w.path, "value": w.value.to_json() }))
                .collect();
            let summary = json!({
                "method": form.method(),
                "form": path.display().to_string(),
                "final_value": number_json(form.final_value()),
                "final_value_rounded": number_json(form.final_value_rounded()),
                "writes": writes,
                "skipped": report.skipped,
                "overridden": document.overridden,
            });
            println!("{}", to_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!(
                "{} form written to {} ({} writes, {} user-owned fields skipped)",
                form.method(),
                path.display(),
                report.writes.len(),
                report.skipped.len()
            );
            println!("final value:         {}", number_text(form.final_value()));
            println!(
                "final value rounded: {}",
                number_text(form.final_value_rounded())
            );
        }
    }
    Ok(())
}

/// Resolve `--out` / `--in-place` against the input form path.
pub(crate) fn destination<'a>(out: &'a OutArgs, form_path: &'a Path) -> Option<&'a Path> {
    if out.in_place {
        Some(form_path)
    } else {
        out.out.as_deref()
    }
}
