use std::path::Path;
use std::str::FromStr;

use appraise_engine::{parse_decimal, FieldPath, FieldValue, PassReport};
use appraise_pricing::{PricingError, QualitativeRow};

use super::{destination, emit_form, open_form};
use crate::config::AppraiseConfig;
use crate::{DataArgs, OutArgs, OutputFormat};

/// One `--set PATH=VALUE` argument.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    pub path: FieldPath,
    pub value: FieldValue,
}

/// Numbers become numbers, `true`/`false` booleans, `null` clears the
/// cell; anything else is text.
fn parse_value(raw: &str) -> FieldValue {
    match raw.trim() {
        "null" => FieldValue::Null,
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        other => match parse_decimal(other) {
            Some(d) => FieldValue::Number(d),
            None => FieldValue::Text(raw.to_string()),
        },
    }
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", s))?;
        let path = FieldPath::parse(path.trim()).map_err(|e| e.to_string())?;
        Ok(Assignment {
            path,
            value: parse_value(value),
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct EditRequest {
    pub set: Vec<Assignment>,
    pub reset: Vec<String>,
    pub add_survey: Vec<String>,
    pub remove_survey: Option<usize>,
    pub add_row: Vec<String>,
    pub remove_row: Option<usize>,
    pub regenerate: bool,
}

/// Fold one step's report into the running total. A field skipped by
/// several steps is listed once.
fn merge_report(total: &mut PassReport, step: PassReport) {
    total.writes.extend(step.writes);
    for path in step.skipped {
        if !total.skipped.contains(&path) {
            total.skipped.push(path);
        }
    }
    total.unchanged += step.unchanged;
}

/// Shape changes first, then regeneration, resets and finally the edits,
/// each followed by its own recomputation.
pub(crate) fn cmd_edit(
    form_path: &Path,
    data: &DataArgs,
    request: &EditRequest,
    out: &OutArgs,
    config: &AppraiseConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, String> {
    let (mut form, surveys) = open_form(form_path, data, config)?;
    let mut report = PassReport::default();
    let mut absorb = |step: Result<PassReport, PricingError>| -> Result<(), String> {
        merge_report(&mut report, step.map_err(|e| format!("error: {}", e))?);
        Ok(())
    };

    if let Some(column) = request.remove_survey {
        absorb(form.remove_survey(column))?;
    }
    for id in &request.add_survey {
        let survey = surveys
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| format!("error: survey '{}' is not in the surveys file", id))?;
        absorb(form.add_survey(survey))?;
    }
    if let Some(row) = request.remove_row {
        absorb(form.remove_row(row))?;
    }
    for code in &request.add_row {
        absorb(form.add_row(QualitativeRow::new(code.clone())))?;
    }
    if request.regenerate {
        absorb(form.regenerate())?;
    }
    for raw in &request.reset {
        let path = FieldPath::parse(raw.as_str()).map_err(|e| format!("error: {}", e))?;
        absorb(form.reset_field(&path))?;
    }
    for assignment in &request.set {
        absorb(form.edit(&assignment.path, assignment.value.clone()))?;
    }

    emit_form(&form, &report, destination(out, form_path), output, quiet)?;
    Ok(true)
}
