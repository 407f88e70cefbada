use std::path::Path;

use serde_json::json;

use appraise_pricing::Template;

use super::open_form;
use crate::config::AppraiseConfig;
use crate::io::{read_json, to_pretty};
use crate::{DataArgs, OutputFormat};

/// Run the save-time checks. Returns `Ok(false)` when any check fails.
pub(crate) fn cmd_validate(
    form_path: &Path,
    data: &DataArgs,
    template_path: Option<&Path>,
    config: &AppraiseConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, String> {
    let template: Option<Template> = match template_path {
        Some(path) => Some(read_json(path, "template")?),
        None => None,
    };
    let (form, _) = open_form(form_path, data, config)?;
    let issues = form.validate(template.as_ref());

    for issue in &issues {
        tracing::debug!(target: "appraise.cli", check = issue.check, "{}", issue.message);
    }

    match output {
        OutputFormat::Json => {
            let result = json!({
                "valid": issues.is_empty(),
                "issues": issues,
            });
            println!("{}", to_pretty(&result)?);
        }
        OutputFormat::Text => {
            if issues.is_empty() {
                if !quiet {
                    println!("form is valid");
                }
            } else {
                for issue in &issues {
                    match &issue.path {
                        Some(path) => println!("{}: {} ({})", issue.check, issue.message, path),
                        None => println!("{}: {}", issue.check, issue.message),
                    }
                }
            }
        }
    }
    Ok(issues.is_empty())
}
