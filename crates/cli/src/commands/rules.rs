use std::path::Path;

use serde_json::json;

use appraise_pricing::{Survey, Template, ValuationMethod};

use crate::io::{read_json, to_pretty};
use crate::OutputFormat;

/// Print the rules of a generated form in the order a pass runs them.
pub(crate) fn cmd_rules(
    method: ValuationMethod,
    template_path: &Path,
    surveys_path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<bool, String> {
    let template: Template = read_json(template_path, "template")?;
    let surveys: Vec<Survey> = read_json(surveys_path, "surveys")?;
    let rows = template.calculation_rows();
    let set = method
        .build_rule_set(&surveys, &rows)
        .map_err(|e| format!("error: {}", e))?;

    match output {
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = set
                .iter()
                .enumerate()
                .map(|(position, rule)| {
                    json!({
                        "position": position,
                        "target": rule.target(),
                        "activation": rule.activation().label(),
                        "deps": rule.deps(),
                    })
                })
                .collect();
            println!("{}", to_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for (position, rule) in set.iter().enumerate() {
                let deps: Vec<&str> = rule.deps().iter().map(|d| d.as_str()).collect();
                println!(
                    "{:>4}  {} [{}] <- {}",
                    position,
                    rule.target(),
                    rule.activation().label(),
                    if deps.is_empty() {
                        "-".to_string()
                    } else {
                        deps.join(", ")
                    }
                );
            }
            if !quiet {
                println!(
                    "{} rules for {} ({} columns, {} rows)",
                    set.len(),
                    method,
                    surveys.len(),
                    rows.len()
                );
            }
        }
    }
    Ok(true)
}
