mod commands;
mod config;
mod io;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use appraise_pricing::ValuationMethod;

use commands::edit::Assignment;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Price-analysis form recalculation engine.
#[derive(Parser)]
#[command(
    name = "appraise",
    version,
    about = "Price-analysis form recalculation engine"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to an appraise.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Survey and subject-property inputs shared by the subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct DataArgs {
    /// Market comparable surveys (JSON array)
    #[arg(long)]
    surveys: PathBuf,
    /// Subject property record (JSON)
    #[arg(long)]
    property: Option<PathBuf>,
}

/// Where a recalculated form goes.
#[derive(Args, Debug, Clone)]
pub(crate) struct OutArgs {
    /// Write the form document here instead of stdout
    #[arg(long, conflicts_with = "in_place")]
    out: Option<PathBuf>,
    /// Overwrite the input form document
    #[arg(long)]
    in_place: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a valuation form from a template and surveys
    Generate {
        /// Valuation method (DC, SAG or WQS)
        #[arg(long)]
        method: ValuationMethod,
        /// Pricing template (JSON)
        #[arg(long)]
        template: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        /// Write the form document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run a full recomputation pass over a saved form
    Recompute {
        /// Form document (JSON)
        form: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        out: OutArgs,
    },

    /// Apply user edits to a saved form and recompute what they affect
    Edit {
        /// Form document (JSON)
        form: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        /// Set a field as a user entry: PATH=VALUE (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<Assignment>,
        /// Hand a field back to the engine (repeatable)
        #[arg(long = "reset", value_name = "PATH")]
        reset: Vec<String>,
        /// Append a survey column, by id from the surveys file
        #[arg(long, value_name = "SURVEY_ID")]
        add_survey: Vec<String>,
        /// Remove a survey column by index
        #[arg(long, value_name = "COLUMN")]
        remove_survey: Option<usize>,
        /// Append a factor row
        #[arg(long, value_name = "FACTOR_CODE")]
        add_row: Vec<String>,
        /// Remove a factor row by index
        #[arg(long, value_name = "ROW")]
        remove_row: Option<usize>,
        /// Clear every override and recompute the whole form
        #[arg(long)]
        regenerate: bool,
        #[command(flatten)]
        out: OutArgs,
    },

    /// List the rules of a method in evaluation order
    Rules {
        /// Valuation method (DC, SAG or WQS)
        #[arg(long)]
        method: ValuationMethod,
        /// Pricing template (JSON)
        #[arg(long)]
        template: PathBuf,
        /// Market comparable surveys (JSON array)
        #[arg(long)]
        surveys: PathBuf,
    },

    /// Run the save-time checks on a form
    Validate {
        /// Form document (JSON)
        form: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        /// Pricing template, for the mandatory-factor check
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), cli.output, cli.quiet);
            process::exit(1);
        }
    };
    logging::init_logging(cli.verbose, config.log.level.as_deref());

    let result = match cli.command {
        Commands::Generate {
            method,
            template,
            data,
            out,
        } => commands::generate::cmd_generate(
            method,
            &template,
            &data,
            out.as_deref(),
            &config,
            cli.output,
            cli.quiet,
        ),
        Commands::Recompute { form, data, out } => {
            commands::recompute::cmd_recompute(&form, &data, &out, &config, cli.output, cli.quiet)
        }
        Commands::Edit {
            form,
            data,
            set,
            reset,
            add_survey,
            remove_survey,
            add_row,
            remove_row,
            regenerate,
            out,
        } => {
            let request = commands::edit::EditRequest {
                set,
                reset,
                add_survey,
                remove_survey,
                add_row,
                remove_row,
                regenerate,
            };
            commands::edit::cmd_edit(&form, &data, &request, &out, &config, cli.output, cli.quiet)
        }
        Commands::Rules {
            method,
            template,
            surveys,
        } => commands::rules::cmd_rules(method, &template, &surveys, cli.output, cli.quiet),
        Commands::Validate {
            form,
            data,
            template,
        } => commands::validate::cmd_validate(
            &form,
            &data,
            template.as_deref(),
            &config,
            cli.output,
            cli.quiet,
        ),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

/// Report an error message to stderr, honouring `--output` and `--quiet`.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
