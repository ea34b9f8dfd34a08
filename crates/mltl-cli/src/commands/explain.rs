// Handler for the `explain` subcommand.

use std::path::PathBuf;

use miette::IntoDiagnostic;

use mltl_engine::{explain, EngineOptions, ExplainReport, Explanation};

use super::helpers::{collect_formulas, engine_error_report};
use crate::OutputFormat;

pub(crate) fn render_explain_text(report: &ExplainReport, total: usize) -> String {
    match &report.explanation {
        Explanation::EmptyInput => "empty input".to_string(),
        Explanation::NoConflict => "no conflict".to_string(),
        Explanation::Core(core) => {
            let mut out = format!(
                "conflict core ({} of {} formulas, {} oracle queries):",
                core.len(),
                total,
                report.oracle_queries
            );
            for formula in core {
                out.push_str("\n  ");
                out.push_str(formula);
            }
            out
        }
    }
}

pub(crate) fn run_explain_command(
    formulas: Vec<String>,
    file: Option<PathBuf>,
    options: &EngineOptions,
    format: OutputFormat,
) -> miette::Result<()> {
    let formulas = collect_formulas(formulas, file)?;
    let report = explain(&formulas, options).map_err(engine_error_report)?;

    match format {
        OutputFormat::Text => println!("{}", render_explain_text(&report, formulas.len())),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?)
        }
    }
    Ok(())
}
