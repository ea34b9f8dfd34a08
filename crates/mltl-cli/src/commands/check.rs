// Handler for the `check` subcommand.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use serde::Serialize;

use mltl_engine::{check_sat, EngineOptions};

use super::helpers::{collect_formulas, engine_error_report};
use crate::OutputFormat;

#[derive(Debug, Serialize)]
pub(crate) struct CheckReport {
    pub verdict: &'static str,
    pub formulas: usize,
}

pub(crate) fn verdict_name(sat: bool) -> &'static str {
    if sat {
        "sat"
    } else {
        "unsat"
    }
}

pub(crate) fn run_check_command(
    formulas: Vec<String>,
    file: Option<PathBuf>,
    options: &EngineOptions,
    format: OutputFormat,
) -> miette::Result<()> {
    let formulas = collect_formulas(formulas, file)?;
    let sat = check_sat(&formulas, options).map_err(engine_error_report)?;
    let report = CheckReport {
        verdict: verdict_name(sat),
        formulas: formulas.len(),
    };

    match format {
        OutputFormat::Text => println!("{}", report.verdict),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?)
        }
    }
    Ok(())
}
