// Handler for the `encode` subcommand.

use std::path::PathBuf;

use mltl_engine::{EngineError, EngineOptions};
use mltl_smt::encoder::MltlEncoding;

use super::helpers::{collect_formulas, engine_error_report, parse_all};

pub(crate) fn encode_script(formulas: &[String], options: &EngineOptions) -> miette::Result<String> {
    let parsed = parse_all(formulas, options.max_nesting)?;
    let mut encoding = MltlEncoding::new();
    for (index, formula) in parsed.iter().enumerate() {
        encoding
            .push_formula(formula, options.max_horizon)
            .map_err(|source| engine_error_report(EngineError::Encoding { index, source }))?;
    }
    Ok(encoding.to_smtlib())
}

pub(crate) fn run_encode_command(
    formulas: Vec<String>,
    file: Option<PathBuf>,
    options: &EngineOptions,
) -> miette::Result<()> {
    let formulas = collect_formulas(formulas, file)?;
    print!("{}", encode_script(&formulas, options)?);
    Ok(())
}
