// Shared helpers for the command handlers: option building, formula input
// and error rendering.

use std::path::{Path, PathBuf};

use miette::IntoDiagnostic;

use mltl_dsl::ast::Formula;
use mltl_dsl::{parse_with_config, ParserConfig};
use mltl_engine::{EngineError, EngineOptions, SolverChoice};

use crate::cli::Cli;
use crate::OutputFormat;

pub(crate) fn engine_options_from_cli(cli: &Cli) -> miette::Result<EngineOptions> {
    Ok(EngineOptions {
        solver: parse_solver_choice(&cli.solver, cli.solver_cmd.as_deref())?,
        timeout_secs: cli.timeout,
        max_horizon: cli.max_horizon,
        max_nesting: cli.max_nesting,
        dump_smt: cli.dump_smt.clone(),
    })
}

pub(crate) fn parse_solver_choice(raw: &str, solver_cmd: Option<&str>) -> miette::Result<SolverChoice> {
    match raw {
        "varisat" => Ok(SolverChoice::Varisat),
        "z3" => Ok(SolverChoice::Z3),
        "cvc5" => Ok(SolverChoice::Cvc5),
        "external" => {
            let Some(cmd) = solver_cmd else {
                miette::bail!("--solver external requires --solver-cmd");
            };
            let mut words = cmd.split_whitespace().map(str::to_string);
            let Some(program) = words.next() else {
                miette::bail!("--solver-cmd is empty");
            };
            Ok(SolverChoice::External {
                program,
                args: words.collect(),
            })
        }
        other => miette::bail!("Unknown solver: {other}. Use 'varisat', 'z3', 'cvc5' or 'external'."),
    }
}

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => miette::bail!("Unknown output format: {other}. Use 'text' or 'json'."),
    }
}

/// Formulas of a formula file: one per line, blank lines and `#` comments
/// skipped.
pub(crate) fn formula_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub(crate) fn read_formula_file(path: &Path) -> miette::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("Cannot read formula file {}", path.display())))?;
    Ok(formula_lines(&text))
}

/// Positional formulas followed by those read from `file`.
pub(crate) fn collect_formulas(
    mut formulas: Vec<String>,
    file: Option<PathBuf>,
) -> miette::Result<Vec<String>> {
    if let Some(path) = file {
        formulas.extend(read_formula_file(&path)?);
    }
    Ok(formulas)
}

/// Parse `formulas`, rendering the first syntax error with its source
/// snippet.
pub(crate) fn parse_all(formulas: &[String], max_nesting: usize) -> miette::Result<Vec<Formula>> {
    let config = ParserConfig { max_nesting };
    formulas
        .iter()
        .enumerate()
        .map(|(index, source)| {
            parse_with_config(source, &config).map_err(|e| {
                engine_error_report(EngineError::Parse {
                    index,
                    source: e.with_source_context(source, &format!("formula[{index}]")),
                })
            })
        })
        .collect()
}

/// Syntax errors keep their diagnostic (labels, snippet, help); everything
/// else is reported by message.
pub(crate) fn engine_error_report(err: EngineError) -> miette::Report {
    match err {
        EngineError::Parse { index, source } => {
            miette::Report::new(source).wrap_err(format!("Syntax error in formula {index}"))
        }
        other => miette::miette!("{other}"),
    }
}
