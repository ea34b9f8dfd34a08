// Handler for the `parse` subcommand.

use miette::IntoDiagnostic;
use serde::Serialize;

use mltl_dsl::ast::Formula;
use mltl_dsl::{parse_with_config, ParserConfig};
use mltl_engine::EngineOptions;

use crate::OutputFormat;

#[derive(Debug, Serialize)]
pub(crate) struct ParseReport<'a> {
    /// Canonical rendering; re-parses to `ast`.
    pub formula: String,
    pub atoms: Vec<&'a str>,
    pub horizon: u32,
    pub ast: &'a Formula,
}

impl<'a> ParseReport<'a> {
    pub(crate) fn new(ast: &'a Formula) -> Self {
        Self {
            formula: ast.to_string(),
            atoms: ast.atoms(),
            horizon: ast.horizon(),
            ast,
        }
    }

    pub(crate) fn render_text(&self) -> String {
        format!(
            "formula: {}\natoms: {}\nhorizon: {}",
            self.formula,
            self.atoms.join(", "),
            self.horizon
        )
    }
}

pub(crate) fn run_parse_command(
    source: &str,
    options: &EngineOptions,
    format: OutputFormat,
) -> miette::Result<()> {
    let config = ParserConfig {
        max_nesting: options.max_nesting,
    };
    let ast = parse_with_config(source, &config).map_err(miette::Report::new)?;
    let report = ParseReport::new(&ast);

    match format {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_shows_canonical_form_atoms_and_horizon() {
        let ast = mltl_dsl::parse("(p U[0,2] q) & F[1,3]( p|r )").expect("valid formula");
        let report = ParseReport::new(&ast);
        assert_eq!(
            report.render_text(),
            "formula: p U[0,2] q & F[1,3](p | r)\natoms: p, q, r\nhorizon: 3"
        );
    }

    #[test]
    fn json_report_carries_the_ast() {
        let ast = mltl_dsl::parse("!a").expect("valid formula");
        let value = serde_json::to_value(ParseReport::new(&ast)).expect("serializable");
        assert_eq!(value["formula"], "!a");
        assert_eq!(value["horizon"], 0);
        assert_eq!(value["ast"], serde_json::json!({"Not": {"Atom": "a"}}));
    }
}
