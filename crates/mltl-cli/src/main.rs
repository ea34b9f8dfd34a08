#![doc = include_str!("../README.md")]

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::helpers::{engine_options_from_cli, parse_output_format};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = engine_options_from_cli(&cli)?;
    let format = parse_output_format(&cli.format)?;

    match cli.command {
        Commands::Check { formulas, file } => {
            commands::check::run_check_command(formulas, file, &options, format)?;
        }
        Commands::Explain { formulas, file } => {
            commands::explain::run_explain_command(formulas, file, &options, format)?;
        }
        Commands::Parse { formula } => {
            commands::parse::run_parse_command(&formula, &options, format)?;
        }
        Commands::Encode { formulas, file } => {
            commands::encode::run_encode_command(formulas, file, &options)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mltl_engine::SolverChoice;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_check_collects_positional_formulas() {
        let cli = Cli::try_parse_from(["mltlx", "check", "G[0,3]a", "F[1,2]!a"])
            .expect("check command should parse");
        match cli.command {
            Commands::Check { formulas, file } => {
                assert_eq!(formulas, vec!["G[0,3]a".to_string(), "F[1,2]!a".to_string()]);
                assert!(file.is_none());
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "mltlx",
            "explain",
            "--file",
            "reqs.mltl",
            "--timeout",
            "5",
            "--format",
            "json",
            "--dump-smt",
            "out.smt2",
        ])
        .expect("explain command with global flags should parse");

        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.dump_smt, Some(PathBuf::from("out.smt2")));
        match cli.command {
            Commands::Explain { formulas, file } => {
                assert!(formulas.is_empty());
                assert_eq!(file, Some(PathBuf::from("reqs.mltl")));
            }
            _ => panic!("expected explain command"),
        }
    }

    #[test]
    fn external_solver_command_is_split_into_program_and_args() {
        let cli = Cli::try_parse_from([
            "mltlx",
            "--solver",
            "external",
            "--solver-cmd",
            "yices-smt2 --incremental",
            "check",
            "a",
        ])
        .expect("external solver flags should parse");
        let options = engine_options_from_cli(&cli).expect("options should build");
        assert_eq!(
            options.solver,
            SolverChoice::External {
                program: "yices-smt2".into(),
                args: vec!["--incremental".into()],
            }
        );
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let cli = Cli::try_parse_from(["mltlx", "parse", "a"]).expect("parse command should parse");
        let options = engine_options_from_cli(&cli).expect("options should build");
        assert_eq!(options, mltl_engine::EngineOptions::default());
        assert_eq!(parse_output_format(&cli.format).ok(), Some(OutputFormat::Text));
    }
}
