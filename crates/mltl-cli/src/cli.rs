//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mltl_dsl::DEFAULT_MAX_NESTING;
use mltl_smt::encoder::DEFAULT_MAX_HORIZON;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Joint satisfiability checks and minimal conflict cores for sets of MLTL formulas.\n\n\
    Formulas use the grammar\n  \
    !a, a & b, a | b, F[l,h] a, G[l,h] a, a U[l,h] b, a R[l,h] b\n\
    where &, |, U and R share one precedence level and associate to the left.\n\n\
    Examples:\n  \
    mltlx check 'G[0,3]a' 'F[1,2]b'\n  \
    mltlx explain 'G[0,3]a' 'b' 'F[1,2]!a'\n  \
    mltlx explain --file requirements.mltl --format json";

#[derive(Parser)]
#[command(name = "mltlx")]
#[command(about = "Satisfiability checks and conflict cores for MLTL formula sets")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Oracle backend: varisat | z3 | cvc5 | external
    #[arg(long, global = true, default_value = "varisat")]
    pub(crate) solver: String,

    /// Command line of the SMT-LIB2 solver used by `--solver external`
    /// (e.g. "yices-smt2 --incremental")
    #[arg(long, global = true)]
    pub(crate) solver_cmd: Option<String>,

    /// Overall timeout in seconds (0 disables it)
    #[arg(long, global = true, default_value_t = 0)]
    pub(crate) timeout: u64,

    /// Largest timestep a single formula may reference
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_HORIZON)]
    pub(crate) max_horizon: u32,

    /// Parser nesting limit
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_NESTING)]
    pub(crate) max_nesting: usize,

    /// Dump the SMT-LIB2 script of the joint query to file
    #[arg(long, global = true)]
    pub(crate) dump_smt: Option<PathBuf>,

    /// Output format: text | json
    #[arg(long, global = true, default_value = "text")]
    pub(crate) format: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check whether the formulas are jointly satisfiable
    Check {
        /// Formulas, evaluated at time 0
        formulas: Vec<String>,

        /// Read additional formulas from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Find a minimal conflicting subset with QuickXplain
    Explain {
        /// Formulas, evaluated at time 0
        formulas: Vec<String>,

        /// Read additional formulas from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Parse one formula and print its canonical form, atoms and horizon
    Parse {
        /// The formula to parse
        formula: String,
    },

    /// Print the SMT-LIB2 script of the joint satisfiability query
    Encode {
        /// Formulas, evaluated at time 0
        formulas: Vec<String>,

        /// Read additional formulas from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
