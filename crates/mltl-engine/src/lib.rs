#![doc = include_str!("../README.md")]

//! Joint satisfiability checks and QuickXplain conflict cores for sets of
//! MLTL formulas.
//!
//! Each entry point parses every formula, lowers it to boolean terms over
//! timed atoms and asks an oracle backend for a verdict. Syntax, encoding
//! and oracle failures abort the whole call.

pub mod check;
pub mod error;
pub mod options;
pub mod quickxplain;
mod timeout;

pub use check::{check_sat, check_sat_with};
pub use error::EngineError;
pub use options::{solver_from_choice, DynSolver, EngineOptions, SolverChoice};
pub use quickxplain::{explain, explain_with, quickxplain, ExplainReport, Explanation};
