#![doc = include_str!("../README.md")]

//! Propositional unrolling of MLTL formulas and the satisfiability oracles
//! that decide the resulting boolean terms.
//!
//! The encoder lowers each temporal operator over its bounded window into
//! plain conjunctions and disjunctions of timed atoms (`name@t`). The result
//! is handed to any [`solver::SmtSolver`]: the in-process varisat CDCL
//! solver, an SMT-LIB2 process such as `z3 -in` or cvc5, or Z3 linked in
//! through the `z3` feature.

pub mod backends;
pub mod encoder;
pub mod solver;
pub mod terms;
