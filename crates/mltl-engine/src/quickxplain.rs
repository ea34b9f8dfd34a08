//! QuickXplain: a minimal conflicting subset of an unsatisfiable formula set.
//!
//! Divide and conquer over the candidate list. Each step splits the
//! candidates in half, finds the part of the conflict inside the second half
//! with the first half as background, then the part inside the first half
//! with that result as background. A subtree is pruned as soon as its
//! background alone is already unsatisfiable. The query count is
//! O(|core| * log(|A| / |core|)) and degrades toward O(|A|) when most
//! formulas are in the core.

use mltl_dsl::ast::Formula;
use mltl_smt::solver::SmtSolver;
use tracing::info;

use crate::check::{dump_smt_to_file, parse_formulas, Oracle};
use crate::error::EngineError;
use crate::options::{solver_from_choice, EngineOptions};

/// Outcome of QuickXplain on a formula list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize),
    serde(tag = "verdict", content = "core", rename_all = "snake_case")
)]
pub enum Explanation {
    /// No formulas were given.
    EmptyInput,
    /// The formulas are jointly satisfiable.
    NoConflict,
    /// A minimal unsatisfiable subset, in input order, as the original source
    /// strings.
    Core(Vec<String>),
}

impl Explanation {
    pub fn core(&self) -> Option<&[String]> {
        match self {
            Explanation::Core(core) => Some(core),
            _ => None,
        }
    }
}

/// An [`Explanation`] together with the number of oracle queries it took.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ExplainReport {
    #[cfg_attr(feature = "serialize", serde(flatten))]
    pub explanation: Explanation,
    pub oracle_queries: usize,
}

/// Minimal conflicting subset of `formulas`.
pub fn quickxplain<F: AsRef<str>>(formulas: &[F], options: &EngineOptions) -> Result<Explanation, EngineError> {
    Ok(explain(formulas, options)?.explanation)
}

/// [`quickxplain`] with the oracle query count.
pub fn explain<F: AsRef<str>>(formulas: &[F], options: &EngineOptions) -> Result<ExplainReport, EngineError> {
    if formulas.is_empty() {
        return Ok(ExplainReport {
            explanation: Explanation::EmptyInput,
            oracle_queries: 0,
        });
    }
    let mut solver = solver_from_choice(&options.solver, options.timeout_secs)?;
    explain_with(&mut solver, formulas, options)
}

/// [`explain`] against a caller-supplied oracle.
pub fn explain_with<S, F>(
    solver: &mut S,
    formulas: &[F],
    options: &EngineOptions,
) -> Result<ExplainReport, EngineError>
where
    S: SmtSolver + ?Sized,
    F: AsRef<str>,
{
    if formulas.is_empty() {
        return Ok(ExplainReport {
            explanation: Explanation::EmptyInput,
            oracle_queries: 0,
        });
    }
    let parsed = parse_formulas(formulas, options.max_nesting)?;
    if let Some(path) = &options.dump_smt {
        dump_smt_to_file(&parsed, options.max_horizon, path)?;
    }
    let mut oracle = Oracle::new(solver, options);
    let all: Vec<usize> = (0..parsed.len()).collect();

    if oracle.is_consistent(&parsed, &all)? {
        info!(
            formulas = parsed.len(),
            queries = oracle.queries(),
            "no conflict"
        );
        return Ok(ExplainReport {
            explanation: Explanation::NoConflict,
            oracle_queries: oracle.queries(),
        });
    }

    let core = qx(&mut oracle, &parsed, &[], &all, &[])?;
    info!(
        formulas = parsed.len(),
        core = core.len(),
        queries = oracle.queries(),
        "conflict core found"
    );
    Ok(ExplainReport {
        explanation: Explanation::Core(
            core.iter()
                .map(|&i| formulas[i].as_ref().to_string())
                .collect(),
        ),
        oracle_queries: oracle.queries(),
    })
}

/// `d`: candidates added to the background since the last check.
/// `a`: remaining candidates. `b`: background.
fn qx<S: SmtSolver + ?Sized>(
    oracle: &mut Oracle<'_, S>,
    parsed: &[Formula],
    d: &[usize],
    a: &[usize],
    b: &[usize],
) -> Result<Vec<usize>, EngineError> {
    if !d.is_empty() && !oracle.is_consistent(parsed, b)? {
        return Ok(Vec::new());
    }
    if a.len() == 1 {
        return Ok(a.to_vec());
    }
    let (a1, a2) = a.split_at(a.len() / 2);

    let x2 = qx(oracle, parsed, a1, a2, &concat(b, a1))?;
    let x1 = qx(oracle, parsed, &x2, a1, &concat(b, &x2))?;
    Ok(concat(&x1, &x2))
}

fn concat(lhs: &[usize], rhs: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(lhs.len() + rhs.len());
    out.extend_from_slice(lhs);
    out.extend_from_slice(rhs);
    out
}
