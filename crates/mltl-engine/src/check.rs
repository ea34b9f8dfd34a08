use std::path::Path;
use std::time::Instant;

use mltl_dsl::ast::Formula;
use mltl_dsl::parser::{parse_with_config, ParserConfig};
use mltl_smt::encoder::MltlEncoding;
use mltl_smt::solver::{SatResult, SmtSolver};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::options::{solver_from_choice, EngineOptions};
use crate::timeout::{deadline_exceeded, deadline_from_timeout_secs, remaining_timeout_secs};

/// Whether `formulas`, each evaluated at offset 0, are jointly satisfiable.
///
/// An empty list is trivially satisfiable.
pub fn check_sat<F: AsRef<str>>(formulas: &[F], options: &EngineOptions) -> Result<bool, EngineError> {
    let mut solver = solver_from_choice(&options.solver, options.timeout_secs)?;
    check_sat_with(&mut solver, formulas, options)
}

/// [`check_sat`] against a caller-supplied oracle.
pub fn check_sat_with<S, F>(
    solver: &mut S,
    formulas: &[F],
    options: &EngineOptions,
) -> Result<bool, EngineError>
where
    S: SmtSolver + ?Sized,
    F: AsRef<str>,
{
    let parsed = parse_formulas(formulas, options.max_nesting)?;
    if let Some(path) = &options.dump_smt {
        dump_smt_to_file(&parsed, options.max_horizon, path)?;
    }
    let mut oracle = Oracle::new(solver, options);
    let all: Vec<usize> = (0..parsed.len()).collect();
    oracle.is_consistent(&parsed, &all)
}

/// Parse every formula, tagging failures with the formula's position.
pub(crate) fn parse_formulas<F: AsRef<str>>(
    formulas: &[F],
    max_nesting: usize,
) -> Result<Vec<Formula>, EngineError> {
    let config = ParserConfig { max_nesting };
    formulas
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let source = source.as_ref();
            parse_with_config(source, &config).map_err(|e| EngineError::Parse {
                index,
                source: e.with_source_context(source, &format!("formula[{index}]")),
            })
        })
        .collect()
}

/// Encode the formulas at `subset` (indices into `parsed`) into one query.
pub(crate) fn encode_subset(
    parsed: &[Formula],
    subset: &[usize],
    max_horizon: u32,
) -> Result<MltlEncoding, EngineError> {
    let mut encoding = MltlEncoding::new();
    for &index in subset {
        encoding
            .push_formula(&parsed[index], max_horizon)
            .map_err(|source| EngineError::Encoding { index, source })?;
    }
    Ok(encoding)
}

/// Write the SMT-LIB2 script of the joint query over all formulas.
///
/// Encoding errors propagate; I/O failures are only logged.
pub(crate) fn dump_smt_to_file(parsed: &[Formula], max_horizon: u32, path: &Path) -> Result<(), EngineError> {
    let all: Vec<usize> = (0..parsed.len()).collect();
    let script = encode_subset(parsed, &all, max_horizon)?.to_smtlib();
    if let Err(e) = std::fs::write(path, script) {
        warn!("could not write SMT dump to {}: {e}", path.display());
    } else {
        info!("SMT dump written to {}", path.display());
    }
    Ok(())
}

/// Satisfiability oracle over subsets of a parsed batch.
///
/// Every query encodes its subset with a fresh atom table and resets the
/// backend first, so nothing carries over between queries.
pub(crate) struct Oracle<'s, S: ?Sized> {
    solver: &'s mut S,
    max_horizon: u32,
    timeout_secs: u64,
    deadline: Option<Instant>,
    queries: usize,
}

impl<'s, S: SmtSolver + ?Sized> Oracle<'s, S> {
    pub(crate) fn new(solver: &'s mut S, options: &EngineOptions) -> Self {
        Self {
            solver,
            max_horizon: options.max_horizon,
            timeout_secs: options.timeout_secs,
            deadline: deadline_from_timeout_secs(options.timeout_secs),
            queries: 0,
        }
    }

    #[cfg(test)]
    fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries
    }

    fn timed_out(&self) -> EngineError {
        EngineError::Timeout {
            timeout_secs: self.timeout_secs,
        }
    }

    pub(crate) fn is_consistent(&mut self, parsed: &[Formula], subset: &[usize]) -> Result<bool, EngineError> {
        if deadline_exceeded(self.deadline) {
            return Err(self.timed_out());
        }
        let encoding = encode_subset(parsed, subset, self.max_horizon)?;

        let backend = self.solver.backend_name();
        self.solver
            .reset()
            .map_err(|e| EngineError::oracle(backend, e))?;
        let budget = remaining_timeout_secs(self.deadline);
        if let Some(secs) = budget {
            self.solver
                .set_timeout_secs(secs.max(1))
                .map_err(|e| EngineError::oracle(backend, e))?;
        }
        encoding
            .assert_into(&mut *self.solver)
            .map_err(|e| EngineError::oracle(backend, e))?;
        let verdict = self
            .solver
            .check_sat()
            .map_err(|e| EngineError::oracle(backend, e))?;
        self.queries += 1;
        debug!(
            backend,
            formulas = subset.len(),
            variables = encoding.table().len(),
            ?verdict,
            budget_secs = ?budget,
            "oracle query"
        );

        match verdict {
            SatResult::Sat => Ok(true),
            SatResult::Unsat => Ok(false),
            SatResult::Unknown(reason) => {
                warn!(backend, %reason, "oracle returned unknown");
                if deadline_exceeded(self.deadline) {
                    Err(self.timed_out())
                } else {
                    Err(EngineError::Oracle {
                        backend,
                        message: format!("solver returned unknown: {reason}"),
                    })
                }
            }
        }
    }
}
