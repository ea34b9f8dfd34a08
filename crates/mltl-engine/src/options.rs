use std::path::PathBuf;

use mltl_dsl::DEFAULT_MAX_NESTING;
use mltl_smt::backends::smtlib_process::{SmtLibProcess, SmtLibProcessError};
use mltl_smt::backends::varisat_backend::{VarisatError, VarisatSolver};
#[cfg(feature = "z3")]
use mltl_smt::backends::z3_backend::{Z3Error, Z3Solver};
use mltl_smt::encoder::DEFAULT_MAX_HORIZON;
use mltl_smt::solver::{SatResult, SmtSolver};
use mltl_smt::terms::SmtTerm;
use thiserror::Error;

use crate::error::EngineError;

/// Which oracle backend to use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolverChoice {
    /// In-process varisat CDCL solver.
    #[default]
    Varisat,
    /// Z3: linked in-process with the `z3` feature, otherwise `z3 -in`.
    Z3,
    /// `cvc5` process.
    Cvc5,
    /// Any SMT-LIB2 solver reading commands on stdin.
    External { program: String, args: Vec<String> },
}

impl SolverChoice {
    pub fn name(&self) -> &str {
        match self {
            SolverChoice::Varisat => "varisat",
            SolverChoice::Z3 => "z3",
            SolverChoice::Cvc5 => "cvc5",
            SolverChoice::External { program, .. } => program,
        }
    }
}

/// Options for `check_sat` and QuickXplain calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub solver: SolverChoice,
    /// Wall-clock budget for the whole call in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Largest horizon a single formula may have.
    pub max_horizon: u32,
    /// Parser nesting limit.
    pub max_nesting: usize,
    /// Write the SMT-LIB2 script of the joint query here.
    pub dump_smt: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            solver: SolverChoice::Varisat,
            timeout_secs: 0,
            max_horizon: DEFAULT_MAX_HORIZON,
            max_nesting: DEFAULT_MAX_NESTING,
            dump_smt: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DynSolverError {
    #[error(transparent)]
    Varisat(#[from] VarisatError),
    #[error(transparent)]
    Process(#[from] SmtLibProcessError),
    #[cfg(feature = "z3")]
    #[error(transparent)]
    Z3(#[from] Z3Error),
}

/// Oracle picked at runtime from a [`SolverChoice`].
pub enum DynSolver {
    Varisat(VarisatSolver),
    Process(SmtLibProcess),
    #[cfg(feature = "z3")]
    Z3(Z3Solver),
}

/// Build the backend for `choice`. `timeout_secs` (0 = none) is the initial
/// per-query limit of backends that support one; the oracle lowers it to the
/// remaining budget before each query.
pub fn solver_from_choice(choice: &SolverChoice, timeout_secs: u64) -> Result<DynSolver, EngineError> {
    let solver = match choice {
        SolverChoice::Varisat => DynSolver::Varisat(VarisatSolver::new()),
        #[cfg(feature = "z3")]
        SolverChoice::Z3 => DynSolver::Z3(Z3Solver::with_timeout_secs(timeout_secs)),
        #[cfg(not(feature = "z3"))]
        SolverChoice::Z3 => DynSolver::Process(
            SmtLibProcess::z3(timeout_secs).map_err(|e| EngineError::oracle("z3", e))?,
        ),
        SolverChoice::Cvc5 => DynSolver::Process(
            SmtLibProcess::cvc5(timeout_secs).map_err(|e| EngineError::oracle("cvc5", e))?,
        ),
        SolverChoice::External { program, args } => DynSolver::Process(
            SmtLibProcess::with_command(program, args)
                .map_err(|e| EngineError::oracle("smtlib-process", e))?,
        ),
    };
    tracing::debug!(backend = solver.backend_name(), "oracle ready");
    Ok(solver)
}

impl SmtSolver for DynSolver {
    type Error = DynSolverError;

    fn backend_name(&self) -> &'static str {
        match self {
            DynSolver::Varisat(s) => s.backend_name(),
            DynSolver::Process(s) => s.backend_name(),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => s.backend_name(),
        }
    }

    fn declare_bool(&mut self, name: &str) -> Result<(), DynSolverError> {
        match self {
            DynSolver::Varisat(s) => Ok(s.declare_bool(name)?),
            DynSolver::Process(s) => Ok(s.declare_bool(name)?),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => Ok(s.declare_bool(name)?),
        }
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), DynSolverError> {
        match self {
            DynSolver::Varisat(s) => Ok(s.assert(term)?),
            DynSolver::Process(s) => Ok(s.assert(term)?),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => Ok(s.assert(term)?),
        }
    }

    fn check_sat(&mut self) -> Result<SatResult, DynSolverError> {
        match self {
            DynSolver::Varisat(s) => Ok(s.check_sat()?),
            DynSolver::Process(s) => Ok(s.check_sat()?),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => Ok(s.check_sat()?),
        }
    }

    fn reset(&mut self) -> Result<(), DynSolverError> {
        match self {
            DynSolver::Varisat(s) => Ok(s.reset()?),
            DynSolver::Process(s) => Ok(s.reset()?),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => Ok(s.reset()?),
        }
    }

    fn set_timeout_secs(&mut self, secs: u64) -> Result<(), DynSolverError> {
        match self {
            DynSolver::Varisat(s) => Ok(s.set_timeout_secs(secs)?),
            DynSolver::Process(s) => Ok(s.set_timeout_secs(secs)?),
            #[cfg(feature = "z3")]
            DynSolver::Z3(s) => Ok(s.set_timeout_secs(secs)?),
        }
    }
}
