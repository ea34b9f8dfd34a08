use crate::terms::SmtTerm;

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown(String),
}

impl SatResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatResult::Sat)
    }
}

/// Abstract satisfiability oracle over boolean terms.
///
/// Callers declare every variable before asserting a term that mentions it,
/// then call [`check_sat`](SmtSolver::check_sat) once per query. `reset`
/// drops all declarations and assertions so the instance can be reused for
/// an unrelated query.
pub trait SmtSolver {
    type Error: std::error::Error;

    /// Short name used in diagnostics (`varisat`, `z3`, ...).
    fn backend_name(&self) -> &'static str;

    /// Declare a boolean variable.
    fn declare_bool(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Assert a constraint.
    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error>;

    /// Check satisfiability of everything asserted since the last reset.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Reset the solver state.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Limit the next [`check_sat`](SmtSolver::check_sat) to `secs` seconds
    /// (0 = no limit). Backends without a per-query limit ignore it.
    fn set_timeout_secs(&mut self, secs: u64) -> Result<(), Self::Error> {
        let _ = secs;
        Ok(())
    }
}

impl<S: SmtSolver + ?Sized> SmtSolver for Box<S> {
    type Error = S::Error;

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn declare_bool(&mut self, name: &str) -> Result<(), Self::Error> {
        (**self).declare_bool(name)
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error> {
        (**self).assert(term)
    }

    fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
        (**self).check_sat()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        (**self).reset()
    }

    fn set_timeout_secs(&mut self, secs: u64) -> Result<(), Self::Error> {
        (**self).set_timeout_secs(secs)
    }
}
