use std::collections::HashMap;

use thiserror::Error;
use z3::SatResult as Z3SatResult;

use crate::solver::{SatResult, SmtSolver};
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("Z3 error: {0}")]
    Internal(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
}

/// Z3 linked in-process.
pub struct Z3Solver {
    solver: z3::Solver,
    bool_vars: HashMap<String, z3::ast::Bool>,
    params: Option<z3::Params>,
}

impl Z3Solver {
    pub fn new() -> Self {
        Self {
            solver: z3::Solver::new(),
            bool_vars: HashMap::new(),
            params: None,
        }
    }

    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        let mut solver = Self::new();
        if timeout_secs > 0 {
            solver.apply_timeout(timeout_secs);
        }
        solver
    }

    /// 0 restores Z3's default of no limit.
    fn apply_timeout(&mut self, timeout_secs: u64) {
        let timeout_ms = match timeout_secs {
            0 => u32::MAX,
            secs => u32::try_from(secs.saturating_mul(1000)).unwrap_or(u32::MAX),
        };
        let mut params = z3::Params::new();
        params.set_u32("timeout", timeout_ms);
        self.solver.set_params(&params);
        self.params = Some(params);
    }

    fn translate_term(&self, term: &SmtTerm) -> Result<z3::ast::Bool, Z3Error> {
        match term {
            SmtTerm::Var(name) => self
                .bool_vars
                .get(name)
                .cloned()
                .ok_or_else(|| Z3Error::UnknownVariable(name.clone())),
            SmtTerm::BoolLit(b) => Ok(z3::ast::Bool::from_bool(*b)),
            SmtTerm::And(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate_term(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(z3::ast::Bool::and(&refs))
            }
            SmtTerm::Or(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate_term(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(z3::ast::Bool::or(&refs))
            }
            SmtTerm::Not(inner) => Ok(self.translate_term(inner)?.not()),
        }
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtSolver for Z3Solver {
    type Error = Z3Error;

    fn backend_name(&self) -> &'static str {
        "z3"
    }

    fn declare_bool(&mut self, name: &str) -> Result<(), Z3Error> {
        let v = z3::ast::Bool::new_const(name);
        self.bool_vars.insert(name.to_string(), v);
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Z3Error> {
        let z3_term = self.translate_term(term)?;
        self.solver.assert(&z3_term);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Z3Error> {
        match self.solver.check() {
            Z3SatResult::Sat => Ok(SatResult::Sat),
            Z3SatResult::Unsat => Ok(SatResult::Unsat),
            Z3SatResult::Unknown => {
                let reason = self
                    .solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "Z3 returned unknown".into());
                Ok(SatResult::Unknown(reason))
            }
        }
    }

    fn reset(&mut self) -> Result<(), Z3Error> {
        self.solver.reset();
        // Z3 may drop per-solver parameters on reset; reapply timeout if configured.
        if let Some(params) = &self.params {
            self.solver.set_params(params);
        }
        self.bool_vars.clear();
        Ok(())
    }

    fn set_timeout_secs(&mut self, secs: u64) -> Result<(), Z3Error> {
        self.apply_timeout(secs);
        Ok(())
    }
}
