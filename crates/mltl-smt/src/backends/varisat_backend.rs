use std::collections::HashMap;

use thiserror::Error;
use varisat::{ExtendFormula, Lit};

use crate::solver::{SatResult, SmtSolver};
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum VarisatError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("varisat error: {0}")]
    Solver(String),
}

/// In-process CDCL oracle.
///
/// Terms are turned into CNF with a Tseitin transformation: every compound
/// subterm gets a fresh literal constrained to be equivalent to it, and each
/// assertion adds the unit clause of its root literal.
pub struct VarisatSolver {
    solver: varisat::Solver<'static>,
    vars: HashMap<String, Lit>,
    true_lit: Option<Lit>,
    clauses: usize,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            solver: varisat::Solver::new(),
            vars: HashMap::new(),
            true_lit: None,
            clauses: 0,
        }
    }

    /// Number of clauses added since the last reset.
    pub fn clause_count(&self) -> usize {
        self.clauses
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        self.clauses += 1;
        self.solver.add_clause(clause);
    }

    fn constant(&mut self, value: bool) -> Lit {
        let lit = match self.true_lit {
            Some(lit) => lit,
            None => {
                let lit = self.solver.new_lit();
                self.add_clause(&[lit]);
                self.true_lit = Some(lit);
                lit
            }
        };
        if value {
            lit
        } else {
            !lit
        }
    }

    fn tseitin(&mut self, term: &SmtTerm) -> Result<Lit, VarisatError> {
        match term {
            SmtTerm::Var(name) => self
                .vars
                .get(name)
                .copied()
                .ok_or_else(|| VarisatError::UnknownVariable(name.clone())),
            SmtTerm::BoolLit(b) => Ok(self.constant(*b)),
            SmtTerm::Not(inner) => Ok(!self.tseitin(inner)?),
            SmtTerm::And(children) => {
                if children.is_empty() {
                    return Ok(self.constant(true));
                }
                if children.len() == 1 {
                    return self.tseitin(&children[0]);
                }
                let child_lits = children
                    .iter()
                    .map(|c| self.tseitin(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let v = self.solver.new_lit();
                // v -> ci
                for &c in &child_lits {
                    self.add_clause(&[!v, c]);
                }
                // c1 & c2 & ... -> v
                let mut clause: Vec<Lit> = child_lits.iter().map(|&c| !c).collect();
                clause.push(v);
                self.add_clause(&clause);
                Ok(v)
            }
            SmtTerm::Or(children) => {
                if children.is_empty() {
                    return Ok(self.constant(false));
                }
                if children.len() == 1 {
                    return self.tseitin(&children[0]);
                }
                let child_lits = children
                    .iter()
                    .map(|c| self.tseitin(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let v = self.solver.new_lit();
                // ci -> v
                for &c in &child_lits {
                    self.add_clause(&[!c, v]);
                }
                // v -> c1 | c2 | ...
                let mut clause = child_lits;
                clause.push(!v);
                self.add_clause(&clause);
                Ok(v)
            }
        }
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtSolver for VarisatSolver {
    type Error = VarisatError;

    fn backend_name(&self) -> &'static str {
        "varisat"
    }

    fn declare_bool(&mut self, name: &str) -> Result<(), VarisatError> {
        if !self.vars.contains_key(name) {
            let lit = self.solver.new_lit();
            self.vars.insert(name.to_string(), lit);
        }
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), VarisatError> {
        // Top-level conjunctions become separate units.
        if let SmtTerm::And(children) = term {
            for child in children {
                self.assert(child)?;
            }
            return Ok(());
        }
        let root = self.tseitin(term)?;
        self.add_clause(&[root]);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, VarisatError> {
        match self.solver.solve() {
            Ok(true) => Ok(SatResult::Sat),
            Ok(false) => Ok(SatResult::Unsat),
            Err(e) => Err(VarisatError::Solver(e.to_string())),
        }
    }

    fn reset(&mut self) -> Result<(), VarisatError> {
        self.solver = varisat::Solver::new();
        self.vars.clear();
        self.true_lit = None;
        self.clauses = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn varisat_basic_sat() -> TestResult {
        let mut solver = VarisatSolver::new();
        solver.declare_bool("a")?;
        solver.declare_bool("b")?;
        solver.assert(&SmtTerm::Or(vec![SmtTerm::var("a"), SmtTerm::var("b")]))?;
        solver.assert(&SmtTerm::var("a").not())?;
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        Ok(())
    }

    #[test]
    fn varisat_basic_unsat() -> TestResult {
        let mut solver = VarisatSolver::new();
        solver.declare_bool("a")?;
        solver.assert(&SmtTerm::And(vec![
            SmtTerm::var("a"),
            SmtTerm::var("a").not(),
        ]))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn nested_connectives_are_equivalence_encoded() -> TestResult {
        // !(a & b) together with a and b is unsat only if the inner
        // conjunction is encoded in both directions.
        let mut solver = VarisatSolver::new();
        solver.declare_bool("a")?;
        solver.declare_bool("b")?;
        solver.assert(&SmtTerm::And(vec![SmtTerm::var("a"), SmtTerm::var("b")]).not())?;
        solver.assert(&SmtTerm::var("a"))?;
        solver.assert(&SmtTerm::var("b"))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);

        solver.reset()?;
        solver.declare_bool("a")?;
        solver.declare_bool("b")?;
        solver.assert(&SmtTerm::Or(vec![SmtTerm::var("a"), SmtTerm::var("b")]).not())?;
        solver.assert(&SmtTerm::var("b"))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn constants_and_empty_connectives() -> TestResult {
        let mut solver = VarisatSolver::new();
        solver.assert(&SmtTerm::bool(true))?;
        solver.assert(&SmtTerm::And(vec![]))?;
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        solver.assert(&SmtTerm::Or(vec![]))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);
        Ok(())
    }

    #[test]
    fn reset_discards_previous_assertions() -> TestResult {
        let mut solver = VarisatSolver::new();
        solver.declare_bool("x")?;
        solver.assert(&SmtTerm::bool(false))?;
        assert_eq!(solver.check_sat()?, SatResult::Unsat);

        solver.reset()?;
        assert_eq!(solver.clause_count(), 0);
        solver.declare_bool("x")?;
        solver.assert(&SmtTerm::var("x"))?;
        assert_eq!(solver.check_sat()?, SatResult::Sat);
        Ok(())
    }

    #[test]
    fn undeclared_variable_is_rejected() {
        let mut solver = VarisatSolver::new();
        let err = solver.assert(&SmtTerm::var("ghost")).unwrap_err();
        assert!(matches!(err, VarisatError::UnknownVariable(name) if name == "ghost"));
    }
}
