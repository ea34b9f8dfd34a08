//! Temporal-to-propositional lowering.
//!
//! A formula evaluated at offset `t` becomes a boolean term over timed atoms
//! `name@t'`. Every temporal operator has a bounded window, so the unrolling
//! is finite:
//!
//! ```text
//! F[l,h] s   at t  =  OR  { s at t+k              | k in l..=h }
//! G[l,h] s   at t  =  AND { s at t+k              | k in l..=h }
//! a U[l,h] b at t  =  OR  { a at t..t+k-1, b at t+k | k in l..=h }
//! a R[l,h] b at t  =  OR  { b at t..=t+k, a at t+k  | k in l..=h }
//!                     OR  (b at t..=t+h)
//! ```

use mltl_dsl::ast::{Formula, Interval};
use thiserror::Error;

use crate::backends::smtlib_printer::to_smtlib_script;
use crate::solver::SmtSolver;
use crate::terms::SmtTerm;

pub mod variables;

pub use variables::{timed_var_name, AtomTable, TimedAtom};

/// Default bound on the horizon of a single formula.
pub const DEFAULT_MAX_HORIZON: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Interval [{low},{high}] is inverted: lower bound exceeds upper bound")]
    InvertedInterval { low: u32, high: u32 },
    #[error("Timestep overflow: {t} + {k} does not fit in u32")]
    TimeOverflow { t: u32, k: u32 },
    #[error("Formula horizon {horizon} exceeds the configured limit of {limit}")]
    HorizonExceeded { horizon: u32, limit: u32 },
}

/// Variables and assertions for the joint satisfiability query of a set of
/// formulas, each evaluated at offset 0.
#[derive(Debug, Clone, Default)]
pub struct MltlEncoding {
    table: AtomTable,
    /// One assertion per formula, in input order.
    pub assertions: Vec<SmtTerm>,
}

impl MltlEncoding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `formula` at offset 0 and add it to the query.
    pub fn push_formula(&mut self, formula: &Formula, max_horizon: u32) -> Result<(), EncodingError> {
        check_horizon(formula, max_horizon)?;
        let term = encode(formula, 0, &mut self.table)?;
        self.assertions.push(term);
        Ok(())
    }

    /// Variables to declare, in creation order.
    pub fn declarations(&self) -> impl Iterator<Item = &str> {
        self.table.variables()
    }

    pub fn table(&self) -> &AtomTable {
        &self.table
    }

    /// Total number of term nodes over all assertions.
    pub fn term_size(&self) -> usize {
        self.assertions.iter().map(SmtTerm::size).sum()
    }

    /// Declare every variable and assert every formula on `solver`.
    pub fn assert_into<S: SmtSolver + ?Sized>(&self, solver: &mut S) -> Result<(), S::Error> {
        for name in self.declarations() {
            solver.declare_bool(name)?;
        }
        for term in &self.assertions {
            solver.assert(term)?;
        }
        Ok(())
    }

    /// Standalone SMT-LIB2 script for this query.
    pub fn to_smtlib(&self) -> String {
        to_smtlib_script(self.declarations(), &self.assertions)
    }
}

/// Encode a batch of formulas into one query.
pub fn encode_formulas(formulas: &[Formula], max_horizon: u32) -> Result<MltlEncoding, EncodingError> {
    let mut encoding = MltlEncoding::new();
    for formula in formulas {
        encoding.push_formula(formula, max_horizon)?;
    }
    tracing::debug!(
        formulas = formulas.len(),
        variables = encoding.table.len(),
        term_size = encoding.term_size(),
        "encoded formula set"
    );
    Ok(encoding)
}

/// Reject formulas whose unrolling would reach past `max_horizon`.
pub fn check_horizon(formula: &Formula, max_horizon: u32) -> Result<(), EncodingError> {
    let horizon = formula.horizon();
    if horizon > max_horizon {
        return Err(EncodingError::HorizonExceeded {
            horizon,
            limit: max_horizon,
        });
    }
    Ok(())
}

/// Encode `formula` evaluated at offset `t`, registering atoms in `table`.
pub fn encode(formula: &Formula, t: u32, table: &mut AtomTable) -> Result<SmtTerm, EncodingError> {
    match formula {
        Formula::Atom(name) => Ok(SmtTerm::var(table.var(name, t))),
        Formula::Not(inner) => Ok(encode(inner, t, table)?.not()),
        Formula::And(..) => Ok(SmtTerm::And(encode_run(formula, t, table)?)),
        Formula::Or(..) => Ok(SmtTerm::Or(encode_run(formula, t, table)?)),
        Formula::Eventually(iv, sub) => {
            let terms = encode_window(sub, t, window(iv)?, table)?;
            Ok(SmtTerm::or(terms))
        }
        Formula::Always(iv, sub) => {
            let terms = encode_window(sub, t, window(iv)?, table)?;
            Ok(SmtTerm::and(terms))
        }
        Formula::Until(iv, lhs, rhs) => {
            let ks = window(iv)?;
            let mut disjuncts = Vec::new();
            for k in ks {
                // `lhs` holds strictly before the step where `rhs` fires.
                let mut conj = encode_window(lhs, t, 0..k, table)?;
                conj.push(encode(rhs, offset(t, k)?, table)?);
                disjuncts.push(SmtTerm::and(conj));
            }
            Ok(SmtTerm::or(disjuncts))
        }
        Formula::Release(iv, lhs, rhs) => {
            let ks = window(iv)?;
            let mut disjuncts = Vec::new();
            for k in ks {
                let mut conj = encode_window(rhs, t, 0..=k, table)?;
                conj.push(encode(lhs, offset(t, k)?, table)?);
                disjuncts.push(SmtTerm::and(conj));
            }
            disjuncts.push(SmtTerm::and(encode_window(rhs, t, 0..=iv.high, table)?));
            Ok(SmtTerm::or(disjuncts))
        }
    }
}

/// Encode a left-nested run of one connective (`a & b & c`) as the operands
/// of a single n-ary term, leftmost first.
fn encode_run(run: &Formula, t: u32, table: &mut AtomTable) -> Result<Vec<SmtTerm>, EncodingError> {
    let mut rights: Vec<&Formula> = Vec::new();
    let mut node = run;
    loop {
        match (run, node) {
            (Formula::And(..), Formula::And(lhs, rhs)) | (Formula::Or(..), Formula::Or(lhs, rhs)) => {
                rights.push(rhs);
                node = &**lhs;
            }
            _ => break,
        }
    }
    let mut operands = Vec::with_capacity(rights.len() + 1);
    operands.push(encode(node, t, table)?);
    for rhs in rights.into_iter().rev() {
        operands.push(encode(rhs, t, table)?);
    }
    Ok(operands)
}

fn window(iv: &Interval) -> Result<std::ops::RangeInclusive<u32>, EncodingError> {
    if !iv.is_well_formed() {
        return Err(EncodingError::InvertedInterval {
            low: iv.low,
            high: iv.high,
        });
    }
    Ok(iv.low..=iv.high)
}

fn offset(t: u32, k: u32) -> Result<u32, EncodingError> {
    t.checked_add(k).ok_or(EncodingError::TimeOverflow { t, k })
}

fn encode_window(
    sub: &Formula,
    t: u32,
    ks: impl Iterator<Item = u32>,
    table: &mut AtomTable,
) -> Result<Vec<SmtTerm>, EncodingError> {
    ks.map(|k| encode(sub, offset(t, k)?, table)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mltl_dsl::parse;

    fn v(name: &str) -> SmtTerm {
        SmtTerm::var(name)
    }

    fn enc(text: &str) -> SmtTerm {
        let formula = parse(text).expect("formula should parse");
        encode(&formula, 0, &mut AtomTable::new()).expect("formula should encode")
    }

    #[test]
    fn atom_at_offset() {
        let mut table = AtomTable::new();
        let term = encode(&Formula::atom("p"), 7, &mut table).unwrap();
        assert_eq!(term, v("p@7"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn boolean_connectives() {
        assert_eq!(enc("!a"), v("a@0").not());
        assert_eq!(enc("a & b"), SmtTerm::And(vec![v("a@0"), v("b@0")]));
        assert_eq!(enc("a | b"), SmtTerm::Or(vec![v("a@0"), v("b@0")]));
    }

    #[test]
    fn same_connective_runs_become_one_term() {
        assert_eq!(
            enc("a & b & c"),
            SmtTerm::And(vec![v("a@0"), v("b@0"), v("c@0")])
        );
        assert_eq!(
            enc("a & b | c"),
            SmtTerm::Or(vec![SmtTerm::And(vec![v("a@0"), v("b@0")]), v("c@0")])
        );
        assert_eq!(
            enc("a & (b & c)"),
            SmtTerm::And(vec![v("a@0"), SmtTerm::And(vec![v("b@0"), v("c@0")])])
        );

        let chain = (0..5000).map(|i| format!("x{i}")).collect::<Vec<_>>().join(" & ");
        match enc(&chain) {
            SmtTerm::And(operands) => {
                assert_eq!(operands.len(), 5000);
                assert_eq!(operands[4999], v("x4999@0"));
            }
            other => panic!("expected one conjunction, got {other:?}"),
        }
    }

    #[test]
    fn eventually_and_always_range_over_window() {
        assert_eq!(
            enc("F[1,3]a"),
            SmtTerm::Or(vec![v("a@1"), v("a@2"), v("a@3")])
        );
        assert_eq!(enc("G[0,1]a"), SmtTerm::And(vec![v("a@0"), v("a@1")]));
        assert_eq!(enc("G[2,2]a"), v("a@2"));
    }

    #[test]
    fn nested_windows_shift_offsets() {
        assert_eq!(
            enc("F[1,1]G[0,1]a"),
            SmtTerm::And(vec![v("a@1"), v("a@2")])
        );
        let mut table = AtomTable::new();
        let term = encode(&parse("F[0,1]a").unwrap(), 5, &mut table).unwrap();
        assert_eq!(term, SmtTerm::Or(vec![v("a@5"), v("a@6")]));
    }

    #[test]
    fn until_requires_lhs_strictly_before_rhs() {
        assert_eq!(
            enc("a U[0,2] b"),
            SmtTerm::Or(vec![
                v("b@0"),
                SmtTerm::And(vec![v("a@0"), v("b@1")]),
                SmtTerm::And(vec![v("a@0"), v("a@1"), v("b@2")]),
            ])
        );
        assert_eq!(
            enc("a U[1,1] b"),
            SmtTerm::And(vec![v("a@0"), v("b@1")])
        );
    }

    #[test]
    fn release_includes_all_rights_disjunct() {
        assert_eq!(
            enc("a R[0,1] b"),
            SmtTerm::Or(vec![
                SmtTerm::And(vec![v("b@0"), v("a@0")]),
                SmtTerm::And(vec![v("b@0"), v("b@1"), v("a@1")]),
                SmtTerm::And(vec![v("b@0"), v("b@1")]),
            ])
        );
        assert_eq!(
            enc("a R[1,1] b"),
            SmtTerm::Or(vec![
                SmtTerm::And(vec![v("b@0"), v("b@1"), v("a@1")]),
                SmtTerm::And(vec![v("b@0"), v("b@1")]),
            ])
        );
    }

    #[test]
    fn inverted_interval_from_programmatic_ast() {
        let formula = Formula::eventually(4, 1, Formula::atom("a"));
        let err = encode(&formula, 0, &mut AtomTable::new()).unwrap_err();
        assert_eq!(err, EncodingError::InvertedInterval { low: 4, high: 1 });
    }

    #[test]
    fn time_overflow_is_reported() {
        let formula = Formula::eventually(2, 2, Formula::atom("a"));
        let err = encode(&formula, u32::MAX - 1, &mut AtomTable::new()).unwrap_err();
        assert_eq!(
            err,
            EncodingError::TimeOverflow {
                t: u32::MAX - 1,
                k: 2
            }
        );
    }

    #[test]
    fn horizon_limit_is_enforced_before_encoding() {
        let formula = Formula::eventually(0, 10, Formula::always(0, 10, Formula::atom("a")));
        let mut encoding = MltlEncoding::new();
        assert_eq!(
            encoding.push_formula(&formula, 19),
            Err(EncodingError::HorizonExceeded {
                horizon: 20,
                limit: 19
            })
        );
        assert!(encoding.assertions.is_empty());
        assert!(encoding.table().is_empty());
        assert!(encoding.push_formula(&formula, 20).is_ok());
    }

    #[test]
    fn encoding_shares_variables_across_formulas() {
        let formulas = vec![parse("G[0,2]a").unwrap(), parse("F[0,2]!a").unwrap()];
        let encoding = encode_formulas(&formulas, DEFAULT_MAX_HORIZON).unwrap();
        assert_eq!(encoding.assertions.len(), 2);
        let decls: Vec<&str> = encoding.declarations().collect();
        assert_eq!(decls, vec!["a@0", "a@1", "a@2"]);
    }

    #[test]
    fn script_declares_then_asserts() {
        let formulas = vec![parse("a").unwrap(), parse("!a").unwrap()];
        let script = encode_formulas(&formulas, DEFAULT_MAX_HORIZON)
            .unwrap()
            .to_smtlib();
        assert_eq!(
            script,
            "(set-logic QF_UF)\n\
             (declare-const |a@0| Bool)\n\
             (assert |a@0|)\n\
             (assert (not |a@0|))\n\
             (check-sat)\n"
        );
    }
}
