/// Abstract boolean term, solver-agnostic.
///
/// Every variable is a `Bool`; the encoder never produces arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SmtTerm {
    /// Variable reference by name.
    Var(String),
    /// Boolean literal.
    BoolLit(bool),
    /// Conjunction; empty is `true`.
    And(Vec<SmtTerm>),
    /// Disjunction; empty is `false`.
    Or(Vec<SmtTerm>),
    Not(Box<SmtTerm>),
}

#[allow(clippy::should_implement_trait)]
impl SmtTerm {
    pub fn var(name: impl Into<String>) -> Self {
        SmtTerm::Var(name.into())
    }

    pub fn bool(b: bool) -> Self {
        SmtTerm::BoolLit(b)
    }

    /// Conjunction that collapses a single operand to itself.
    pub fn and(mut terms: Vec<SmtTerm>) -> Self {
        if terms.len() == 1 {
            terms.swap_remove(0)
        } else {
            SmtTerm::And(terms)
        }
    }

    /// Disjunction that collapses a single operand to itself.
    pub fn or(mut terms: Vec<SmtTerm>) -> Self {
        if terms.len() == 1 {
            terms.swap_remove(0)
        } else {
            SmtTerm::Or(terms)
        }
    }

    pub fn not(self) -> Self {
        SmtTerm::Not(Box::new(self))
    }

    /// Number of nodes in the term tree.
    pub fn size(&self) -> usize {
        match self {
            SmtTerm::Var(_) | SmtTerm::BoolLit(_) => 1,
            SmtTerm::Not(inner) => 1 + inner.size(),
            SmtTerm::And(terms) | SmtTerm::Or(terms) => {
                1 + terms.iter().map(SmtTerm::size).sum::<usize>()
            }
        }
    }
}
