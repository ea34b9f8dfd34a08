use std::collections::HashSet;

/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Closed time window `[low, high]` attached to a temporal operator.
///
/// Bounds are relative to the time offset at which the operator is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Interval {
    pub low: u32,
    pub high: u32,
}

impl Interval {
    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Whether `low <= high`. Inverted windows are rejected by the parser and
    /// by the encoder.
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.high
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.low, self.high)
    }
}

/// MLTL formula.
///
/// `&`, `|`, `U[..]` and `R[..]` share one precedence level and associate to
/// the left; `!`, `F[..]` and `G[..]` bind tighter than any of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Formula {
    Atom(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    /// `F[low,high] sub`: `sub` holds at some step of the window.
    Eventually(Interval, Box<Formula>),
    /// `G[low,high] sub`: `sub` holds at every step of the window.
    Always(Interval, Box<Formula>),
    /// `lhs U[low,high] rhs`
    Until(Interval, Box<Formula>, Box<Formula>),
    /// `lhs R[low,high] rhs`
    Release(Interval, Box<Formula>, Box<Formula>),
}

#[allow(clippy::should_implement_trait)]
impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn and(self, other: Formula) -> Self {
        Formula::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Formula) -> Self {
        Formula::Or(Box::new(self), Box::new(other))
    }

    pub fn eventually(low: u32, high: u32, sub: Formula) -> Self {
        Formula::Eventually(Interval::new(low, high), Box::new(sub))
    }

    pub fn always(low: u32, high: u32, sub: Formula) -> Self {
        Formula::Always(Interval::new(low, high), Box::new(sub))
    }

    pub fn until(self, low: u32, high: u32, rhs: Formula) -> Self {
        Formula::Until(Interval::new(low, high), Box::new(self), Box::new(rhs))
    }

    pub fn release(self, low: u32, high: u32, rhs: Formula) -> Self {
        Formula::Release(Interval::new(low, high), Box::new(self), Box::new(rhs))
    }

    /// Whether this is a binary infix operator.
    fn is_binary(&self) -> bool {
        matches!(
            self,
            Formula::And(_, _)
                | Formula::Or(_, _)
                | Formula::Until(_, _, _)
                | Formula::Release(_, _, _)
        )
    }

    /// Distinct atom names in order of first occurrence (left to right).
    pub fn atoms(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut work: Vec<&Formula> = vec![self];
        while let Some(node) = work.pop() {
            match node {
                Formula::Atom(name) => {
                    if seen.insert(name) {
                        out.push(name);
                    }
                }
                Formula::Not(inner) | Formula::Eventually(_, inner) | Formula::Always(_, inner) => {
                    work.push(inner)
                }
                Formula::And(lhs, rhs)
                | Formula::Or(lhs, rhs)
                | Formula::Until(_, lhs, rhs)
                | Formula::Release(_, lhs, rhs) => {
                    work.push(rhs);
                    work.push(lhs);
                }
            }
        }
        out
    }

    /// Upper bound on the relative timestep the formula can reference when
    /// evaluated at offset 0. Saturates instead of overflowing.
    pub fn horizon(&self) -> u32 {
        let mut horizon = 0;
        let mut work: Vec<(&Formula, u32)> = vec![(self, 0)];
        while let Some((node, offset)) = work.pop() {
            match node {
                Formula::Atom(_) => horizon = horizon.max(offset),
                Formula::Not(inner) => work.push((inner, offset)),
                Formula::And(lhs, rhs) | Formula::Or(lhs, rhs) => {
                    work.push((lhs, offset));
                    work.push((rhs, offset));
                }
                Formula::Eventually(iv, inner) | Formula::Always(iv, inner) => {
                    work.push((inner, offset.saturating_add(iv.high)))
                }
                Formula::Until(iv, lhs, rhs) | Formula::Release(iv, lhs, rhs) => {
                    let offset = offset.saturating_add(iv.high);
                    work.push((lhs, offset));
                    work.push((rhs, offset));
                }
            }
        }
        horizon
    }

    /// Height of the syntax tree; an atom has depth 1.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut work: Vec<(&Formula, usize)> = vec![(self, 1)];
        while let Some((node, level)) = work.pop() {
            depth = depth.max(level);
            match node {
                Formula::Atom(_) => {}
                Formula::Not(inner) | Formula::Eventually(_, inner) | Formula::Always(_, inner) => {
                    work.push((inner, level + 1))
                }
                Formula::And(lhs, rhs)
                | Formula::Or(lhs, rhs)
                | Formula::Until(_, lhs, rhs)
                | Formula::Release(_, lhs, rhs) => {
                    work.push((lhs, level + 1));
                    work.push((rhs, level + 1));
                }
            }
        }
        depth
    }

    /// Move every non-atom child into `into`, leaving empty atoms behind.
    fn detach_children(&mut self, into: &mut Vec<Formula>) {
        let (first, second) = match self {
            Formula::Atom(_) => return,
            Formula::Not(inner) | Formula::Eventually(_, inner) | Formula::Always(_, inner) => {
                (inner, None)
            }
            Formula::And(lhs, rhs)
            | Formula::Or(lhs, rhs)
            | Formula::Until(_, lhs, rhs)
            | Formula::Release(_, lhs, rhs) => (lhs, Some(rhs)),
        };
        for child in std::iter::once(first).chain(second) {
            if !matches!(**child, Formula::Atom(_)) {
                into.push(std::mem::replace(&mut **child, Formula::Atom(String::new())));
            }
        }
    }

    /// Right children need parens when they are binary, to keep the grouping
    /// under the left-associative parser.
    fn fmt_right(child: &Formula, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if child.is_binary() {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }
}

// Long operator chains are deeper than the native stack allows for a
// recursive drop; detach subtrees onto a heap worklist instead.
impl Drop for Formula {
    fn drop(&mut self) {
        let mut detached: Vec<Formula> = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{name}"),
            Formula::Not(inner) => {
                write!(f, "!")?;
                Formula::fmt_right(inner, f)
            }
            Formula::Eventually(iv, inner) => {
                write!(f, "F{iv}")?;
                Formula::fmt_right(inner, f)
            }
            Formula::Always(iv, inner) => {
                write!(f, "G{iv}")?;
                Formula::fmt_right(inner, f)
            }
            _ => {
                // Walk the left spine so chains print without recursing per link.
                let mut spine: Vec<&Formula> = Vec::new();
                let mut leftmost = self;
                while let Formula::And(lhs, _)
                | Formula::Or(lhs, _)
                | Formula::Until(_, lhs, _)
                | Formula::Release(_, lhs, _) = leftmost
                {
                    spine.push(leftmost);
                    leftmost = &**lhs;
                }
                write!(f, "{leftmost}")?;
                for link in spine.into_iter().rev() {
                    let rhs = match link {
                        Formula::And(_, rhs) => {
                            write!(f, " & ")?;
                            rhs
                        }
                        Formula::Or(_, rhs) => {
                            write!(f, " | ")?;
                            rhs
                        }
                        Formula::Until(iv, _, rhs) => {
                            write!(f, " U{iv} ")?;
                            rhs
                        }
                        Formula::Release(iv, _, rhs) => {
                            write!(f, " R{iv} ")?;
                            rhs
                        }
                        _ => continue,
                    };
                    Formula::fmt_right(rhs, f)?;
                }
                Ok(())
            }
        }
    }
}
