//! Variable naming for unrolled atoms.

use indexmap::IndexMap;

/// An atom observed at an absolute timestep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimedAtom {
    pub name: String,
    pub time: u32,
}

/// Variable naming convention: `name@t` is atom `name` at timestep `t`.
///
/// `@` never occurs in an atom, so distinct `(name, t)` pairs never collide.
pub fn timed_var_name(name: &str, time: u32) -> String {
    format!("{name}@{time}")
}

/// Memo of the boolean variables created while encoding one query.
///
/// Scoped to a single satisfiability check: every check builds a fresh table
/// so no variable leaks between unrelated queries. Iteration follows
/// creation order, which keeps declarations deterministic.
#[derive(Debug, Clone, Default)]
pub struct AtomTable {
    vars: IndexMap<TimedAtom, String>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable for `name` at `time`, created on first reference.
    pub fn var(&mut self, name: &str, time: u32) -> String {
        self.vars
            .entry(TimedAtom {
                name: name.to_string(),
                time,
            })
            .or_insert_with(|| timed_var_name(name, time))
            .clone()
    }

    pub fn get(&self, name: &str, time: u32) -> Option<&str> {
        self.vars
            .get(&TimedAtom {
                name: name.to_string(),
                time,
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names in creation order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.vars.values().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&TimedAtom, &str)> {
        self.vars.iter().map(|(k, v)| (k, v.as_str()))
    }
}
