//! Lattice expressions over constants and variables

use crate::algebra::{Bounds, JoinSemiLattice, MeetSemiLattice};
use crate::dataflow::DataFlowNode;
use std::fmt;

/// A lattice expression that can appear in constraints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term<C, V> {
    Constant(C),
    Variable(V),
    Join(Box<Term<C, V>>, Box<Term<C, V>>),
    Meet(Box<Term<C, V>>, Box<Term<C, V>>),
}

/// A constant or a variable; the only terms that become graph nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomicTerm<C, V> {
    Constant(C),
    Variable(V),
}

impl<C, V> Term<C, V> {
    pub fn constant(value: C) -> Self {
        Term::Constant(value)
    }

    pub fn variable(variable: V) -> Self {
        Term::Variable(variable)
    }

    pub fn join_constant(self, that: C) -> Self {
        Term::Join(Box::new(self), Box::new(Term::Constant(that)))
    }

    pub fn join_variable(self, that: V) -> Self {
        Term::Join(Box::new(self), Box::new(Term::Variable(that)))
    }

    pub fn meet_constant(self, that: C) -> Self {
        Term::Meet(Box::new(self), Box::new(Term::Constant(that)))
    }

    pub fn meet_variable(self, that: V) -> Self {
        Term::Meet(Box::new(self), Box::new(Term::Variable(that)))
    }

    /// Term bounds derived from bounds on constants
    pub fn bounds(bounds: &Bounds<C>) -> Bounds<Self>
    where
        C: Clone,
    {
        bounds.map(|value| Term::Constant(value.clone()))
    }

    /// Visit every variable in the term, left to right
    pub fn variables(&self) -> Vec<&V> {
        let mut variables = Vec::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a V>) {
        match self {
            Term::Constant(_) => {}
            Term::Variable(variable) => out.push(variable),
            Term::Join(lhs, rhs) | Term::Meet(lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
        }
    }
}

impl<C: Clone, V: Clone> JoinSemiLattice for Term<C, V> {
    fn join(&self, that: &Self) -> Self {
        Term::Join(Box::new(self.clone()), Box::new(that.clone()))
    }
}

impl<C: Clone, V: Clone> MeetSemiLattice for Term<C, V> {
    fn meet(&self, that: &Self) -> Self {
        Term::Meet(Box::new(self.clone()), Box::new(that.clone()))
    }
}

impl<C, V> From<AtomicTerm<C, V>> for Term<C, V> {
    fn from(term: AtomicTerm<C, V>) -> Self {
        match term {
            AtomicTerm::Constant(value) => Term::Constant(value),
            AtomicTerm::Variable(variable) => Term::Variable(variable),
        }
    }
}

/// Constants are frozen at their value; variables take whatever flows in
impl<C: Clone, V> DataFlowNode<C> for AtomicTerm<C, V> {
    fn transfer(&self, input: &C) -> C {
        match self {
            AtomicTerm::Constant(value) => value.clone(),
            AtomicTerm::Variable(_) => input.clone(),
        }
    }
}

impl<C: fmt::Display, V: fmt::Display> fmt::Display for Term<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(value) => write!(f, "{value}"),
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Join(lhs, rhs) => write!(f, "({lhs} ⊔ {rhs})"),
            Term::Meet(lhs, rhs) => write!(f, "({lhs} ⊓ {rhs})"),
        }
    }
}

impl<C: fmt::Display, V: fmt::Display> fmt::Display for AtomicTerm<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicTerm::Constant(value) => write!(f, "{value}"),
            AtomicTerm::Variable(variable) => write!(f, "{variable}"),
        }
    }
}
