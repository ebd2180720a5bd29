//! Label-level constraints
//!
//! A label term is a pair of component terms. Its variables are tagged with
//! the component they stand for, so the confidentiality and integrity halves
//! of a problem never share a variable node even when they live in one
//! [`ConstraintSystem`].

use super::lattice::SecurityLattice;
use crate::algebra::{Bounds, Congruence, HeytingAlgebra, Lattice};
use crate::solver::{Constraint, ConstraintSolution, ConstraintSystem, IllegalTermError, Term};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A constraint variable for one component of a label variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentVariable<V> {
    Confidentiality(V),
    Integrity(V),
}

impl<V> ComponentVariable<V> {
    /// The label variable this component belongs to
    pub fn base(&self) -> &V {
        match self {
            ComponentVariable::Confidentiality(variable) | ComponentVariable::Integrity(variable) => variable,
        }
    }
}

impl<V: fmt::Display> fmt::Display for ComponentVariable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentVariable::Confidentiality(variable) => write!(f, "{variable}→"),
            ComponentVariable::Integrity(variable) => write!(f, "{variable}←"),
        }
    }
}

/// A label expression that can appear in constraints
pub type LabelTerm<C, V> = SecurityLattice<Term<C, ComponentVariable<V>>>;

/// A label-level constraint component
pub type LabelConstraint<C, V, T> = Constraint<C, ComponentVariable<V>, T>;

/// Embed a constant label
pub fn constant_term<C: Clone, V>(label: &SecurityLattice<C>) -> LabelTerm<C, V> {
    SecurityLattice::new(
        Term::constant(label.confidentiality_component().clone()),
        Term::constant(label.integrity_component().clone()),
    )
}

/// Embed a label variable
pub fn variable_term<C, V: Clone>(variable: V) -> LabelTerm<C, V> {
    SecurityLattice::new(
        Term::variable(ComponentVariable::Confidentiality(variable.clone())),
        Term::variable(ComponentVariable::Integrity(variable)),
    )
}

/// Constraints representing `from` flows to `to`.
///
/// `fail_with` builds the error for an unsatisfiable component; it receives
/// best-effort values for `from` and `to`, projected onto that component.
pub fn flows_to<C, V, T>(
    from: &LabelTerm<C, V>,
    to: &LabelTerm<C, V>,
    bounds: &Bounds<C>,
    fail_with: impl Fn(SecurityLattice<C>, SecurityLattice<C>) -> T + Send + Sync + 'static,
) -> Result<Vec<LabelConstraint<C, V, T>>, IllegalTermError>
where
    C: Lattice + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Display,
{
    let fail_with = Arc::new(fail_with);
    let confidentiality = confidentiality_constraint(from, to, bounds, Arc::clone(&fail_with))?;
    let integrity = integrity_constraint(from, to, bounds, fail_with)?;
    Ok(vec![confidentiality, integrity])
}

/// The confidentiality half of `from` flows to `to`: readers of `to` must be
/// allowed to read `from`
pub fn confidentiality_flows_to<C, V, T>(
    from: &LabelTerm<C, V>,
    to: &LabelTerm<C, V>,
    bounds: &Bounds<C>,
    fail_with: impl Fn(SecurityLattice<C>, SecurityLattice<C>) -> T + Send + Sync + 'static,
) -> Result<Vec<LabelConstraint<C, V, T>>, IllegalTermError>
where
    C: Lattice + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Display,
{
    Ok(vec![confidentiality_constraint(from, to, bounds, Arc::new(fail_with))?])
}

/// The integrity half of `from` flows to `to`: writers of `from` must be
/// trusted by `to`
pub fn integrity_flows_to<C, V, T>(
    from: &LabelTerm<C, V>,
    to: &LabelTerm<C, V>,
    bounds: &Bounds<C>,
    fail_with: impl Fn(SecurityLattice<C>, SecurityLattice<C>) -> T + Send + Sync + 'static,
) -> Result<Vec<LabelConstraint<C, V, T>>, IllegalTermError>
where
    C: Lattice + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Display,
{
    Ok(vec![integrity_constraint(from, to, bounds, Arc::new(fail_with))?])
}

fn confidentiality_constraint<C, V, T, F>(
    from: &LabelTerm<C, V>,
    to: &LabelTerm<C, V>,
    bounds: &Bounds<C>,
    fail_with: Arc<F>,
) -> Result<LabelConstraint<C, V, T>, IllegalTermError>
where
    C: Lattice + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Display,
    F: Fn(SecurityLattice<C>, SecurityLattice<C>) -> T + Send + Sync + 'static,
{
    let bounds = bounds.clone();
    // Operands are swapped: the constraint is `to ≤ from`
    to.confidentiality_component()
        .flows_to(from.confidentiality_component(), move |to_value, from_value| {
            fail_with(
                SecurityLattice::uniform(from_value).confidentiality(&bounds),
                SecurityLattice::uniform(to_value).confidentiality(&bounds),
            )
        })
}

fn integrity_constraint<C, V, T, F>(
    from: &LabelTerm<C, V>,
    to: &LabelTerm<C, V>,
    bounds: &Bounds<C>,
    fail_with: Arc<F>,
) -> Result<LabelConstraint<C, V, T>, IllegalTermError>
where
    C: Lattice + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + PartialEq + fmt::Display,
    F: Fn(SecurityLattice<C>, SecurityLattice<C>) -> T + Send + Sync + 'static,
{
    let bounds = bounds.clone();
    from.integrity_component()
        .flows_to(to.integrity_component(), move |from_value, to_value| {
            fail_with(
                SecurityLattice::uniform(from_value).integrity(&bounds),
                SecurityLattice::uniform(to_value).integrity(&bounds),
            )
        })
}

/// Solved labels for label variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSolution<C, V: Hash + Eq> {
    components: ConstraintSolution<C, ComponentVariable<V>>,
}

impl<C: Clone, V: Clone + Hash + Eq> LabelSolution<C, V> {
    pub fn new(components: ConstraintSolution<C, ComponentVariable<V>>) -> Self {
        Self { components }
    }

    /// The inferred label of `variable`; unconstrained components are weakest
    pub fn get(&self, variable: &V) -> SecurityLattice<C> {
        SecurityLattice::new(
            self.components
                .get(&ComponentVariable::Confidentiality(variable.clone()))
                .clone(),
            self.components
                .get(&ComponentVariable::Integrity(variable.clone()))
                .clone(),
        )
    }

    /// Evaluate a label term under this solution
    pub fn evaluate(&self, term: &LabelTerm<C, V>) -> SecurityLattice<C>
    where
        C: Lattice,
    {
        SecurityLattice::new(
            self.components.evaluate(term.confidentiality_component()),
            self.components.evaluate(term.integrity_component()),
        )
    }

    /// Label variables with at least one solved component, in first-seen order
    pub fn variables(&self) -> Vec<&V> {
        let mut variables: Vec<&V> = Vec::new();
        for (variable, _) in self.components.iter() {
            if !variables.contains(&variable.base()) {
                variables.push(variable.base());
            }
        }
        variables
    }

    pub fn components(&self) -> &ConstraintSolution<C, ComponentVariable<V>> {
        &self.components
    }
}

impl<C, V, T, O> ConstraintSystem<C, ComponentVariable<V>, T, O>
where
    C: HeytingAlgebra + Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    O: Congruence<C>,
{
    /// The greatest label assignment, or the error of the first violated constraint
    pub fn label_solution(&self) -> Result<LabelSolution<C, V>, T> {
        self.solution().map(LabelSolution::new)
    }
}
