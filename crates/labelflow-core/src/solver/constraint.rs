//! Flows-to constraints and their reduction to graph primitives
//!
//! A constraint `from ≤ to` over arbitrary terms is normalized as follows:
//! - `from` becomes a join of meets, `to` a meet of joins
//! - each meet/join must hold at most one constant and at most one variable
//! - every (left clause, right clause) pair becomes one
//!   [`ReducedFlowsToConstraint`]: `left ≤ edge(right)`
//!
//! `c ∧ x ≤ d ∨ y` reduces to `x ≤ c → (d ∨ y)`, which is where the four
//! [`FlowEdge`] shapes come from.

use super::error::IllegalTermError;
use super::term::{AtomicTerm, Term};
use crate::algebra::{JoinSemiLattice, MeetSemiLattice};
use crate::dataflow::{FlowEdge, LeftHandEdge, RightHandEdge};
use std::fmt;

/// The join or meet of at most one constant and at most one variable.
/// Which of the two it is depends on context.
#[derive(Debug, Clone)]
struct ConstantAndVariable<C, V> {
    constant: Option<C>,
    variable: Option<V>,
}

/// Two distinct variables that would have to share one clause
struct DistinctVariables<V>(V, V);

impl<C: Clone, V: Clone + PartialEq> ConstantAndVariable<C, V> {
    fn constant(value: &C) -> Self {
        Self {
            constant: Some(value.clone()),
            variable: None,
        }
    }

    fn variable(variable: &V) -> Self {
        Self {
            constant: None,
            variable: Some(variable.clone()),
        }
    }

    /// Merge two clauses, combining constants with `operation`
    fn combine(&self, that: &Self, operation: impl Fn(&C, &C) -> C) -> Result<Self, DistinctVariables<V>> {
        let constant = match (&self.constant, &that.constant) {
            (Some(c1), Some(c2)) => Some(operation(c1, c2)),
            (c1, c2) => c1.clone().or_else(|| c2.clone()),
        };
        let variable = match (&self.variable, &that.variable) {
            (Some(v1), Some(v2)) if v1 != v2 => return Err(DistinctVariables(v1.clone(), v2.clone())),
            (v1, v2) => v1.clone().or_else(|| v2.clone()),
        };
        Ok(Self { constant, variable })
    }

    /// The graph node standing for this clause
    fn node(&self) -> Option<AtomicTerm<C, V>> {
        match (&self.variable, &self.constant) {
            (Some(variable), _) => Some(AtomicTerm::Variable(variable.clone())),
            (None, Some(constant)) => Some(AtomicTerm::Constant(constant.clone())),
            (None, None) => None,
        }
    }

    fn left_hand_edge(&self) -> LeftHandEdge<C> {
        match (&self.constant, &self.variable) {
            (Some(constant), Some(_)) => LeftHandEdge::Imply(constant.clone()),
            _ => LeftHandEdge::Identity,
        }
    }

    fn right_hand_edge(&self) -> RightHandEdge<C> {
        match (&self.constant, &self.variable) {
            (Some(constant), Some(_)) => RightHandEdge::Join(constant.clone()),
            _ => RightHandEdge::Identity,
        }
    }
}

/// Represent `term` as the join of many meets
fn join_of_meets<C, V>(term: &Term<C, V>) -> Result<Vec<ConstantAndVariable<C, V>>, DistinctVariables<V>>
where
    C: MeetSemiLattice + Clone,
    V: Clone + PartialEq,
{
    match term {
        Term::Constant(value) => Ok(vec![ConstantAndVariable::constant(value)]),
        Term::Variable(variable) => Ok(vec![ConstantAndVariable::variable(variable)]),
        Term::Join(lhs, rhs) => {
            let mut meets = join_of_meets(lhs)?;
            meets.extend(join_of_meets(rhs)?);
            Ok(meets)
        }
        Term::Meet(lhs, rhs) => {
            let lhs = join_of_meets(lhs)?;
            let rhs = join_of_meets(rhs)?;
            let mut meets = Vec::with_capacity(lhs.len() * rhs.len());
            for m1 in &lhs {
                for m2 in &rhs {
                    meets.push(m1.combine(m2, C::meet)?);
                }
            }
            Ok(meets)
        }
    }
}

/// Represent `term` as the meet of many joins
fn meet_of_joins<C, V>(term: &Term<C, V>) -> Result<Vec<ConstantAndVariable<C, V>>, DistinctVariables<V>>
where
    C: JoinSemiLattice + Clone,
    V: Clone + PartialEq,
{
    match term {
        Term::Constant(value) => Ok(vec![ConstantAndVariable::constant(value)]),
        Term::Variable(variable) => Ok(vec![ConstantAndVariable::variable(variable)]),
        Term::Join(lhs, rhs) => {
            let lhs = meet_of_joins(lhs)?;
            let rhs = meet_of_joins(rhs)?;
            let mut joins = Vec::with_capacity(lhs.len() * rhs.len());
            for j1 in &lhs {
                for j2 in &rhs {
                    joins.push(j1.combine(j2, C::join)?);
                }
            }
            Ok(joins)
        }
        Term::Meet(lhs, rhs) => {
            let mut joins = meet_of_joins(lhs)?;
            joins.extend(meet_of_joins(rhs)?);
            Ok(joins)
        }
    }
}

/// An atomic constraint `from ≤ edge(to)`.
///
/// In the constraint graph this is an edge from `to` to `from`: values flow
/// from right-hand nodes to left-hand nodes because the solver looks for the
/// greatest solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedFlowsToConstraint<C, V> {
    pub from: AtomicTerm<C, V>,
    pub edge: FlowEdge<C>,
    pub to: AtomicTerm<C, V>,
}

/// Reduce `from ≤ to` to atomic constraints
pub fn reduce<C, V>(from: &Term<C, V>, to: &Term<C, V>) -> Result<Vec<ReducedFlowsToConstraint<C, V>>, IllegalTermError>
where
    C: MeetSemiLattice + JoinSemiLattice + Clone + fmt::Display,
    V: Clone + PartialEq + fmt::Display,
{
    let lhs = join_of_meets(from).map_err(|DistinctVariables(first, second)| {
        IllegalTermError::MeetOfDistinctVariables {
            term: from.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    })?;
    let rhs = meet_of_joins(to).map_err(|DistinctVariables(first, second)| {
        IllegalTermError::JoinOfDistinctVariables {
            term: to.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    })?;

    let mut reduced = Vec::with_capacity(lhs.len() * rhs.len());
    for left in &lhs {
        for right in &rhs {
            // Clauses always hold a constant or a variable
            let (Some(from), Some(to)) = (left.node(), right.node()) else {
                continue;
            };
            let edge = left.left_hand_edge().compose(right.right_hand_edge());
            reduced.push(ReducedFlowsToConstraint { from, edge, to });
        }
    }
    Ok(reduced)
}

/// A flows-to constraint `from ≤ to`, together with its reduction and the
/// error to raise when it cannot be satisfied.
pub struct Constraint<C, V, T> {
    from: Term<C, V>,
    to: Term<C, V>,
    fail_with: Box<dyn Fn(C, C) -> T + Send + Sync>,
    reduced: Vec<ReducedFlowsToConstraint<C, V>>,
}

impl<C, V, T> Constraint<C, V, T> {
    pub fn from(&self) -> &Term<C, V> {
        &self.from
    }

    pub fn to(&self) -> &Term<C, V> {
        &self.to
    }

    pub fn reduced(&self) -> &[ReducedFlowsToConstraint<C, V>] {
        &self.reduced
    }

    /// Build the client error from best-effort values of both sides
    pub fn fail(&self, from: C, to: C) -> T {
        (self.fail_with)(from, to)
    }
}

impl<C: fmt::Debug, V: fmt::Debug, T> fmt::Debug for Constraint<C, V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("reduced", &self.reduced)
            .finish_non_exhaustive()
    }
}

impl<C, V> Term<C, V>
where
    C: MeetSemiLattice + JoinSemiLattice + Clone + fmt::Display,
    V: Clone + PartialEq + fmt::Display,
{
    /// The constraint `self ≤ that`.
    ///
    /// `fail_with` builds the error raised when the constraint turns out to be
    /// unsatisfiable; it receives best-effort values for `self` and `that`.
    pub fn flows_to<T>(
        &self,
        that: &Term<C, V>,
        fail_with: impl Fn(C, C) -> T + Send + Sync + 'static,
    ) -> Result<Constraint<C, V, T>, IllegalTermError> {
        let reduced = reduce(self, that)?;
        Ok(Constraint {
            from: self.clone(),
            to: that.clone(),
            fail_with: Box::new(fail_with),
            reduced,
        })
    }
}
