//! Edge functions of the constraint graph
//!
//! Reducing `meet(≤1 constant, ≤1 variable) ≤ join(≤1 constant, ≤1 variable)`
//! yields exactly four shapes of edge function. They form a closed enum so
//! every match site has to handle a new shape explicitly.

use super::solver::DataFlowEdge;
use crate::algebra::HeytingAlgebra;
use std::fmt;

/// A monotone function `C → C` labelling an edge of the constraint graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlowEdge<C> {
    /// `v ↦ v`
    Identity,
    /// `v ↦ antecedent → v`
    Imply(C),
    /// `v ↦ constant ∨ v`
    Join(C),
    /// `v ↦ antecedent → (constant ∨ v)`
    ImplyThenJoin { antecedent: C, constant: C },
}

/// Contribution of the left-hand side of a reduced constraint.
///
/// `c ∧ x ≤ r` is equivalent to `x ≤ c → r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeftHandEdge<C> {
    Identity,
    Imply(C),
}

/// Contribution of the right-hand side of a reduced constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RightHandEdge<C> {
    Identity,
    Join(C),
}

impl<C> LeftHandEdge<C> {
    /// The edge function that first applies `right`, then `self`
    pub fn compose(self, right: RightHandEdge<C>) -> FlowEdge<C> {
        match (self, right) {
            (LeftHandEdge::Identity, RightHandEdge::Identity) => FlowEdge::Identity,
            (LeftHandEdge::Imply(antecedent), RightHandEdge::Identity) => FlowEdge::Imply(antecedent),
            (LeftHandEdge::Identity, RightHandEdge::Join(constant)) => FlowEdge::Join(constant),
            (LeftHandEdge::Imply(antecedent), RightHandEdge::Join(constant)) => {
                FlowEdge::ImplyThenJoin { antecedent, constant }
            }
        }
    }
}

impl<C> FlowEdge<C> {
    pub fn is_identity(&self) -> bool {
        matches!(self, FlowEdge::Identity)
    }
}

impl<C: HeytingAlgebra + Clone> DataFlowEdge<C> for FlowEdge<C> {
    fn propagate(&self, input: &C) -> C {
        match self {
            FlowEdge::Identity => input.clone(),
            FlowEdge::Imply(antecedent) => antecedent.imply(input),
            FlowEdge::Join(constant) => constant.join(input),
            FlowEdge::ImplyThenJoin { antecedent, constant } => antecedent.imply(&constant.join(input)),
        }
    }
}

impl<C: fmt::Display> fmt::Display for FlowEdge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowEdge::Identity => Ok(()),
            FlowEdge::Imply(antecedent) => write!(f, "{antecedent} → _"),
            FlowEdge::Join(constant) => write!(f, "{constant} ∨ _"),
            FlowEdge::ImplyThenJoin { antecedent, constant } => {
                write!(f, "{antecedent} → ({constant} ∨ _)")
            }
        }
    }
}
