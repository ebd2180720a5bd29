//! Security labels over a principal lattice
//!
//! - [`SecurityLattice`]: confidentiality/integrity pairs with flow and trust operations
//! - [`SecurityBounds`]: strongest, weakest, bottom, and top labels
//! - Label terms and label-level flows-to constraints, solved by the generic
//!   [`ConstraintSystem`](crate::solver::ConstraintSystem)

mod lattice;
mod solver;

pub use lattice::{SecurityBounds, SecurityLattice, TrustLattice};
pub use solver::{
    confidentiality_flows_to, constant_term, flows_to, integrity_flows_to, variable_term, ComponentVariable,
    LabelConstraint, LabelSolution, LabelTerm,
};
