//! Flows-to constraint solving
//!
//! This module turns constraints between lattice terms into a data flow graph:
//! - Terms over constants and variables ([`Term`], [`AtomicTerm`])
//! - Reduction of `from ≤ to` into atomic graph edges ([`Constraint`])
//! - Graph construction, greatest solution, and validation ([`ConstraintSystem`])
//! - Graphviz export for debugging

mod constraint;
mod error;
mod system;
mod term;

pub use constraint::{reduce, Constraint, ReducedFlowsToConstraint};
pub use error::IllegalTermError;
pub use system::{ConstraintSolution, ConstraintSystem};
pub use term::{AtomicTerm, Term};
