//! # Labelflow Core
//!
//! Security label inference by greatest-fixpoint constraint solving.
//!
//! Given flows-to constraints between labels, some known and some unknown,
//! computes the most permissive assignment to every unknown label that
//! satisfies all constraints, or reports a constraint that cannot hold.
//!
//! ## Modules
//!
//! - **[`algebra`]** - Lattice traits, bounds, and the free distributive lattice
//! - **[`dataflow`]** - SCC-ordered greatest-fixpoint solver and edge functions
//! - **[`solver`]** - Terms, constraint reduction, and constraint systems
//! - **[`security`]** - Confidentiality/integrity labels and label constraints
//!
//! ## Quick Start
//!
//! ```rust
//! use labelflow_core::prelude::*;
//!
//! type Principal = FreeDistributiveLattice<&'static str>;
//!
//! let bounds = Principal::bounds();
//! let alice = SecurityLattice::uniform(Principal::new("alice"));
//! let x = variable_term::<Principal, _>("x");
//!
//! // x flows to alice
//! let constraints = flows_to(&x, &constant_term(&alice), &bounds, |from, to| format!("{from} ↛ {to}")).unwrap();
//! let system = ConstraintSystem::new(constraints, bounds.clone(), StructuralOrder);
//! let solution = system.label_solution().unwrap();
//!
//! assert_eq!(solution.get(&"x"), alice.integrity(&bounds));
//! ```

pub mod algebra;
pub mod dataflow;
pub mod security;
pub mod solver;

/// Prelude for convenient imports
pub mod prelude {
    // From algebra
    pub use crate::algebra::{
        Bounds, Congruence, FreeDistributiveLattice, FreeDistributiveLatticeCongruence, HeytingAlgebra,
        JoinSemiLattice, Lattice, LessThanOrEqualTo, MeetSemiLattice, StructuralOrder,
    };

    // From solver
    pub use crate::solver::{AtomicTerm, Constraint, ConstraintSolution, ConstraintSystem, IllegalTermError, Term};

    // From security
    pub use crate::security::{
        confidentiality_flows_to, constant_term, flows_to, integrity_flows_to, variable_term, ComponentVariable,
        LabelSolution, LabelTerm, SecurityBounds, SecurityLattice, TrustLattice,
    };
}

// Re-export main types at crate root for convenience
pub use algebra::{Bounds, FreeDistributiveLattice, FreeDistributiveLatticeCongruence, StructuralOrder};
pub use dataflow::{solve_data_flow, FixpointSolver, FlowEdge};
pub use security::{SecurityBounds, SecurityLattice};
pub use solver::{ConstraintSolution, ConstraintSystem, IllegalTermError, Term};
