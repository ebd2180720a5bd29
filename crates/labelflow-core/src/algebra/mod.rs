//! Lattice algebra for security labels
//!
//! This module defines the algebraic structure the solver works over:
//! - Join and meet semilattices
//! - Bounded lattices, with bounds passed around as explicit [`Bounds`] values
//! - Heyting algebras (lattices with relative pseudocomplement)
//! - The free distributive lattice over an arbitrary atom type
//! - Orders modulo extra `≤` axioms ([`Congruence`])

mod congruence;
mod free_distributive;

pub use congruence::{Congruence, FreeDistributiveLatticeCongruence, StructuralOrder};
pub use free_distributive::{FreeDistributiveLattice, LessThanOrEqualTo};

/// A set with a least upper bound operation
pub trait JoinSemiLattice: Sized {
    /// Least upper bound of `self` and `that`
    fn join(&self, that: &Self) -> Self;
}

/// A set with a greatest lower bound operation
pub trait MeetSemiLattice: Sized {
    /// Greatest lower bound of `self` and `that`
    fn meet(&self, that: &Self) -> Self;
}

/// A set that is both a join and a meet semilattice
pub trait Lattice: JoinSemiLattice + MeetSemiLattice {}

impl<T: JoinSemiLattice + MeetSemiLattice> Lattice for T {}

/// A lattice with relative pseudocomplement.
///
/// `a.imply(b)` is the greatest `x` such that `a.meet(x) ≤ b`, i.e.
/// `a ∧ x ≤ b ⟺ x ≤ a → b`.
pub trait HeytingAlgebra: Lattice {
    /// Relative pseudocomplement `self → that`
    fn imply(&self, that: &Self) -> Self;
}

/// Greatest and least elements of a bounded lattice.
///
/// Bounds are values, not statics: every constructor that needs them takes
/// them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bounds<C> {
    /// Greatest element; identity for meet
    pub top: C,
    /// Least element; identity for join
    pub bottom: C,
}

impl<C> Bounds<C> {
    pub fn new(top: C, bottom: C) -> Self {
        Self { top, bottom }
    }

    /// Apply `f` to both bounds
    pub fn map<D>(&self, f: impl Fn(&C) -> D) -> Bounds<D> {
        Bounds {
            top: f(&self.top),
            bottom: f(&self.bottom),
        }
    }
}
