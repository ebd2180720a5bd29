//! Partial orders used to validate solutions
//!
//! The solver computes values in the free lattice, but whether a computed
//! value is acceptable may depend on extra `≤` axioms (trust delegations).
//! A [`Congruence`] decides `≤` modulo such axioms.
//!
//! # Decision procedure
//!
//! For the free distributive lattice, `x ≤ y` holds modulo axioms
//! `s1 ≤ t1, ..., sk ≤ tk` iff no assignment of true/false to atoms satisfies
//! every axiom while making `x` true and `y` false. Every element is monotone
//! in its atoms, so it suffices to search minimal such assignments:
//!
//! 1. Start from the atoms of one meet of `x` (which makes `x` true).
//! 2. If `y` is true, this branch cannot refute `x ≤ y`.
//! 3. If some axiom has a true left side and a false right side, branch over
//!    the meets of its right side, adding their atoms.
//! 4. Otherwise the assignment is a counter-model.
//!
//! Each branch strictly grows the set of true atoms, so the search terminates.
//! The procedure is sound and complete.

use super::free_distributive::{FreeDistributiveLattice, LessThanOrEqualTo};
use super::MeetSemiLattice;
use std::collections::BTreeSet;

/// A partial order on `C`, possibly coarser than the structural one
pub trait Congruence<C> {
    /// Decide `lhs ≤ rhs`
    fn less_than_or_equal_to(&self, lhs: &C, rhs: &C) -> bool;
}

/// The order induced by meet: `a ≤ b ⟺ a ∧ b = a`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralOrder;

impl<C: MeetSemiLattice + PartialEq> Congruence<C> for StructuralOrder {
    fn less_than_or_equal_to(&self, lhs: &C, rhs: &C) -> bool {
        lhs.meet(rhs) == *lhs
    }
}

/// The free distributive lattice quotiented by a list of `≤` axioms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeDistributiveLatticeCongruence<A> {
    assumptions: Vec<LessThanOrEqualTo<A>>,
}

impl<A> FreeDistributiveLatticeCongruence<A> {
    pub fn new(assumptions: Vec<LessThanOrEqualTo<A>>) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &[LessThanOrEqualTo<A>] {
        &self.assumptions
    }
}

impl<A> Default for FreeDistributiveLatticeCongruence<A> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<A: Ord + Clone> Congruence<FreeDistributiveLattice<A>> for FreeDistributiveLatticeCongruence<A> {
    fn less_than_or_equal_to(&self, lhs: &FreeDistributiveLattice<A>, rhs: &FreeDistributiveLattice<A>) -> bool {
        entails(&self.assumptions, lhs, rhs)
    }
}

/// Decide `lhs ≤ rhs` modulo `assumptions`
pub(crate) fn entails<A: Ord + Clone>(
    assumptions: &[LessThanOrEqualTo<A>],
    lhs: &FreeDistributiveLattice<A>,
    rhs: &FreeDistributiveLattice<A>,
) -> bool {
    if lhs.is_structurally_below(rhs) {
        return true;
    }
    if assumptions.is_empty() {
        return false;
    }
    !lhs
        .meets()
        .any(|meet| has_counter_model(assumptions, meet.clone(), rhs))
}

/// Search for an assignment extending `atoms` that satisfies every axiom and
/// falsifies `rhs`.
fn has_counter_model<A: Ord + Clone>(
    assumptions: &[LessThanOrEqualTo<A>],
    atoms: BTreeSet<A>,
    rhs: &FreeDistributiveLattice<A>,
) -> bool {
    if rhs.holds_under(&atoms) {
        return false;
    }

    let violated = assumptions
        .iter()
        .find(|axiom| axiom.lhs.holds_under(&atoms) && !axiom.rhs.holds_under(&atoms));

    match violated {
        None => true,
        Some(axiom) => axiom.rhs.meets().any(|meet| {
            let mut extended = atoms.clone();
            extended.extend(meet.iter().cloned());
            has_counter_model(assumptions, extended, rhs)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::JoinSemiLattice;

    type Element = FreeDistributiveLattice<&'static str>;

    fn atom(name: &'static str) -> Element {
        FreeDistributiveLattice::new(name)
    }

    fn leq(lhs: Element, rhs: Element) -> LessThanOrEqualTo<&'static str> {
        LessThanOrEqualTo::new(lhs, rhs)
    }

    fn assert_lattice_basics(context: &[LessThanOrEqualTo<&'static str>]) {
        let (a, b) = (atom("a"), atom("b"));
        let (top, bottom) = (Element::top(), Element::bottom());

        assert!(a.less_than_or_equal_to(&a, context));
        assert!(top.less_than_or_equal_to(&top, context));
        assert!(bottom.less_than_or_equal_to(&bottom, context));
        assert!(a.less_than_or_equal_to(&top, context));
        assert!(a.join(&b).less_than_or_equal_to(&top, context));
        assert!(a.meet(&b).less_than_or_equal_to(&top, context));
        assert!(bottom.less_than_or_equal_to(&a, context));
        assert!(bottom.less_than_or_equal_to(&a.join(&b), context));
        assert!(bottom.less_than_or_equal_to(&a.meet(&b), context));
        assert!(a.less_than_or_equal_to(&a.join(&b), context));
        assert!(a.meet(&b).less_than_or_equal_to(&a, context));
    }

    #[test]
    fn test_no_assumptions() {
        assert_lattice_basics(&[]);
        assert!(!atom("a").less_than_or_equal_to(&atom("b"), &[]));
        assert!(!Element::top().less_than_or_equal_to(&atom("a"), &[]));
    }

    #[test]
    fn test_trivial_assumption() {
        let context = [leq(atom("a"), Element::top())];
        assert_lattice_basics(&context);
        assert!(!atom("a").less_than_or_equal_to(&atom("b"), &context));
    }

    #[test]
    fn test_single_delegation() {
        let (a, b, c) = (atom("a"), atom("b"), atom("c"));
        let context = [leq(a.clone(), b.clone())];

        assert_lattice_basics(&context);
        assert!(a.join(&b).less_than_or_equal_to(&b, &context));
        assert!(a.less_than_or_equal_to(&a.meet(&b), &context));
        assert!(a
            .join(&b.meet(&c))
            .less_than_or_equal_to(&b.meet(&a.join(&c)), &context));
        assert!(!b.less_than_or_equal_to(&a, &context));
    }

    #[test]
    fn test_chained_delegations() {
        let (a, b, c) = (atom("a"), atom("b"), atom("c"));
        let context = [
            leq(a.clone(), a.meet(&b.join(&c))),
            leq(c.meet(&a.join(&b)), b.meet(&c)),
        ];

        assert_lattice_basics(&context);
        assert!(a.join(&b).less_than_or_equal_to(&b, &context));
        assert!(a.less_than_or_equal_to(&a.meet(&b), &context));
        assert!(a
            .join(&b.meet(&c))
            .less_than_or_equal_to(&b.meet(&a.join(&c)), &context));
    }

    #[test]
    fn test_assumption_to_bottom() {
        let (a, b) = (atom("a"), atom("b"));
        let context = [leq(a.clone(), Element::bottom())];

        assert_lattice_basics(&context);
        assert!(a.less_than_or_equal_to(&Element::bottom(), &context));
        assert!(a.meet(&b).less_than_or_equal_to(&Element::bottom(), &context));
        assert!(!b.less_than_or_equal_to(&Element::bottom(), &context));
    }

    #[test]
    fn test_congruence_matches_method() {
        let (a, b) = (atom("a"), atom("b"));
        let congruence = FreeDistributiveLatticeCongruence::new(vec![leq(a.clone(), b.clone())]);

        assert!(congruence.less_than_or_equal_to(&a, &b));
        assert!(!congruence.less_than_or_equal_to(&b, &a));
        assert_eq!(congruence.assumptions().len(), 1);
    }

    #[test]
    fn test_structural_order() {
        let (a, b) = (atom("a"), atom("b"));

        assert!(StructuralOrder.less_than_or_equal_to(&a.meet(&b), &a));
        assert!(!StructuralOrder.less_than_or_equal_to(&a, &b));
    }
}
