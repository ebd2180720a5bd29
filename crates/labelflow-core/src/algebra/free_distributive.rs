//! The free distributive lattice over an arbitrary set of atoms
//!
//! Elements are kept in "join of meets" normal form: a set of meets, each meet
//! a set of atoms. No meet is ever a strict superset of another, which makes
//! structural equality coincide with lattice equality.

use super::congruence::entails;
use super::{Bounds, HeytingAlgebra, JoinSemiLattice, MeetSemiLattice};
use std::collections::BTreeSet;
use std::fmt;

type Meet<A> = BTreeSet<A>;

/// An element of the free distributive lattice generated by atoms of type `A`.
///
/// In addition to the lattice identities, the following hold:
///
/// `a ∧ (b ∨ c) = (a ∧ b) ∨ (a ∧ c)`
///
/// `a ∨ (b ∧ c) = (a ∨ b) ∧ (a ∨ c)`
///
/// `top` is the join of the single empty meet; `bottom` is the empty join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FreeDistributiveLattice<A> {
    join_of_meets: BTreeSet<Meet<A>>,
}

/// An extra axiom `lhs ≤ rhs`, e.g. a trust delegation declared in source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessThanOrEqualTo<A> {
    pub lhs: FreeDistributiveLattice<A>,
    pub rhs: FreeDistributiveLattice<A>,
}

impl<A> LessThanOrEqualTo<A> {
    pub fn new(lhs: FreeDistributiveLattice<A>, rhs: FreeDistributiveLattice<A>) -> Self {
        Self { lhs, rhs }
    }
}

impl<A: Ord + Clone> FreeDistributiveLattice<A> {
    /// The element generated by a single atom
    pub fn new(atom: A) -> Self {
        let mut meet = BTreeSet::new();
        meet.insert(atom);
        let mut join_of_meets = BTreeSet::new();
        join_of_meets.insert(meet);
        Self { join_of_meets }
    }

    /// Build the join of the given meets, dropping redundant ones
    pub fn from_meets<M, I>(meets: M) -> Self
    where
        M: IntoIterator<Item = I>,
        I: IntoIterator<Item = A>,
    {
        let join_of_meets = meets
            .into_iter()
            .map(|meet| meet.into_iter().collect())
            .collect();
        Self::canonical(join_of_meets)
    }

    pub fn top() -> Self {
        let mut join_of_meets = BTreeSet::new();
        join_of_meets.insert(BTreeSet::new());
        Self { join_of_meets }
    }

    pub fn bottom() -> Self {
        Self {
            join_of_meets: BTreeSet::new(),
        }
    }

    pub fn bounds() -> Bounds<Self> {
        Bounds::new(Self::top(), Self::bottom())
    }

    pub fn is_top(&self) -> bool {
        self.join_of_meets.contains(&BTreeSet::new())
    }

    pub fn is_bottom(&self) -> bool {
        self.join_of_meets.is_empty()
    }

    /// The meets whose join this element is
    pub fn meets(&self) -> impl Iterator<Item = &BTreeSet<A>> {
        self.join_of_meets.iter()
    }

    /// Every atom mentioned by this element
    pub fn atoms(&self) -> BTreeSet<&A> {
        self.join_of_meets.iter().flatten().collect()
    }

    /// Whether this element evaluates to true when exactly `atoms` are true
    pub(crate) fn holds_under(&self, atoms: &BTreeSet<A>) -> bool {
        self.join_of_meets.iter().any(|meet| meet.is_subset(atoms))
    }

    /// `self ≤ that` in the free lattice, without extra axioms.
    ///
    /// Holds iff every meet of `self` contains some meet of `that`.
    pub fn is_structurally_below(&self, that: &Self) -> bool {
        self.join_of_meets
            .iter()
            .all(|meet| that.join_of_meets.iter().any(|other| other.is_subset(meet)))
    }

    /// Decide `self ≤ that` assuming every axiom in `assumptions` holds
    pub fn less_than_or_equal_to(&self, that: &Self, assumptions: &[LessThanOrEqualTo<A>]) -> bool {
        entails(assumptions, self, that)
    }

    fn canonical(join_of_meets: BTreeSet<Meet<A>>) -> Self {
        // A meet is redundant if some other meet is a strict subset of it
        let irredundant = join_of_meets
            .iter()
            .filter(|meet| {
                !join_of_meets
                    .iter()
                    .any(|other| other != *meet && other.is_subset(meet))
            })
            .cloned()
            .collect();
        Self {
            join_of_meets: irredundant,
        }
    }
}

impl<A: Ord + Clone> JoinSemiLattice for FreeDistributiveLattice<A> {
    fn join(&self, that: &Self) -> Self {
        let union = self
            .join_of_meets
            .union(&that.join_of_meets)
            .cloned()
            .collect();
        Self::canonical(union)
    }
}

impl<A: Ord + Clone> MeetSemiLattice for FreeDistributiveLattice<A> {
    fn meet(&self, that: &Self) -> Self {
        let mut candidates = BTreeSet::new();
        for meet1 in &self.join_of_meets {
            for meet2 in &that.join_of_meets {
                candidates.insert(meet1.union(meet2).cloned().collect());
            }
        }
        Self::canonical(candidates)
    }
}

impl<A: Ord + Clone> HeytingAlgebra for FreeDistributiveLattice<A> {
    /// Relative pseudocomplement: the greatest `x` with `self ∧ x ≤ that`.
    ///
    /// Writing `self = A1 ∨ ... ∨ Am` and `that = B1 ∨ ... ∨ Bn`, the
    /// constraint `(A1 ∧ x) ∨ ... ∨ (Am ∧ x) ≤ B1 ∨ ... ∨ Bn` holds iff every
    /// `Ai ∧ x` is covered by some `Bj`. Each `Ai` bounds `x` from above by
    /// `(B1 \ Ai) ∨ ... ∨ (Bn \ Ai)`, and all `m` bounds must hold at once, so
    /// the answer is their meet.
    fn imply(&self, that: &Self) -> Self {
        let mut result = Self::top();
        for this_meet in &self.join_of_meets {
            let bound = that
                .join_of_meets
                .iter()
                .map(|that_meet| that_meet.difference(this_meet).cloned().collect())
                .collect();
            result = result.meet(&Self::canonical(bound));
        }
        result
    }
}

impl<A: Ord + Clone + fmt::Display> fmt::Display for FreeDistributiveLattice<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            return write!(f, "⊤");
        }
        if self.is_bottom() {
            return write!(f, "⊥");
        }

        let mut meets: Vec<String> = self
            .join_of_meets
            .iter()
            .map(|meet| {
                let mut atoms: Vec<String> = meet.iter().map(|atom| atom.to_string()).collect();
                atoms.sort();
                let body = atoms.join(" ∧ ");
                if meet.len() > 1 {
                    format!("({body})")
                } else {
                    body
                }
            })
            .collect();
        meets.sort();

        let body = meets.join(" ∨ ");
        if meets.len() > 1 {
            write!(f, "({body})")
        } else {
            write!(f, "{body}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Element = FreeDistributiveLattice<&'static str>;

    fn atom(name: &'static str) -> Element {
        FreeDistributiveLattice::new(name)
    }

    #[test]
    fn test_imply_boundaries() {
        let a = atom("a");
        let top = Element::top();
        let bottom = Element::bottom();

        // For all y, the greatest x with bottom ∧ x ≤ y is top
        assert_eq!(bottom.imply(&a), top);
        // For all y, the greatest x with y ∧ x ≤ y is top
        assert_eq!(a.imply(&a), top);
        assert_eq!(a.imply(&top), top);
        assert_eq!(a.imply(&bottom), bottom);
    }

    #[test]
    fn test_imply_mixed() {
        let a = atom("a");
        let b = atom("b");
        let c = atom("c");

        assert_eq!(a.imply(&b), b);
        assert_eq!(a.imply(&b.meet(&a)), b);
        assert_eq!(b.join(&a).imply(&a.join(&b)), Element::top());
        assert_eq!(a.join(&b).imply(&a), a);
        assert_eq!(a.meet(&b).imply(&a), Element::top());
        assert_eq!(a.imply(&a.join(&b)), Element::top());
        assert_eq!(a.imply(&b).meet(&a.imply(&c)), a.imply(&b.meet(&c)));
        assert_eq!(a.meet(&a.imply(&b)), a.meet(&b));
        assert_eq!(b.meet(&a.imply(&b)), b);
    }

    #[test]
    fn test_distributivity() {
        let a = atom("a");
        let b = atom("b");
        let c = atom("c");

        assert_eq!(a.meet(&b.join(&c)), a.meet(&b).join(&a.meet(&c)));
        assert_eq!(a.join(&b.meet(&c)), a.join(&b).meet(&a.join(&c)));
    }

    #[test]
    fn test_absorption_and_idempotence() {
        let a = atom("a");
        let b = atom("b");

        assert_eq!(a.join(&a.meet(&b)), a);
        assert_eq!(a.meet(&a.join(&b)), a);
        assert_eq!(a.join(&a), a);
        assert_eq!(a.meet(&a), a);
    }

    #[test]
    fn test_bounds_are_identities() {
        let a = atom("a");
        let bounds = Element::bounds();

        assert_eq!(a.join(&bounds.bottom), a);
        assert_eq!(a.meet(&bounds.top), a);
        assert_eq!(a.join(&bounds.top), bounds.top);
        assert_eq!(a.meet(&bounds.bottom), bounds.bottom);
    }

    #[test]
    fn test_redundant_meets_removed() {
        let from_meets = Element::from_meets(vec![vec!["a"], vec!["a", "b"], vec!["c", "b"]]);
        assert_eq!(from_meets, atom("a").join(&atom("b").meet(&atom("c"))));
        assert_eq!(from_meets.meets().count(), 2);
    }

    #[test]
    fn test_structural_order() {
        let a = atom("a");
        let b = atom("b");

        assert!(a.meet(&b).is_structurally_below(&a));
        assert!(a.is_structurally_below(&a.join(&b)));
        assert!(Element::bottom().is_structurally_below(&a));
        assert!(a.is_structurally_below(&Element::top()));
        assert!(!a.is_structurally_below(&b));
    }

    #[test]
    fn test_display() {
        let a = atom("a");
        let b = atom("b");
        let c = atom("c");

        insta::assert_snapshot!(Element::top().to_string(), @"⊤");
        insta::assert_snapshot!(Element::bottom().to_string(), @"⊥");
        insta::assert_snapshot!(c.join(&a.meet(&b)).to_string(), @"((a ∧ b) ∨ c)");
    }
}
