//! Confidentiality/integrity product lattice
//!
//! Component values are interpreted as principals: lower means more trusted.
//! Information flows from less restrictive labels to more restrictive ones,
//! which runs opposite to trust on the confidentiality side and along it on
//! the integrity side.

use crate::algebra::{Bounds, Congruence, JoinSemiLattice, Lattice, MeetSemiLattice};
use std::fmt;

/// Conjunction and disjunction of principals
pub trait TrustLattice: Sized {
    /// The principal trusted iff both are
    fn and(&self, that: &Self) -> Self;
    /// The principal trusted iff either is
    fn or(&self, that: &Self) -> Self;
}

/// A security label: a pair of principals bounding who may read (confidentiality)
/// and who may have influenced (integrity) a value.
///
/// [`join`](JoinSemiLattice::join) and [`meet`](MeetSemiLattice::meet) talk
/// about information flow; [`and`](TrustLattice::and) and
/// [`or`](TrustLattice::or) talk about trust.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityLattice<C> {
    confidentiality: C,
    integrity: C,
}

impl<C> SecurityLattice<C> {
    pub fn new(confidentiality: C, integrity: C) -> Self {
        Self {
            confidentiality,
            integrity,
        }
    }

    pub fn confidentiality_component(&self) -> &C {
        &self.confidentiality
    }

    pub fn integrity_component(&self) -> &C {
        &self.integrity
    }

    pub fn into_components(self) -> (C, C) {
        (self.confidentiality, self.integrity)
    }

    /// Exchange the components; used for robust declassification and
    /// transparent endorsement checks
    pub fn swap(self) -> Self {
        Self::new(self.integrity, self.confidentiality)
    }
}

impl<C: Clone> SecurityLattice<C> {
    /// The label with both components equal to `principal`
    pub fn uniform(principal: C) -> Self {
        Self::new(principal.clone(), principal)
    }

    /// Keep confidentiality and drop integrity to the weakest principal
    pub fn confidentiality(&self, bounds: &Bounds<C>) -> Self {
        Self::new(self.confidentiality.clone(), weakest(bounds))
    }

    /// Keep integrity and drop confidentiality to the weakest principal
    pub fn integrity(&self, bounds: &Bounds<C>) -> Self {
        Self::new(weakest(bounds), self.integrity.clone())
    }
}

impl<C> SecurityLattice<C> {
    /// Whether information may flow from `self` to `that` under `order`
    pub fn flows_to(&self, that: &Self, order: &impl Congruence<C>) -> bool {
        order.less_than_or_equal_to(&that.confidentiality, &self.confidentiality)
            && order.less_than_or_equal_to(&self.integrity, &that.integrity)
    }

    /// Whether `self` is at least as trusted as `that` under `order`
    pub fn acts_for(&self, that: &Self, order: &impl Congruence<C>) -> bool {
        order.less_than_or_equal_to(&self.confidentiality, &that.confidentiality)
            && order.less_than_or_equal_to(&self.integrity, &that.integrity)
    }
}

impl<C: Lattice> JoinSemiLattice for SecurityLattice<C> {
    fn join(&self, that: &Self) -> Self {
        Self::new(
            self.confidentiality.meet(&that.confidentiality),
            self.integrity.join(&that.integrity),
        )
    }
}

impl<C: Lattice> MeetSemiLattice for SecurityLattice<C> {
    fn meet(&self, that: &Self) -> Self {
        Self::new(
            self.confidentiality.join(&that.confidentiality),
            self.integrity.meet(&that.integrity),
        )
    }
}

impl<C: Lattice> TrustLattice for SecurityLattice<C> {
    fn and(&self, that: &Self) -> Self {
        Self::new(
            self.confidentiality.meet(&that.confidentiality),
            self.integrity.meet(&that.integrity),
        )
    }

    fn or(&self, that: &Self) -> Self {
        Self::new(
            self.confidentiality.join(&that.confidentiality),
            self.integrity.join(&that.integrity),
        )
    }
}

impl<C: fmt::Display + PartialEq> fmt::Display for SecurityLattice<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.confidentiality == self.integrity {
            write!(f, "{{{}}}", self.confidentiality)
        } else {
            write!(f, "{{{}-> ∧ {}<-}}", self.confidentiality, self.integrity)
        }
    }
}

/// The most trusted principal
fn strongest<C: Clone>(bounds: &Bounds<C>) -> C {
    bounds.bottom.clone()
}

/// The least trusted principal
fn weakest<C: Clone>(bounds: &Bounds<C>) -> C {
    bounds.top.clone()
}

/// Distinguished labels derived from bounds on principals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityBounds<C> {
    /// Trusted for everything
    pub strongest: SecurityLattice<C>,
    /// Trusted for nothing
    pub weakest: SecurityLattice<C>,
    /// Public and trusted; flows anywhere
    pub bottom: SecurityLattice<C>,
    /// Secret and untrusted; everything flows here
    pub top: SecurityLattice<C>,
}

impl<C: Clone> SecurityBounds<C> {
    pub fn new(bounds: &Bounds<C>) -> Self {
        Self {
            strongest: SecurityLattice::new(strongest(bounds), strongest(bounds)),
            weakest: SecurityLattice::new(weakest(bounds), weakest(bounds)),
            bottom: SecurityLattice::new(weakest(bounds), strongest(bounds)),
            top: SecurityLattice::new(strongest(bounds), weakest(bounds)),
        }
    }

    /// Bounds of the information flow order
    pub fn flow_bounds(&self) -> Bounds<SecurityLattice<C>> {
        Bounds::new(self.top.clone(), self.bottom.clone())
    }
}
