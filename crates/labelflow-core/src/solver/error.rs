//! Errors raised while turning terms into constraint graph primitives

use thiserror::Error;

/// A term that cannot be reduced to the supported fragment.
///
/// The left-hand side of a flows-to constraint must be a join of meets, and
/// the right-hand side a meet of joins, where each meet (resp. join) holds at
/// most one constant and at most one variable. This error means the pass that
/// generated the constraint emitted a malformed one; it says nothing about the
/// security of the program under analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalTermError {
    #[error("cannot meet distinct variables `{first}` and `{second}` on the left of `{term}`")]
    MeetOfDistinctVariables {
        term: String,
        first: String,
        second: String,
    },

    #[error("cannot join distinct variables `{first}` and `{second}` on the right of `{term}`")]
    JoinOfDistinctVariables {
        term: String,
        first: String,
        second: String,
    },
}
