//! Symbolic constraints: conjunctions of term equalities kept in a solved
//! normal form.

mod constraint;
mod equality;
mod implication;
mod matching;
mod multi;
mod normalize;
mod orient;
mod simplify;

pub use constraint::Constraint;
pub use equality::{Equality, TruthValue};
pub use multi::Disjunction;
