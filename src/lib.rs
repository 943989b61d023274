//! symcon: symbolic constraints for rewriting-based symbolic execution
//!
//! A [`Constraint`] is a conjunction of term equalities kept in a solved
//! normal form: a substitution of bindings plus the equalities that could not
//! be solved. Constraints are simplified with a structural unifier, checked
//! for implication against each other and, when all else fails, handed to an
//! SMT solver.

pub mod syntax;
pub mod unify;
pub mod eval;
pub mod constraint;
pub mod smt;
pub mod context;
pub mod options;
pub mod error;

pub use constraint::{Constraint, Disjunction, Equality, TruthValue};
pub use context::{Context, ContextBuilder};
pub use error::{ConstraintError, Result};
pub use options::{ConstraintOptions, SmtBackend};
