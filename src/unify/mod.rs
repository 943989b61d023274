//! Unification: substitutions and structural decomposition of equations.

mod substitution;
mod unify;

pub use substitution::Substitution;
pub use unify::{unify, SyntacticUnifier, Unification, Unifier, UnifyError, MAX_ALTERNATIVES};
