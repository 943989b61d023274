//! Term evaluation: reduction of built-in operators and expansion of
//! data-structure lookups.

mod builtin;
mod pattern;

pub use builtin::BuiltinEvaluator;
pub use pattern::{expand_patterns, Expansion};

use crate::syntax::Term;

/// The term evaluator capability.
///
/// Implementations must be deterministic and must not depend on any state
/// other than the term itself.
pub trait TermEvaluator: Send + Sync {
    /// Reduce `term` to normal form.
    fn evaluate(&self, term: &Term) -> Term;
}
