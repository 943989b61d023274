//! Error types for constraint operations.

use crate::syntax::Var;
use thiserror::Error;

/// Result type alias for constraint operations
pub type Result<T> = std::result::Result<T, ConstraintError>;

/// Broken preconditions reported by constraint operations.
///
/// A constraint becoming false is not an error; it is reported through its
/// truth value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// Two variables that must both become keys are bound to the same
    /// variable, and no other variable bound to it can represent them.
    #[error("cannot orient substitution: no representative for {var} outside the target variables")]
    OrientationFailed { var: Var },
}
