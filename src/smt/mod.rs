//! Decision procedures for the obligations that simplification cannot
//! settle.

mod smtlib;
mod z3;

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;

use crate::constraint::Constraint;
use crate::syntax::Var;

pub use smtlib::{translate_constraint, translate_implication};
pub use z3::Z3Solver;

/// Result type alias for SMT operations
pub type SmtResult<T> = std::result::Result<T, SmtError>;

/// Errors that can occur while querying a solver.
#[derive(Debug, Error)]
pub enum SmtError {
    /// A term has no SMT-LIB counterpart
    #[error("cannot translate to SMT-LIB: {0}")]
    Untranslatable(String),

    /// The solver process could not be run
    #[error("failed to run solver: {0}")]
    Io(#[from] std::io::Error),

    /// The solver process outlived its deadline and was killed
    #[error("solver timed out after {0:?}")]
    Timeout(Duration),

    /// The solver answered something other than sat/unsat/unknown
    #[error("solver error: {0}")]
    Solver(String),
}

/// An external decision procedure.
///
/// Both queries answer `true` only when the solver proves the property within
/// the timeout. Solver failures, timeouts and untranslatable inputs answer
/// `false`.
pub trait SmtSolver: Send + Sync {
    /// Whether `constraint` is unsatisfiable.
    fn check_unsat(&self, constraint: &Constraint, timeout: Duration) -> bool;

    /// Whether `left` implies `right` with `right_only` existentially
    /// quantified on the right.
    fn check_implication(
        &self,
        left: &Constraint,
        right: &Constraint,
        right_only: &HashSet<Var>,
        timeout: Duration,
    ) -> bool;
}

/// The absent solver: proves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSolver;

impl SmtSolver for NoSolver {
    fn check_unsat(&self, _constraint: &Constraint, _timeout: Duration) -> bool {
        false
    }

    fn check_implication(
        &self,
        _left: &Constraint,
        _right: &Constraint,
        _right_only: &HashSet<Var>,
        _timeout: Duration,
    ) -> bool {
        false
    }
}
