//! Semantic tests for the constraint engine.
//!
//! These tests check the properties the rest of a symbolic-execution driver
//! relies on: the normal-form invariants of constraints, the soundness of
//! substitution composition and orientation, and the outcomes of the
//! implication and matching checks.
//!
//! # References
//!
//! - Baader, F., Snyder, W. "Unification Theory." Handbook of Automated
//!   Reasoning, Vol. I, ch. 8 (2001). Solved forms and idempotent
//!   substitutions.
//! - Rosu, G., Serbanuta, T.F. "An Overview of the K Semantic Framework."
//!   J. Logic and Algebraic Programming 79(6), 397-434 (2010).
//! - Arusoaie, A., Lucanu, D., Rusu, V. "Symbolic Execution Based on Language
//!   Transformation." Computer Languages, Systems & Structures 44, 48-71
//!   (2015). Implication between symbolic path conditions.
//!
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::constraint::{Constraint, TruthValue};
use crate::context::Context;
use crate::syntax::{Sort, Term, Var};
use crate::unify::{unify, Substitution, Unification};

fn int(name: &str) -> Var {
    Var::new_with_sort(name, Sort::int())
}

fn int_term(name: &str) -> Term {
    Term::Var(int(name))
}

fn empty() -> Constraint {
    Constraint::new(Context::with_defaults())
}

fn vars(list: &[Var]) -> HashSet<Var> {
    list.iter().cloned().collect()
}

mod implication_semantics;
mod matching_semantics;
mod multi_constraint_semantics;
mod substitution_semantics;
mod unification_semantics;
