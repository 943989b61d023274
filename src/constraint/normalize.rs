//! Normalization: moving solved equalities into the substitution and
//! composing substitutions while keeping them idempotent.

use std::mem;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::trace;

use super::{Constraint, Equality};
use crate::syntax::{Term, Var};
use crate::unify::Substitution;

impl Constraint {
    /// Restore the normal-form invariants. A no-op on normal or false
    /// constraints, and while the equality set is write-protected.
    pub(crate) fn normalize(&mut self) {
        if self.is_false() || self.is_normal || self.write_protected {
            return;
        }
        self.renormalize();
        self.update_truth_value();
    }

    /// Run the normalization fixpoint unconditionally.
    ///
    /// Each pass applies the substitution to every equality, drops the true
    /// ones and stops at the first false one. The first equality that can be
    /// read as a binding passing the occurs check is composed into the
    /// substitution, and the pass restarts.
    pub(super) fn renormalize(&mut self) {
        self.is_normal = true;
        self.drain_buffer();
        let context = Arc::clone(&self.context);

        loop {
            let mut iter = mem::take(&mut self.equalities).into_iter();
            let mut kept = IndexSet::new();
            let mut binding = None;

            while let Some(equality) = iter.next() {
                let equality = equality
                    .substitute_and_evaluate(&self.substitution, &context)
                    .unwrap_or(equality);
                if equality.is_true() {
                    continue;
                }
                if equality.is_false() {
                    kept.insert(equality.clone());
                    kept.extend(iter);
                    self.equalities = kept;
                    self.falsify(equality);
                    return;
                }
                match self.binding_for(&equality) {
                    Some((var, term)) if !term.occurs(&var) => {
                        binding = Some((var, term));
                        kept.extend(iter);
                        break;
                    }
                    _ => {
                        kept.insert(equality);
                    }
                }
            }

            self.equalities = kept;
            match binding {
                Some((var, term)) => {
                    trace!(%var, %term, "binding");
                    self.compose(Substitution::singleton(var, term));
                    if self.is_false() {
                        return;
                    }
                    self.drain_buffer();
                }
                None => {
                    self.drain_buffer();
                    return;
                }
            }
        }
    }

    /// The binding an equality can be turned into, if any.
    ///
    /// Between two variables, the one of more general sort is bound to the
    /// other. With equal sorts an anonymous right-hand variable is bound to
    /// the left one, otherwise left is bound to right. Variables of
    /// incomparable sorts are left as an equality.
    fn binding_for(&self, equality: &Equality) -> Option<(Var, Term)> {
        match (equality.left(), equality.right()) {
            (Term::Var(left), Term::Var(right)) => {
                let sorts = self.context.sorts();
                let left_below = sorts.is_subsorted_eq(left.sort(), right.sort());
                let right_below = sorts.is_subsorted_eq(right.sort(), left.sort());
                match (left_below, right_below) {
                    (true, true) if right.is_anonymous() => {
                        Some((right.clone(), equality.left().clone()))
                    }
                    (true, true) | (false, true) => {
                        Some((left.clone(), equality.right().clone()))
                    }
                    (true, false) => Some((right.clone(), equality.left().clone())),
                    (false, false) => None,
                }
            }
            (Term::Var(var), term) | (term, Term::Var(var)) => Some((var.clone(), term.clone())),
            _ => None,
        }
    }

    /// Compose `delta` into the substitution.
    ///
    /// Every existing value is rewritten with `delta`, re-evaluated and
    /// re-checked; bindings that became trivial are dropped, and a
    /// contradictory one falsifies the constraint.
    ///
    /// # Panics
    ///
    /// If `delta` binds a variable that is already bound.
    pub(super) fn compose(&mut self, delta: Substitution) {
        assert!(
            delta.bindings().all(|(var, _)| !self.substitution.contains(var)),
            "composed substitutions must have disjoint domains"
        );
        let context = Arc::clone(&self.context);
        let entries: Vec<(Var, Term)> = self
            .substitution
            .bindings()
            .map(|(var, term)| (var.clone(), term.clone()))
            .collect();
        for (var, term) in entries {
            if let Some(term) = delta.substitute(&term) {
                self.check_before_binding(var, context.evaluator().evaluate(&term));
                if self.is_false() {
                    return;
                }
            }
        }
        for (var, term) in delta.bindings() {
            self.substitution.bind(var.clone(), term.clone());
        }
    }

    /// Bind `var` to `term` unless `var = term` is trivially true (the
    /// binding is dropped) or false (the constraint is falsified).
    pub(super) fn check_before_binding(&mut self, var: Var, term: Term) {
        if self.is_false() {
            return;
        }
        let equality = Equality::classified(Term::Var(var.clone()), term.clone(), self.context.sorts());
        if equality.is_true() {
            self.substitution.remove(&var);
            return;
        }
        self.substitution.bind(var, term);
        if equality.is_false() {
            self.falsify(equality);
        }
    }

    fn drain_buffer(&mut self) {
        if self.equality_buffer.is_empty() {
            return;
        }
        let buffered = mem::take(&mut self.equality_buffer);
        self.equalities.extend(buffered);
    }
}
