//! Implication between constraints: `self => exists right_only . other`.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use super::Constraint;
use crate::error::Result;
use crate::syntax::{Term, Var};

impl Constraint {
    /// Whether this constraint implies `other`, with the variables of
    /// `right_only` existentially quantified on the right.
    ///
    /// Obligations are worked off a queue. Each right-hand side is oriented
    /// over `right_only`, reduced by what the left already says, and
    /// oriented again. A residual that only binds `right_only` variables is
    /// implied outright. Otherwise the innermost if-then-else condition of
    /// the residual is case-split by strengthening the left; once no
    /// condition is left, the SMT solver decides.
    ///
    /// Fails only when orientation over `right_only` is impossible.
    pub fn implies(&self, other: &Constraint, right_only: &HashSet<Var>) -> Result<bool> {
        let verbose = self.context.options().debug;
        let mut obligations = VecDeque::from([(self.clone(), other.clone())]);

        while let Some((left, mut right)) = obligations.pop_front() {
            if left.is_false() {
                continue;
            }
            if verbose {
                debug!(%left, %right, "checking implication");
            }

            right.orient_substitution(right_only)?;
            let mut residual = left.simplify_constraint(&right);
            residual.orient_substitution(right_only)?;

            if residual.is_false() {
                if left.check_unsat() {
                    continue;
                }
                if verbose {
                    debug!(%left, "right side is false");
                }
                return Ok(false);
            }
            if residual.is_trivially_implied(right_only) {
                continue;
            }

            if let Some(condition) = residual.innermost_condition() {
                if verbose {
                    debug!(%condition, "splitting on condition");
                }
                let mut then_case = left.clone();
                then_case.add(condition.clone(), Term::Bool(true));
                let mut else_case = left;
                else_case.add(condition, Term::Bool(false));
                obligations.push_back((then_case, residual.clone()));
                obligations.push_back((else_case, residual));
                continue;
            }

            let timeout = self.context.options().implication_timeout();
            if !self
                .context
                .smt()
                .check_implication(&left, &residual, right_only, timeout)
            {
                if verbose {
                    debug!(%left, %residual, "implication not proved");
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reduce `right` by what this constraint already establishes.
    ///
    /// Bindings of `right` that agree with ours and equalities we already
    /// contain are dropped; the rest is simplified, then rewritten with our
    /// ground facts and bindings and simplified again.
    pub(crate) fn simplify_constraint(&self, right: &Constraint) -> Constraint {
        if right.is_false() {
            return right.clone();
        }
        let mut residual = Constraint::new(Arc::clone(&self.context));
        for (var, term) in right.substitution.bindings() {
            if self.substitution.lookup(var) != Some(term) {
                residual.insert(Term::Var(var.clone()), term.clone());
            }
        }
        for equality in &right.equalities {
            if !self.equalities.contains(equality) {
                residual.insert_equality(equality.clone());
            }
        }
        residual.multi_constraints = right.multi_constraints.clone();
        residual.is_normal = false;
        residual.simplify();
        if residual.is_false() {
            return residual;
        }

        let mut facts = self.ground_facts();
        for (var, term) in self.substitution.bindings() {
            facts.insert(Term::Var(var.clone()), term.clone());
        }
        let mut residual = residual.replace_terms(&facts);
        residual.simplify();
        residual
    }

    /// Only bindings of `right_only` variables are left.
    fn is_trivially_implied(&self, right_only: &HashSet<Var>) -> bool {
        self.is_substitution()
            && self
                .substitution
                .bindings()
                .all(|(var, _)| right_only.contains(var))
    }

    /// The condition of the innermost if-then-else in the equalities or the
    /// bound values.
    fn innermost_condition(&self) -> Option<Term> {
        self.equalities
            .iter()
            .flat_map(|equality| [equality.left(), equality.right()])
            .chain(self.substitution.bindings().map(|(_, term)| term))
            .find_map(Term::find_innermost_ite)
            .and_then(Term::as_ite)
            .map(|(condition, _, _)| condition.clone())
    }
}
