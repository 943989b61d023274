//! Simplification: decomposing equalities with the structural unifier until
//! nothing changes.

use std::mem;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::trace;

use super::{Constraint, Disjunction, Equality, TruthValue};
use crate::eval::expand_patterns;
use crate::syntax::{Term, Var};
use crate::unify::{Substitution, Unification};

impl Constraint {
    /// Simplify as much as possible and return the resulting truth value.
    pub fn simplify(&mut self) -> TruthValue {
        self.simplify_with(false)
    }

    /// Like [`simplify`](Constraint::simplify), but ambiguous map equations
    /// are split into a disjunction of their possible matchings.
    pub fn simplify_modulo_pattern_folding(&mut self) -> TruthValue {
        self.simplify_with(true)
    }

    fn simplify_with(&mut self, pattern_fold: bool) -> TruthValue {
        self.normalize();
        if self.truth_value != TruthValue::Unknown {
            return self.truth_value;
        }
        let context = Arc::clone(&self.context);
        let mut previous: Option<(Substitution, IndexSet<Equality>)> = None;

        loop {
            self.normalize();
            if self.truth_value != TruthValue::Unknown {
                return self.truth_value;
            }
            if let Some((substitution, equalities)) = &previous {
                if *substitution == self.substitution && *equalities == self.equalities {
                    break;
                }
            }
            previous = Some((self.substitution.clone(), self.equalities.clone()));

            self.write_protected = true;
            let mut iter = mem::take(&mut self.equalities).into_iter();
            let mut kept = IndexSet::new();
            let mut failure = None;

            while let Some(equality) = iter.next() {
                let unification = context.unifier().unify(
                    equality.left(),
                    equality.right(),
                    context.sorts(),
                    pattern_fold,
                );
                match unification {
                    Err(error) => {
                        trace!(%equality, %error, "unification failed");
                        let (left, right) = error.failing_pair();
                        failure = Some(Equality::new(left, right, &context));
                        kept.insert(equality);
                        break;
                    }
                    Ok(Unification::Unique(pairs))
                        if pairs.len() == 1
                            && pairs[0].0 == *equality.left()
                            && pairs[0].1 == *equality.right() =>
                    {
                        kept.insert(equality);
                    }
                    Ok(Unification::Unique(pairs)) => {
                        self.is_normal = false;
                        for (left, right) in pairs {
                            self.insert(left, right);
                        }
                    }
                    Ok(Unification::Disjunction {
                        common,
                        alternatives,
                    }) => {
                        self.is_normal = false;
                        let mut alternatives = self.solve_alternatives(alternatives, pattern_fold);
                        if alternatives.is_empty() {
                            failure = Some(equality.clone());
                            kept.insert(equality);
                            break;
                        }
                        for (left, right) in common {
                            self.insert(left, right);
                        }
                        match alternatives.pop() {
                            Some(only) if alternatives.is_empty() => self.insert_constraint(&only),
                            Some(last) => {
                                alternatives.push(last);
                                trace!(%equality, count = alternatives.len(), "disjunction");
                                self.multi_constraints.push(Disjunction::new(alternatives));
                            }
                            None => {}
                        }
                    }
                }
            }

            kept.extend(iter);
            self.equalities = kept;
            self.write_protected = false;
            if let Some(equality) = failure {
                self.falsify(equality);
                return TruthValue::False;
            }
        }

        self.truth_value
    }

    /// Build and simplify one constraint per alternative, dropping the false
    /// ones.
    fn solve_alternatives(
        &self,
        alternatives: Vec<Vec<(Term, Term)>>,
        pattern_fold: bool,
    ) -> Vec<Constraint> {
        alternatives
            .into_iter()
            .filter_map(|pairs| {
                let mut alternative = Constraint::new(Arc::clone(&self.context));
                for (left, right) in pairs {
                    alternative.insert(left, right);
                }
                alternative.simplify_with(pattern_fold);
                (!alternative.is_false()).then_some(alternative)
            })
            .collect()
    }

    /// Expand data-structure lookups in every binding and equality, then
    /// simplify; repeat until no lookup expands any more.
    ///
    /// When `narrowing`, lookups are only resolved by literally matching
    /// keys and simplification does not fold patterns.
    pub fn expand_patterns_and_simplify(&mut self, narrowing: bool) -> TruthValue {
        self.normalize();
        loop {
            if self.is_false() {
                return TruthValue::False;
            }
            let mut changed = false;
            let mut conditions = Vec::new();

            let keys: Vec<Var> = self.substitution.bindings().map(|(var, _)| var.clone()).collect();
            for var in keys {
                let Some(value) = self.substitution.lookup(&var) else {
                    continue;
                };
                if let Some(expansion) = expand_patterns(value, self, narrowing) {
                    let value = self.context.evaluator().evaluate(&expansion.term);
                    self.check_before_binding(var, value);
                    conditions.extend(expansion.conditions);
                    changed = true;
                }
            }

            let mut expanded = IndexSet::new();
            for equality in &self.equalities {
                let left = expand_patterns(equality.left(), self, narrowing);
                let right = expand_patterns(equality.right(), self, narrowing);
                if left.is_none() && right.is_none() {
                    expanded.insert(equality.clone());
                    continue;
                }
                changed = true;
                let left = match left {
                    Some(expansion) => {
                        conditions.extend(expansion.conditions);
                        expansion.term
                    }
                    None => equality.left().clone(),
                };
                let right = match right {
                    Some(expansion) => {
                        conditions.extend(expansion.conditions);
                        expansion.term
                    }
                    None => equality.right().clone(),
                };
                expanded.insert(Equality::new(left, right, &self.context));
            }
            self.equalities = expanded;
            for (left, right) in conditions {
                self.insert(left, right);
            }

            self.is_normal = false;
            self.update_truth_value();
            if narrowing {
                self.simplify();
            } else {
                self.simplify_modulo_pattern_folding();
            }
            if !changed {
                return self.truth_value;
            }
        }
    }
}
