//! Conjunctions of equalities over a solved substitution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::trace;

use super::{Disjunction, Equality, TruthValue};
use crate::context::Context;
use crate::syntax::{Term, Var};
use crate::unify::Substitution;

/// A conjunction of equalities plus a substitution of solved bindings.
///
/// Whenever a constraint is normal:
/// - no key of the substitution occurs in any of its values, and
/// - no key of the substitution occurs in the remaining equalities.
///
/// Every public mutator leaves the constraint normal, so the read accessors
/// take `&self`. `Clone` produces an independent copy.
///
/// The truth value is `True` when the constraint is in solved form (it is not
/// false and consists of bindings only), `False` once a contradiction has been
/// found, and `Unknown` otherwise. `False` is final: nothing defined here
/// turns a false constraint back into a satisfiable one.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub(super) context: Arc<Context>,
    pub(super) equalities: IndexSet<Equality>,
    /// Equalities added while `equalities` is being iterated.
    pub(super) equality_buffer: IndexSet<Equality>,
    pub(super) substitution: Substitution,
    pub(super) truth_value: TruthValue,
    pub(super) falsifying_equality: Option<Equality>,
    pub(super) is_normal: bool,
    pub(super) write_protected: bool,
    pub(super) multi_constraints: Vec<Disjunction>,
}

impl Constraint {
    /// The empty (true) constraint.
    pub fn new(context: Arc<Context>) -> Self {
        Constraint {
            context,
            equalities: IndexSet::new(),
            equality_buffer: IndexSet::new(),
            substitution: Substitution::empty(),
            truth_value: TruthValue::True,
            falsifying_equality: None,
            is_normal: true,
            write_protected: false,
            multi_constraints: Vec::new(),
        }
    }

    /// Build a constraint from `pairs` and simplify it.
    pub fn simplified_from(
        context: Arc<Context>,
        pairs: impl IntoIterator<Item = (Term, Term)>,
    ) -> Self {
        let mut constraint = Constraint::new(context);
        constraint.add_all_then_simplify(pairs);
        constraint
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Add the equality `left = right`.
    pub fn add(&mut self, left: Term, right: Term) {
        self.insert(left, right);
        self.normalize();
    }

    pub fn add_equality(&mut self, equality: &Equality) {
        self.add(equality.left().clone(), equality.right().clone());
    }

    /// Add each term as a condition that must evaluate to `true`.
    pub fn add_conditions(&mut self, conditions: impl IntoIterator<Item = Term>) {
        for condition in conditions {
            self.insert(condition, Term::Bool(true));
        }
        self.normalize();
    }

    /// Add every binding of `substitution` as an equality.
    pub fn add_substitution(&mut self, substitution: &Substitution) {
        for (var, term) in substitution.bindings() {
            self.insert(Term::Var(var.clone()), term.clone());
        }
        self.normalize();
    }

    /// Conjoin `other` to this constraint.
    pub fn add_constraint(&mut self, other: &Constraint) {
        self.insert_constraint(other);
        self.normalize();
    }

    /// Add all `pairs` as equalities, then simplify.
    pub fn add_all_then_simplify(
        &mut self,
        pairs: impl IntoIterator<Item = (Term, Term)>,
    ) -> TruthValue {
        for (left, right) in pairs {
            self.insert(left, right);
        }
        self.simplify()
    }

    /// The unsolved equalities, in insertion order.
    pub fn equalities(&self) -> &IndexSet<Equality> {
        &self.equalities
    }

    /// The solved bindings.
    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    pub fn truth_value(&self) -> TruthValue {
        self.truth_value
    }

    pub fn is_true(&self) -> bool {
        self.truth_value == TruthValue::True
    }

    pub fn is_false(&self) -> bool {
        self.truth_value == TruthValue::False
    }

    /// No equalities or disjunctions are left; only bindings.
    pub fn is_substitution(&self) -> bool {
        !self.is_false() && self.equalities.is_empty() && self.multi_constraints.is_empty()
    }

    pub fn is_normal(&self) -> bool {
        self.is_normal
    }

    /// The equality found contradictory, once the constraint is false.
    pub fn falsifying_equality(&self) -> Option<&Equality> {
        self.falsifying_equality.as_ref()
    }

    /// Ask the SMT solver whether this constraint is unsatisfiable.
    ///
    /// Pure substitutions are always satisfiable; a false constraint always
    /// unsatisfiable. Solver failures answer `false`.
    pub fn check_unsat(&self) -> bool {
        if self.is_false() {
            return true;
        }
        if self.is_substitution() {
            return false;
        }
        let timeout = self.context.options().constraint_timeout();
        self.context.smt().check_unsat(self, timeout)
    }

    /// Drop the bindings of `variables` that are no longer needed.
    ///
    /// A binding is only dropped when its value's sort is below the
    /// variable's sort.
    pub fn remove_bindings<'a>(&mut self, variables: impl IntoIterator<Item = &'a Var>) {
        for var in variables {
            let removable = match self.substitution.lookup(var) {
                Some(term) => self.context.sorts().is_subsorted_eq(&term.sort(), var.sort()),
                None => false,
            };
            if removable {
                self.substitution.remove(var);
            }
        }
        self.update_truth_value();
    }

    /// Rename variables throughout: substitution keys and values, and both
    /// sides of every equality. `renaming` should map to fresh variables.
    pub fn rename(&mut self, renaming: &HashMap<Var, Var>) {
        let renamer: Substitution = renaming
            .iter()
            .map(|(from, to)| (from.clone(), Term::Var(to.clone())))
            .collect();
        self.substitution = self
            .substitution
            .bindings()
            .map(|(var, term)| {
                let key = renaming.get(var).cloned().unwrap_or_else(|| var.clone());
                (key, renamer.apply_to_term(term))
            })
            .collect();
        let context = Arc::clone(&self.context);
        self.equalities = self
            .equalities
            .iter()
            .map(|equality| equality.map_sides(&context, |term| renamer.apply_to_term(term)))
            .collect();
    }

    /// Whether some equality equates two maps.
    pub fn has_map_equalities(&self) -> bool {
        self.equalities.iter().any(Equality::is_map_equality)
    }

    /// Equalities whose other side is ground, as a replacement map from the
    /// non-ground side to the ground one.
    pub(crate) fn ground_facts(&self) -> HashMap<Term, Term> {
        let mut facts = HashMap::new();
        for equality in &self.equalities {
            if equality.right().is_ground() {
                facts.insert(equality.left().clone(), equality.right().clone());
            }
            if equality.left().is_ground() {
                facts.insert(equality.right().clone(), equality.left().clone());
            }
        }
        facts
    }

    /// Insert `left = right` without normalizing. A conjunction equated to
    /// `true` is split into its conjuncts.
    pub(super) fn insert(&mut self, left: Term, right: Term) {
        if self.is_false() {
            return;
        }
        if right.is_true() {
            if let Some((a, b)) = left.as_and() {
                let (a, b) = (a.clone(), b.clone());
                self.insert(a, Term::Bool(true));
                self.insert(b, Term::Bool(true));
                return;
            }
        }
        if left.is_true() {
            if let Some((a, b)) = right.as_and() {
                let (a, b) = (a.clone(), b.clone());
                self.insert(a, Term::Bool(true));
                self.insert(b, Term::Bool(true));
                return;
            }
        }
        let equality = Equality::new(left, right, &self.context);
        self.insert_equality(equality);
    }

    /// Insert an equality into the live set, or into the buffer while the
    /// live set is write-protected.
    pub(super) fn insert_equality(&mut self, equality: Equality) {
        if self.is_false() {
            return;
        }
        let inserted = if self.write_protected {
            !self.equalities.contains(&equality) && self.equality_buffer.insert(equality)
        } else {
            self.equalities.insert(equality)
        };
        if inserted {
            self.is_normal = false;
            self.truth_value = TruthValue::Unknown;
        }
    }

    pub(super) fn insert_constraint(&mut self, other: &Constraint) {
        if self.is_false() {
            return;
        }
        if let Some(equality) = other.falsifying_equality() {
            self.falsify(equality.clone());
            return;
        }
        for (var, term) in other.substitution.bindings() {
            self.insert(Term::Var(var.clone()), term.clone());
        }
        for equality in &other.equalities {
            self.insert_equality(equality.clone());
        }
        if !other.multi_constraints.is_empty() {
            self.multi_constraints
                .extend(other.multi_constraints.iter().cloned());
            self.is_normal = false;
            self.truth_value = TruthValue::Unknown;
        }
    }

    /// Rebuild this constraint with `replacements` applied to every term,
    /// then normalize the result.
    pub(super) fn replace_terms(&self, replacements: &HashMap<Term, Term>) -> Constraint {
        let mut result = Constraint::new(Arc::clone(&self.context));
        if let Some(equality) = &self.falsifying_equality {
            result.falsify(equality.clone());
            return result;
        }
        for (var, term) in self.substitution.bindings() {
            result.insert(
                Term::Var(var.clone()).replace_subterms(replacements),
                term.replace_subterms(replacements),
            );
        }
        for equality in &self.equalities {
            result.insert(
                equality.left().replace_subterms(replacements),
                equality.right().replace_subterms(replacements),
            );
        }
        result.multi_constraints = self.multi_constraints.clone();
        result.is_normal = false;
        result.normalize();
        result
    }

    /// Mark this constraint false, recording the contradictory equality.
    pub(super) fn falsify(&mut self, equality: Equality) {
        if self.is_false() {
            return;
        }
        trace!(%equality, "constraint falsified");
        self.truth_value = TruthValue::False;
        self.falsifying_equality = Some(equality);
    }

    pub(super) fn update_truth_value(&mut self) {
        if self.is_false() {
            return;
        }
        self.truth_value = if self.equalities.is_empty() && self.multi_constraints.is_empty() {
            TruthValue::True
        } else {
            TruthValue::Unknown
        };
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.truth_value == other.truth_value
            && self.substitution == other.substitution
            && self.equalities == other.equalities
            && self.multi_constraints == other.multi_constraints
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_false() {
            return write!(f, "false");
        }
        let mut items: Vec<String> = self.equalities.iter().map(ToString::to_string).collect();
        items.extend(
            self.substitution
                .bindings()
                .map(|(var, term)| format!("{} = {}", var, term)),
        );
        items.extend(self.multi_constraints.iter().map(ToString::to_string));
        if items.is_empty() {
            write!(f, "true")
        } else {
            write!(f, "{}", items.join(" /\\ "))
        }
    }
}
