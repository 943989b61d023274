//! Orientation: re-expressing the substitution so that chosen variables
//! appear as keys rather than as values.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::Constraint;
use crate::error::{ConstraintError, Result};
use crate::syntax::{Term, Var};
use crate::unify::Substitution;

impl Constraint {
    /// Flip bindings so that every variable of `targets` bound as a value of
    /// the substitution becomes a key.
    ///
    /// For a binding `x -> y` with `y` a target:
    /// - if `x` is not a target, the binding becomes `y -> x`;
    /// - if `x` is a target too, some other non-target `z` with `z -> y`
    ///   becomes the shared representative: `x -> z` and `y -> z`.
    ///
    /// The remaining bindings and the equalities are rewritten accordingly.
    /// Does nothing when all targets are already keys.
    ///
    /// Fails, leaving the constraint untouched, when no representative
    /// exists for a target.
    pub fn orient_substitution(&mut self, targets: &HashSet<Var>) -> Result<()> {
        if self.is_false() || targets.iter().all(|var| self.substitution.contains(var)) {
            return Ok(());
        }

        // preimages of every variable occurring as a value
        let mut preimages: IndexMap<&Var, Vec<&Var>> = IndexMap::new();
        for (key, value) in self.substitution.bindings() {
            if let Term::Var(value) = value {
                preimages.entry(value).or_default().push(key);
            }
        }

        let mut flipped: IndexMap<Var, Term> = IndexMap::new();
        let mut removed: IndexSet<Var> = IndexSet::new();
        for (key, value) in self.substitution.bindings() {
            let Term::Var(value) = value else {
                continue;
            };
            if !targets.contains(value) || flipped.contains_key(value) {
                continue;
            }
            if targets.contains(key) {
                let representative = preimages
                    .get(value)
                    .and_then(|keys| keys.iter().find(|var| !targets.contains(**var)))
                    .ok_or_else(|| ConstraintError::OrientationFailed {
                        var: value.clone(),
                    })?;
                let representative = (*representative).clone();
                flipped.insert(key.clone(), Term::Var(representative.clone()));
                flipped.insert(value.clone(), Term::Var(representative.clone()));
                removed.insert(key.clone());
                removed.insert(representative);
            } else {
                flipped.insert(value.clone(), Term::Var(key.clone()));
                removed.insert(key.clone());
            }
        }

        let renaming: Substitution = flipped.clone().into_iter().collect();
        let mut oriented: Vec<(Var, Term)> = Vec::new();
        for (key, value) in &flipped {
            oriented.push((key.clone(), renaming.apply_to_term(value)));
        }
        for (key, value) in self.substitution.bindings() {
            if removed.contains(key) || flipped.contains_key(key) {
                continue;
            }
            oriented.push((key.clone(), renaming.apply_to_term(value)));
        }

        self.substitution = Substitution::empty();
        for (key, value) in oriented {
            self.check_before_binding(key, value);
        }
        self.is_normal = false;
        self.normalize();
        Ok(())
    }
}
