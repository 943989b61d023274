use std::collections::HashSet;

use super::Constraint;
use crate::error::Result;
use crate::syntax::{Term, Var};

impl Constraint {
    /// Whether this constraint is a plain match of `variables`: after
    /// orienting over them it is a pure substitution whose keys are exactly
    /// `variables` and whose values fit their keys.
    ///
    /// A value fits its key when its sort is at most as general as the key's
    /// sort, it is not an unresolved lookup, and for a fixed-size collection
    /// variable it has the same concrete size.
    pub fn is_matching(&mut self, variables: &HashSet<Var>) -> Result<bool> {
        self.orient_substitution(variables)?;
        if !self.is_substitution()
            || self.substitution.len() != variables.len()
            || !variables.iter().all(|var| self.substitution.contains(var))
        {
            return Ok(false);
        }
        let sorts = self.context.sorts();
        Ok(self.substitution.bindings().all(|(var, value)| {
            !matches!(value, Term::Lookup(_, _))
                && sorts.is_subsorted_eq(&value.sort(), var.sort())
                && fits_concrete_size(var, value)
        }))
    }
}

fn fits_concrete_size(var: &Var, value: &Term) -> bool {
    let Some(size) = var.concrete_size() else {
        return true;
    };
    match value {
        Term::Var(other) => other.concrete_size() == Some(size),
        Term::Map(map) => map.concrete_size() == Some(size),
        _ => false,
    }
}
