//! Substitution: mapping variables to terms.

use crate::syntax::{Term, Var};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// A substitution mapping variables to terms.
///
/// A substitution σ = {X₁ → t₁, ..., Xₙ → tₙ} maps variables to terms.
/// Bindings keep their insertion order so that printed constraints are
/// stable; equality between substitutions ignores that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    bindings: IndexMap<Var, Term>,
}

impl Substitution {
    /// Create an empty substitution (identity).
    pub fn empty() -> Self {
        Substitution {
            bindings: IndexMap::new(),
        }
    }

    /// Create a substitution with a single binding.
    pub fn singleton(var: Var, term: Term) -> Self {
        let mut bindings = IndexMap::new();
        bindings.insert(var, term);
        Substitution { bindings }
    }

    /// Add a binding to this substitution, returning the previous value.
    pub fn bind(&mut self, var: Var, term: Term) -> Option<Term> {
        self.bindings.insert(var, term)
    }

    /// Remove a binding, keeping the order of the remaining ones.
    pub fn remove(&mut self, var: &Var) -> Option<Term> {
        self.bindings.shift_remove(var)
    }

    /// Look up a variable in this substitution.
    pub fn lookup(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Compose two substitutions: (self ∘ other)(x) = self(other(x))
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut result = Substitution::empty();

        // First, apply self to all bindings in other
        for (var, term) in &other.bindings {
            result.bind(var.clone(), self.apply_to_term(term));
        }

        // Then add bindings from self that aren't in other's domain
        for (var, term) in &self.bindings {
            if !other.bindings.contains_key(var) {
                result.bind(var.clone(), term.clone());
            }
        }

        result
    }

    /// Apply this substitution to a term.
    pub fn apply_to_term(&self, term: &Term) -> Term {
        self.substitute(term).unwrap_or_else(|| term.clone())
    }

    /// Apply this substitution to a term, reporting whether anything changed.
    ///
    /// Returns `None` when no variable of `term` is bound here.
    pub fn substitute(&self, term: &Term) -> Option<Term> {
        if self.bindings.is_empty() || !term.any_var(&mut |var| self.bindings.contains_key(var)) {
            return None;
        }
        Some(self.apply_unchecked(term))
    }

    fn apply_unchecked(&self, term: &Term) -> Term {
        match term {
            Term::Var(var) => match self.bindings.get(var) {
                Some(t) => t.clone(),
                None => term.clone(),
            },
            Term::Bool(_) | Term::Int(_) => term.clone(),
            _ => term.map_children(&mut |child| self.apply_unchecked(child)),
        }
    }

    /// Get the domain of this substitution (variables that are mapped).
    pub fn domain(&self) -> HashSet<&Var> {
        self.bindings.keys().collect()
    }

    /// Iterate over the bindings in this substitution.
    pub fn bindings(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// Check if this substitution is empty (has no bindings).
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether some key occurs free in some value.
    pub fn is_cyclic(&self) -> bool {
        self.bindings
            .values()
            .any(|value| value.any_var(&mut |var| self.bindings.contains_key(var)))
    }
}

impl FromIterator<(Var, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Var, Term)>>(iter: I) -> Self {
        Substitution {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} |-> {}", var, term)?;
        }
        write!(f, "}}")
    }
}
