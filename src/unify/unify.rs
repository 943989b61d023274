//! Structural unification: decomposing an equation between two terms into
//! simpler equations, possibly with disjunctive alternatives.

use crate::syntax::{MapTerm, Sort, SortOracle, Subsorts, Term, Var};
use thiserror::Error;
use tracing::trace;

/// Upper bound on the alternatives enumerated for one ambiguous map equation.
pub const MAX_ALTERNATIVES: usize = 64;

/// Result of a successful unification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unification {
    /// A single conjunction of simpler equations.
    Unique(Vec<(Term, Term)>),
    /// Equations that hold in every case, plus alternative conjunctions of
    /// which at least one must hold.
    Disjunction {
        common: Vec<(Term, Term)>,
        alternatives: Vec<Vec<(Term, Term)>>,
    },
}

impl Unification {
    pub fn is_unique(&self) -> bool {
        matches!(self, Unification::Unique(_))
    }

    /// The equations shared by every outcome.
    pub fn common(&self) -> &[(Term, Term)] {
        match self {
            Unification::Unique(pairs) => pairs,
            Unification::Disjunction { common, .. } => common,
        }
    }
}

/// Reasons why unification can fail.
///
/// Every variant carries the smallest pair of subterms found not to unify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Occurs check failed: variable would occur in its own binding.
    #[error("occurs check failed: {var} occurs in {term}")]
    OccursCheck { var: Var, term: Term },
    /// Constructors or literals don't match.
    #[error("symbol clash between {left} and {right}")]
    SymbolClash { left: Term, right: Term },
    /// The sorts of the two sides have no common subsort.
    #[error("sort clash between {left} : {} and {right} : {}", .left.sort(), .right.sort())]
    SortClash { left: Term, right: Term },
    /// A map entry has nowhere to go on the other side.
    #[error("no entry for key {key} in {map}")]
    MissingEntry { key: Term, map: Term },
}

impl UnifyError {
    /// The minimal pair of terms that failed to unify.
    pub fn failing_pair(&self) -> (Term, Term) {
        match self {
            UnifyError::OccursCheck { var, term } => (Term::Var(var.clone()), term.clone()),
            UnifyError::SymbolClash { left, right } | UnifyError::SortClash { left, right } => {
                (left.clone(), right.clone())
            }
            UnifyError::MissingEntry { key, map } => {
                (Term::lookup(map.clone(), key.clone()), key.clone())
            }
        }
    }
}

/// The structural unifier capability.
pub trait Unifier: Send + Sync {
    /// Decompose `left = right`.
    ///
    /// Returns the equation itself, unchanged, when no progress is possible.
    /// Disjunctions are only produced when `pattern_fold` is set.
    fn unify(
        &self,
        left: &Term,
        right: &Term,
        sorts: &dyn SortOracle,
        pattern_fold: bool,
    ) -> Result<Unification, UnifyError>;
}

/// Sort-aware syntactic unification with associative-commutative map
/// decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticUnifier;

impl Unifier for SyntacticUnifier {
    fn unify(
        &self,
        left: &Term,
        right: &Term,
        sorts: &dyn SortOracle,
        pattern_fold: bool,
    ) -> Result<Unification, UnifyError> {
        let mut decomposition = Decomposition {
            sorts,
            pattern_fold,
            pairs: Vec::new(),
            alternatives: None,
        };
        decomposition.decompose(left, right)?;
        trace!(%left, %right, pairs = decomposition.pairs.len(), "unified");
        Ok(match decomposition.alternatives {
            Some(alternatives) => Unification::Disjunction {
                common: decomposition.pairs,
                alternatives,
            },
            None => Unification::Unique(decomposition.pairs),
        })
    }
}

/// Unify two terms under the built-in sort order, without pattern folding.
pub fn unify(left: &Term, right: &Term) -> Result<Unification, UnifyError> {
    SyntacticUnifier.unify(left, right, &Subsorts::new(), false)
}

struct Decomposition<'a> {
    sorts: &'a dyn SortOracle,
    pattern_fold: bool,
    pairs: Vec<(Term, Term)>,
    alternatives: Option<Vec<Vec<(Term, Term)>>>,
}

impl Decomposition<'_> {
    fn decompose(&mut self, left: &Term, right: &Term) -> Result<(), UnifyError> {
        if left == right {
            return Ok(());
        }
        match (left, right) {
            (Term::Var(var), other) | (other, Term::Var(var)) => {
                if self
                    .sorts
                    .greatest_lower_bound(var.sort(), &other.sort())
                    .is_none()
                {
                    return Err(UnifyError::SortClash {
                        left: left.clone(),
                        right: right.clone(),
                    });
                }
                if occurs_rigidly(var, other) {
                    return Err(UnifyError::OccursCheck {
                        var: var.clone(),
                        term: other.clone(),
                    });
                }
                self.pairs.push((left.clone(), right.clone()));
                Ok(())
            }
            (Term::App(f, xs), Term::App(g, ys)) if f.is_constructor() && g.is_constructor() => {
                if f.name != g.name || xs.len() != ys.len() {
                    return Err(UnifyError::SymbolClash {
                        left: left.clone(),
                        right: right.clone(),
                    });
                }
                for (x, y) in xs.iter().zip(ys.iter()) {
                    self.decompose(x, y)?;
                }
                Ok(())
            }
            (Term::Map(a), Term::Map(b)) => self.decompose_maps(left, right, a, b),
            _ if left.heads_clash(right) => Err(UnifyError::SymbolClash {
                left: left.clone(),
                right: right.clone(),
            }),
            _ => {
                self.pairs.push((left.clone(), right.clone()));
                Ok(())
            }
        }
    }

    fn decompose_maps(
        &mut self,
        left: &Term,
        right: &Term,
        a: &MapTerm,
        b: &MapTerm,
    ) -> Result<(), UnifyError> {
        if let (Some(m), Some(n)) = (a.concrete_size(), b.concrete_size()) {
            if m != n {
                return Err(UnifyError::SymbolClash {
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }

        let mut rest_a: Vec<&(Term, Term)> = Vec::new();
        for entry in a.entries() {
            match b.entries().iter().find(|(key, _)| *key == entry.0) {
                Some((_, value)) => self.decompose(&entry.1, value)?,
                None => rest_a.push(entry),
            }
        }
        let rest_b: Vec<&(Term, Term)> = b
            .entries()
            .iter()
            .filter(|(key, _)| !a.entries().iter().any(|(other, _)| other == key))
            .collect();

        let ambiguous = rest_a.iter().any(|(ka, _)| {
            rest_b
                .iter()
                .any(|(kb, _)| !ka.provably_distinct(kb))
        });
        if ambiguous {
            return self.decompose_ambiguous(left, right, a, b, &rest_a, &rest_b);
        }

        match (a.frame(), b.frame()) {
            (None, None) => match rest_a.first().or(rest_b.first()) {
                Some((key, _)) => Err(missing(key, if rest_a.is_empty() { left } else { right })),
                None => Ok(()),
            },
            (Some(fa), None) => {
                if let Some((key, _)) = rest_a.first() {
                    return Err(missing(key, right));
                }
                self.decompose(&Term::Var(fa.clone()), &submap(&rest_b, None))
            }
            (None, Some(fb)) => {
                if let Some((key, _)) = rest_b.first() {
                    return Err(missing(key, left));
                }
                self.decompose(&submap(&rest_a, None), &Term::Var(fb.clone()))
            }
            (Some(fa), Some(fb)) if fa == fb => match rest_a.first() {
                Some((key, _)) => Err(missing(key, right)),
                None => match rest_b.first() {
                    Some((key, _)) => Err(missing(key, left)),
                    None => Ok(()),
                },
            },
            (Some(fa), Some(fb)) => match (rest_a.is_empty(), rest_b.is_empty()) {
                (true, true) => self.decompose(&Term::Var(fa.clone()), &Term::Var(fb.clone())),
                (true, false) => {
                    self.decompose(&Term::Var(fa.clone()), &submap(&rest_b, Some(fb.clone())))
                }
                (false, true) => {
                    self.decompose(&submap(&rest_a, Some(fa.clone())), &Term::Var(fb.clone()))
                }
                (false, false) => {
                    let rest = Var::fresh(Sort::map());
                    self.decompose(
                        &Term::Var(fa.clone()),
                        &submap(&rest_b, Some(rest.clone())),
                    )?;
                    self.decompose(&submap(&rest_a, Some(rest)), &Term::Var(fb.clone()))
                }
            },
        }
    }

    /// Leftover entries whose keys may or may not coincide.
    fn decompose_ambiguous(
        &mut self,
        left: &Term,
        right: &Term,
        a: &MapTerm,
        b: &MapTerm,
        rest_a: &[&(Term, Term)],
        rest_b: &[&(Term, Term)],
    ) -> Result<(), UnifyError> {
        let residual_left = submap(rest_a, a.frame().cloned());
        let residual_right = submap(rest_b, b.frame().cloned());
        let residual = if residual_left == *left && residual_right == *right {
            (left.clone(), right.clone())
        } else {
            (residual_left, residual_right)
        };

        let foldable = self.pattern_fold
            && self.alternatives.is_none()
            && a.frame().is_none()
            && b.frame().is_none()
            && rest_a.len() == rest_b.len();
        if !foldable {
            self.pairs.push(residual);
            return Ok(());
        }

        let mut pairings = Vec::new();
        let mut used = vec![false; rest_b.len()];
        let complete = enumerate_pairings(rest_a, rest_b, &mut used, &mut Vec::new(), &mut pairings);
        if !complete {
            self.pairs.push(residual);
            return Ok(());
        }
        match pairings.len() {
            0 => Err(missing(&rest_a[0].0, right)),
            1 => {
                self.pairs.extend(pairings.into_iter().flatten());
                Ok(())
            }
            _ => {
                trace!(alternatives = pairings.len(), "map equation folded into a disjunction");
                self.alternatives = Some(pairings);
                Ok(())
            }
        }
    }
}

/// Extend `current` to every bijection between the remaining entries.
/// Returns false once more than `MAX_ALTERNATIVES` have been found.
fn enumerate_pairings(
    rest_a: &[&(Term, Term)],
    rest_b: &[&(Term, Term)],
    used: &mut [bool],
    current: &mut Vec<(Term, Term)>,
    out: &mut Vec<Vec<(Term, Term)>>,
) -> bool {
    let Some(((ka, va), remaining)) = rest_a.split_first().map(|(first, rest)| (*first, rest))
    else {
        out.push(current.clone());
        return out.len() <= MAX_ALTERNATIVES;
    };
    for (j, (kb, vb)) in rest_b.iter().copied().enumerate() {
        if used[j] || ka.provably_distinct(kb) {
            continue;
        }
        used[j] = true;
        let mark = current.len();
        if ka != kb {
            current.push((ka.clone(), kb.clone()));
        }
        if va != vb {
            current.push((va.clone(), vb.clone()));
        }
        if !enumerate_pairings(remaining, rest_b, used, current, out) {
            return false;
        }
        current.truncate(mark);
        used[j] = false;
    }
    true
}

fn submap(entries: &[&(Term, Term)], frame: Option<Var>) -> Term {
    Term::map(entries.iter().map(|entry| (*entry).clone()).collect(), frame)
}

fn missing(key: &Term, map: &Term) -> UnifyError {
    UnifyError::MissingEntry {
        key: key.clone(),
        map: map.clone(),
    }
}

/// Whether `var` occurs in `term` beneath constructors only, which makes
/// `var = term` unsatisfiable.
fn occurs_rigidly(var: &Var, term: &Term) -> bool {
    match term {
        Term::Var(other) => other == var,
        Term::App(sym, args) if sym.is_constructor() => {
            args.iter().any(|arg| occurs_rigidly(var, arg))
        }
        Term::Map(map) => {
            map.entries()
                .iter()
                .any(|(key, value)| occurs_rigidly(var, key) || occurs_rigidly(var, value))
                || (!map.entries().is_empty() && map.frame() == Some(var))
        }
        _ => false,
    }
}
