//! Expansion of data-structure lookups in the context of a constraint.

use std::collections::HashMap;

use crate::constraint::Constraint;
use crate::syntax::Term;

/// The result of expanding the lookups of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub term: Term,
    /// Side conditions under which the expansion is valid.
    pub conditions: Vec<(Term, Term)>,
}

/// Resolve the lookups `M[k]` inside `term`, innermost first.
///
/// Maps and keys are compared after applying the constraint's substitution
/// and its ground facts. A lookup whose key is literally present resolves to
/// the entry's value. Outside of narrowing, a lookup into a frameless map
/// with exactly one entry that could match is folded into that entry,
/// emitting `k = entry key` as a side condition.
///
/// Returns `None` when nothing was expanded.
pub fn expand_patterns(term: &Term, constraint: &Constraint, narrowing: bool) -> Option<Expansion> {
    if !term.has_lookup() {
        return None;
    }
    let facts = constraint.ground_facts();
    let mut conditions = Vec::new();
    let expanded = expand(term, constraint, &facts, narrowing, &mut conditions);
    if expanded == *term {
        None
    } else {
        Some(Expansion {
            term: expanded,
            conditions,
        })
    }
}

fn expand(
    term: &Term,
    constraint: &Constraint,
    facts: &HashMap<Term, Term>,
    narrowing: bool,
    conditions: &mut Vec<(Term, Term)>,
) -> Term {
    if !term.has_lookup() {
        return term.clone();
    }
    let rebuilt =
        term.map_children(&mut |child| expand(child, constraint, facts, narrowing, conditions));
    if let Term::Lookup(map, key) = &rebuilt {
        if let Some(resolved) = resolve_lookup(map, key, constraint, facts, narrowing, conditions) {
            return resolved;
        }
    }
    rebuilt
}

fn resolve_lookup(
    map: &Term,
    key: &Term,
    constraint: &Constraint,
    facts: &HashMap<Term, Term>,
    narrowing: bool,
    conditions: &mut Vec<(Term, Term)>,
) -> Option<Term> {
    let evaluator = constraint.context().evaluator();
    let resolve = |term: &Term| {
        let substituted = constraint.substitution().apply_to_term(term);
        evaluator.evaluate(&substituted.replace_subterms(facts))
    };
    let map = resolve(map);
    let key = resolve(key);
    let Term::Map(map) = &map else {
        return None;
    };

    if let Some((_, value)) = map.entries().iter().find(|(entry_key, _)| *entry_key == key) {
        return Some(value.clone());
    }
    if narrowing || map.frame().is_some() {
        return None;
    }
    let candidates: Vec<&(Term, Term)> = map
        .entries()
        .iter()
        .filter(|(entry_key, _)| !entry_key.provably_distinct(&key))
        .collect();
    match candidates.as_slice() {
        [(entry_key, value)] => {
            conditions.push((key.clone(), entry_key.clone()));
            Some(value.clone())
        }
        _ => None,
    }
}
