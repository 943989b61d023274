//! Bottom-up reduction of the built-in boolean, integer, equality,
//! conditional and map-lookup operators.

use super::TermEvaluator;
use crate::syntax::{labels, Term};

/// Evaluator for the built-in labels.
///
/// Children are reduced first; then the root is rewritten once if one of
/// the rules below applies. Integer operations that would overflow are left
/// unevaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEvaluator;

impl TermEvaluator for BuiltinEvaluator {
    fn evaluate(&self, term: &Term) -> Term {
        match term {
            Term::Var(_) | Term::Bool(_) | Term::Int(_) => term.clone(),
            _ => {
                let reduced = term.map_children(&mut |child| self.evaluate(child));
                reduce_root(&reduced).unwrap_or(reduced)
            }
        }
    }
}

fn reduce_root(term: &Term) -> Option<Term> {
    match term {
        Term::App(sym, args) if !sym.is_constructor() => match (sym.name.as_str(), &args[..]) {
            (labels::AND, [a, b]) => reduce_and(a, b),
            (labels::OR, [a, b]) => reduce_or(a, b),
            (labels::NOT, [a]) => match a {
                Term::Bool(value) => Some(Term::Bool(!value)),
                _ if a.is_builtin(labels::NOT) => a.args().first().cloned(),
                _ => None,
            },
            (labels::EQ, [a, b]) => {
                if a == b {
                    Some(Term::Bool(true))
                } else if a.provably_distinct(b) {
                    Some(Term::Bool(false))
                } else {
                    None
                }
            }
            (labels::PLUS, [a, b]) => reduce_plus(a, b),
            (labels::MINUS, [a, b]) => match (a, b) {
                (Term::Int(x), Term::Int(y)) => x.checked_sub(*y).map(Term::Int),
                (_, Term::Int(0)) => Some(a.clone()),
                _ if a == b => Some(Term::Int(0)),
                _ => None,
            },
            (labels::TIMES, [a, b]) => reduce_times(a, b),
            (labels::LT, [Term::Int(x), Term::Int(y)]) => Some(Term::Bool(x < y)),
            (labels::LE, [Term::Int(x), Term::Int(y)]) => Some(Term::Bool(x <= y)),
            (labels::GT, [Term::Int(x), Term::Int(y)]) => Some(Term::Bool(x > y)),
            (labels::GE, [Term::Int(x), Term::Int(y)]) => Some(Term::Bool(x >= y)),
            (labels::LT | labels::GT, [a, b]) if a == b => Some(Term::Bool(false)),
            (labels::LE | labels::GE, [a, b]) if a == b => Some(Term::Bool(true)),
            (labels::ITE, [condition, then_branch, else_branch]) => match condition {
                Term::Bool(true) => Some(then_branch.clone()),
                Term::Bool(false) => Some(else_branch.clone()),
                _ if then_branch == else_branch => Some(then_branch.clone()),
                _ => None,
            },
            _ => None,
        },
        Term::Lookup(map, key) => match &**map {
            Term::Map(map) => map
                .entries()
                .iter()
                .find(|(entry_key, _)| entry_key == &**key)
                .map(|(_, value)| value.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn reduce_and(a: &Term, b: &Term) -> Option<Term> {
    match (a, b) {
        (Term::Bool(false), _) | (_, Term::Bool(false)) => Some(Term::Bool(false)),
        (Term::Bool(true), other) | (other, Term::Bool(true)) => Some(other.clone()),
        _ if a == b => Some(a.clone()),
        _ => None,
    }
}

fn reduce_or(a: &Term, b: &Term) -> Option<Term> {
    match (a, b) {
        (Term::Bool(true), _) | (_, Term::Bool(true)) => Some(Term::Bool(true)),
        (Term::Bool(false), other) | (other, Term::Bool(false)) => Some(other.clone()),
        _ if a == b => Some(a.clone()),
        _ => None,
    }
}

fn reduce_plus(a: &Term, b: &Term) -> Option<Term> {
    match (a, b) {
        (Term::Int(x), Term::Int(y)) => x.checked_add(*y).map(Term::Int),
        (Term::Int(0), other) | (other, Term::Int(0)) => Some(other.clone()),
        _ => None,
    }
}

fn reduce_times(a: &Term, b: &Term) -> Option<Term> {
    match (a, b) {
        (Term::Int(x), Term::Int(y)) => x.checked_mul(*y).map(Term::Int),
        (Term::Int(0), _) | (_, Term::Int(0)) => Some(Term::Int(0)),
        (Term::Int(1), other) | (other, Term::Int(1)) => Some(other.clone()),
        _ => None,
    }
}
