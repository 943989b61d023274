use super::*;
use crate::syntax::Subsorts;
use crate::unify::{SyntacticUnifier, Unifier, UnifyError, MAX_ALTERNATIVES};

// =============================================================================
// UNIFICATION SEMANTIC PROPERTIES
// =============================================================================
//
// The unifier decomposes one equation into simpler ones. Its output, read
// as a conjunction, must be equivalent to the input equation; failures must
// name the smallest pair of subterms that cannot be equal.

fn pairs_of(result: Result<Unification, UnifyError>) -> Vec<(Term, Term)> {
    match result {
        Ok(Unification::Unique(pairs)) => pairs,
        other => panic!("expected a unique result, got {:?}", other),
    }
}

// -------------------------------------------------------------------------
// Property: Decomposition yields a unifier
//
// Solving the decomposed equations as bindings makes both sides equal.
// -------------------------------------------------------------------------
#[test]
fn decomposition_yields_unifier() {
    let left = Term::app("f", vec![Term::var("X"), Term::app("g", vec![Term::var("Y")])]);
    let right = Term::app("f", vec![Term::constant("a"), Term::app("g", vec![Term::constant("b")])]);
    let pairs = pairs_of(unify(&left, &right));
    let sigma: Substitution = pairs
        .into_iter()
        .map(|(l, r)| match (l, r) {
            (Term::Var(v), t) | (t, Term::Var(v)) => (v, t),
            other => panic!("expected a binding, got {:?}", other),
        })
        .collect();
    assert_eq!(sigma.apply_to_term(&left), sigma.apply_to_term(&right));
}

// -------------------------------------------------------------------------
// Property: Unification is symmetric in success
// -------------------------------------------------------------------------
#[test]
fn unification_is_symmetric() {
    let t1 = Term::app("f", vec![Term::var("X"), Term::constant("a")]);
    let t2 = Term::app("f", vec![Term::constant("b"), Term::constant("c")]);
    assert_eq!(unify(&t1, &t2).is_ok(), unify(&t2, &t1).is_ok());
    assert!(unify(&t1, &t2).is_err());
}

// -------------------------------------------------------------------------
// Property: Function applications are opaque
//
// Nothing is known structurally about a defined function, so an equation
// between two of them comes back unchanged.
// -------------------------------------------------------------------------
#[test]
fn function_applications_are_opaque() {
    let left = Term::function("size", Some(Sort::int()), vec![Term::var("L")]);
    let right = Term::function("size", Some(Sort::int()), vec![Term::var("M")]);
    assert_eq!(pairs_of(unify(&left, &right)), vec![(left, right)]);
}

// -------------------------------------------------------------------------
// Property: Minimal failing pair
// -------------------------------------------------------------------------
#[test]
fn failure_names_minimal_pair() {
    let left = Term::app("cons", vec![Term::int(1), Term::app("cons", vec![Term::int(2), Term::constant("nil")])]);
    let right = Term::app("cons", vec![Term::int(1), Term::app("cons", vec![Term::int(3), Term::constant("nil")])]);
    let err = unify(&left, &right).unwrap_err();
    assert_eq!(err.failing_pair(), (Term::int(2), Term::int(3)));
}

// -------------------------------------------------------------------------
// Property: Sorts without a common subsort never unify
// -------------------------------------------------------------------------
#[test]
fn incompatible_sorts_clash() {
    let mut sorts = Subsorts::new();
    sorts.declare(Sort::new("Nat"), Sort::int());
    let nat = Term::var_with_sort("N", Sort::new("Nat"));
    let result = SyntacticUnifier.unify(&nat, &Term::bool(false), &sorts, false);
    assert!(matches!(result, Err(UnifyError::SortClash { .. })));
    let result = SyntacticUnifier.unify(&nat, &Term::int(3), &sorts, false);
    assert!(result.is_ok());
}

// =============================================================================
// MAP UNIFICATION
// =============================================================================

// -------------------------------------------------------------------------
// Property: Frames absorb the entries the other side has in excess
// -------------------------------------------------------------------------
#[test]
fn frames_absorb_excess_entries() {
    let m = Var::new_with_sort("M", Sort::map());
    let n = Var::new_with_sort("N", Sort::map());
    let left = Term::map(vec![(Term::int(1), Term::var("A"))], Some(m));
    let right = Term::map(vec![(Term::int(2), Term::var("B"))], Some(n));
    let pairs = pairs_of(unify(&left, &right));
    assert_eq!(pairs.len(), 2, "{:?}", pairs);
    let fresh_frames: HashSet<&Var> = pairs
        .iter()
        .filter_map(|(_, r)| match r {
            Term::Map(map) => map.frame(),
            _ => None,
        })
        .chain(pairs.iter().filter_map(|(l, _)| match l {
            Term::Map(map) => map.frame(),
            _ => None,
        }))
        .collect();
    assert_eq!(fresh_frames.len(), 1, "Both remainders share one fresh frame");
}

// -------------------------------------------------------------------------
// Property: Concrete maps of different sizes clash
// -------------------------------------------------------------------------
#[test]
fn concrete_maps_of_different_sizes_clash() {
    let one = Term::map(vec![(Term::var("K"), Term::int(1))], None);
    let two = Term::map(
        vec![(Term::int(1), Term::int(1)), (Term::int(2), Term::int(2))],
        None,
    );
    assert!(unify(&one, &two).is_err());
}

// -------------------------------------------------------------------------
// Property: Pattern folding enumerates every matching, within a bound
// -------------------------------------------------------------------------
#[test]
fn pattern_folding_is_bounded() {
    let n = 5;
    let left = Term::map(
        (0..n)
            .map(|i| (Term::var(&format!("K{}", i)), Term::var(&format!("V{}", i))))
            .collect(),
        None,
    );
    let right = Term::map((0..n).map(|i| (Term::int(i), Term::int(i))).collect(), None);
    let result = SyntacticUnifier.unify(&left, &right, &Subsorts::new(), true);
    // 5! = 120 matchings exceed the bound, so the equation is kept whole
    assert!(120 > MAX_ALTERNATIVES);
    assert_eq!(pairs_of(result), vec![(left, right)]);
}
