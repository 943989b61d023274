use super::*;
use crate::syntax::Subsorts;
use crate::options::ConstraintOptions;

// =============================================================================
// MATCHING
// =============================================================================
//
// A constraint is a match of V when, oriented over V, it is exactly a
// substitution with domain V whose values are concrete enough for V.

// -------------------------------------------------------------------------
// Unresolved lookups are not matches
// -------------------------------------------------------------------------
#[test]
fn unresolved_lookup_is_not_a_match() {
    let x = Var::new("x");
    let mut constraint = empty();
    constraint.add(
        Term::Var(x.clone()),
        Term::lookup(Term::var_with_sort("M", Sort::map()), int_term("k")),
    );
    assert!(constraint.is_substitution());
    assert!(!constraint.is_matching(&vars(&[x])).unwrap());
}

#[test]
fn resolved_lookup_is_a_match() {
    let x = Var::new("x");
    let map = Term::map(vec![(Term::int(1), Term::constant("one"))], None);
    let mut constraint = empty();
    constraint.add(Term::Var(x.clone()), Term::lookup(map, int_term("k")));
    constraint.add(int_term("k"), Term::int(1));
    constraint.remove_bindings([&int("k")]);
    assert!(constraint.is_matching(&vars(&[x])).unwrap());
}

// -------------------------------------------------------------------------
// Values must not be more general than their variables
// -------------------------------------------------------------------------
#[test]
fn value_sort_is_checked() {
    let mut sorts = Subsorts::new();
    sorts.declare(Sort::new("Nat"), Sort::int());
    let context = Context::builder(ConstraintOptions::default()).sorts(sorts).build();
    let n = Var::new_with_sort("n", Sort::new("Nat"));

    let mut constraint = Constraint::new(Arc::clone(&context));
    constraint.add(Term::Var(n.clone()), int_term("i"));
    assert!(!constraint.is_matching(&vars(&[n.clone()])).unwrap());

    let mut constraint = Constraint::new(context);
    constraint.add(Term::Var(n.clone()), Term::var_with_sort("m", Sort::new("Nat")));
    assert!(constraint.is_matching(&vars(&[n])).unwrap());
}

// -------------------------------------------------------------------------
// Residual equalities and extra bindings are not matches
// -------------------------------------------------------------------------
#[test]
fn residue_is_not_a_match() {
    let mut constraint = empty();
    constraint.add(int_term("x"), Term::int(1));
    constraint.add(int_term("y"), Term::int(2));
    assert!(!constraint.is_matching(&vars(&[int("x")])).unwrap());

    let mut constraint = empty();
    constraint.add(int_term("x"), Term::int(1));
    constraint.add(Term::lt(int_term("z"), Term::int(1)), Term::bool(true));
    assert!(!constraint.is_matching(&vars(&[int("x")])).unwrap());
}

// -------------------------------------------------------------------------
// Fixed-size collection variables need values of that size
// -------------------------------------------------------------------------
#[test]
fn concrete_collections_need_matching_size() {
    let m = Var::concrete_collection("M", Sort::map(), 2);
    let mut constraint = empty();
    constraint.add(
        Term::Var(m.clone()),
        Term::map(
            vec![(Term::int(1), Term::int(1)), (Term::int(2), Term::int(4))],
            None,
        ),
    );
    assert!(constraint.is_matching(&vars(&[m.clone()])).unwrap());

    let mut constraint = empty();
    constraint.add(
        Term::Var(m.clone()),
        Term::map(
            vec![(Term::int(1), Term::int(1))],
            Some(Var::new_with_sort("R", Sort::map())),
        ),
    );
    assert!(!constraint.is_matching(&vars(&[m])).unwrap());
}
