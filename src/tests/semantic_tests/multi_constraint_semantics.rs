use super::*;

// =============================================================================
// DISJUNCTIVE OUTCOMES
// =============================================================================
//
// Ambiguous map equations fold into disjunctions that stay pending until a
// caller materializes them. Materializing yields one constraint per
// satisfiable combination of alternatives.

fn two_entry_match(values: (Term, Term)) -> (Term, Term) {
    (
        Term::map(
            vec![(int_term("k1"), values.0), (int_term("k2"), values.1)],
            None,
        ),
        Term::map(
            vec![(Term::int(1), Term::constant("a")), (Term::int(2), Term::constant("b"))],
            None,
        ),
    )
}

#[test]
fn disjunctions_are_pending_until_materialized() {
    let (left, right) = two_entry_match((Term::var("v1"), Term::var("v2")));
    let mut constraint = empty();
    constraint.add(left, right);
    constraint.simplify_modulo_pattern_folding();
    assert_eq!(constraint.truth_value(), TruthValue::Unknown);
    assert_eq!(constraint.multi_constraints().len(), 1);
    assert!(!constraint.is_substitution());

    let all = constraint.get_multi_constraints();
    assert_eq!(all.len(), 2);
    for alternative in &all {
        assert!(alternative.is_true());
        assert!(alternative.multi_constraints().is_empty());
    }
}

#[test]
fn infeasible_alternatives_are_pruned_early() {
    let (left, right) = two_entry_match((Term::constant("a"), Term::var("v")));
    let mut constraint = empty();
    constraint.add(left, right);
    constraint.simplify_modulo_pattern_folding();
    // only k1 = 1 lets the value a line up
    assert!(constraint.multi_constraints().is_empty());
    assert!(constraint.is_true());
    assert_eq!(constraint.substitution().lookup(&int("k1")), Some(&Term::int(1)));
    assert_eq!(constraint.substitution().lookup(&Var::new("v")), Some(&Term::constant("b")));
}

#[test]
fn no_feasible_alternative_falsifies() {
    let (left, right) = two_entry_match((Term::constant("c"), Term::var("v")));
    let mut constraint = empty();
    constraint.add(left, right);
    assert_eq!(constraint.simplify_modulo_pattern_folding(), TruthValue::False);
}

#[test]
fn materialization_applies_later_facts() {
    let (left, right) = two_entry_match((Term::var("v1"), Term::var("v2")));
    let mut constraint = empty();
    constraint.add(left, right);
    constraint.simplify_modulo_pattern_folding();
    constraint.add(Term::var("v2"), Term::constant("a"));
    let all = constraint.get_multi_constraints();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].substitution().lookup(&int("k2")), Some(&Term::int(1)));
}
