use super::*;

// =============================================================================
// SUBSTITUTION COMPOSITION PROPERTIES
// =============================================================================
//
// Substitutions form a monoid under composition with identity element ε.
// The constraint store relies on composition being sound: composing a store
// with a disjoint binding must agree with applying the two in sequence.

// -------------------------------------------------------------------------
// Property: Composition is associative
//
// (σ ∘ θ) ∘ ρ = σ ∘ (θ ∘ ρ)
// -------------------------------------------------------------------------
#[test]
fn composition_is_associative() {
    let sigma = Substitution::singleton(Var::new("X"), Term::var("Y"));
    let theta = Substitution::singleton(Var::new("Y"), Term::var("Z"));
    let rho = Substitution::singleton(Var::new("Z"), Term::constant("a"));
    let left = sigma.compose(&theta).compose(&rho);
    let right = sigma.compose(&theta.compose(&rho));
    let term = Term::app("f", vec![Term::var("X"), Term::var("Y"), Term::var("Z")]);
    assert_eq!(
        left.apply_to_term(&term),
        right.apply_to_term(&term),
        "Composition must be associative: (σ∘θ)∘ρ = σ∘(θ∘ρ)"
    );
}

// -------------------------------------------------------------------------
// Property: Empty substitution is identity element
//
// ε ∘ σ = σ = σ ∘ ε
// -------------------------------------------------------------------------
#[test]
fn empty_is_identity() {
    let sigma = Substitution::singleton(Var::new("X"), Term::constant("a"));
    let empty = Substitution::empty();
    let term = Term::app("g", vec![Term::var("X"), Term::var("W")]);
    assert_eq!(
        empty.compose(&sigma).apply_to_term(&term),
        sigma.apply_to_term(&term),
        "ε ∘ σ = σ"
    );
    assert_eq!(
        sigma.compose(&empty).apply_to_term(&term),
        sigma.apply_to_term(&term),
        "σ ∘ ε = σ"
    );
}

// -------------------------------------------------------------------------
// Property: Composition agrees with sequential application
//
// (σ ∘ θ)(t) = σ(θ(t))
// -------------------------------------------------------------------------
#[test]
fn composition_is_sequential_application() {
    let sigma = Substitution::singleton(Var::new("Y"), Term::constant("b"));
    let theta: Substitution = vec![
        (Var::new("X"), Term::app("h", vec![Term::var("Y")])),
        (Var::new("Z"), Term::var("Y")),
    ]
    .into_iter()
    .collect();
    let term = Term::app("f", vec![Term::var("X"), Term::var("Z")]);
    assert_eq!(
        sigma.compose(&theta).apply_to_term(&term),
        sigma.apply_to_term(&theta.apply_to_term(&term))
    );
}

// -------------------------------------------------------------------------
// Property: Substitution reports "no change" for terms it does not touch
// -------------------------------------------------------------------------
#[test]
fn substitute_reports_unchanged_terms() {
    let sigma = Substitution::singleton(Var::new("X"), Term::constant("a"));
    assert_eq!(sigma.substitute(&Term::app("f", vec![Term::var("Y")])), None);
    assert_eq!(
        sigma.substitute(&Term::app("f", vec![Term::var("X")])),
        Some(Term::app("f", vec![Term::constant("a")]))
    );
}

// -------------------------------------------------------------------------
// Property: Substitution reaches inside maps and lookups
// -------------------------------------------------------------------------
#[test]
fn substitution_reaches_collections() {
    let m = Var::new_with_sort("M", Sort::map());
    let sigma: Substitution = vec![
        (int("K"), Term::int(1)),
        (m.clone(), Term::map(vec![(Term::int(2), Term::int(20))], None)),
    ]
    .into_iter()
    .collect();
    let map = Term::map(vec![(int_term("K"), Term::int(10))], Some(m));
    assert_eq!(
        sigma.apply_to_term(&map),
        Term::map(
            vec![(Term::int(1), Term::int(10)), (Term::int(2), Term::int(20))],
            None
        ),
        "A frame bound to a map is spliced into the enclosing map"
    );
    let lookup = Term::lookup(Term::var_with_sort("N", Sort::map()), int_term("K"));
    assert_eq!(
        sigma.apply_to_term(&lookup),
        Term::lookup(Term::var_with_sort("N", Sort::map()), Term::int(1))
    );
}

// =============================================================================
// CONSTRAINT STORE
// =============================================================================

// -------------------------------------------------------------------------
// Property: The store of a normal constraint is idempotent
//
// No key of the store occurs in any of its values.
// -------------------------------------------------------------------------
#[test]
fn constraint_store_is_idempotent() {
    let mut constraint = empty();
    constraint.add(int_term("X"), Term::plus(int_term("Y"), Term::int(1)));
    constraint.add(int_term("Y"), Term::times(int_term("Z"), Term::int(2)));
    constraint.add(int_term("W"), int_term("X"));
    let store = constraint.substitution();
    assert!(!store.is_cyclic(), "Store {} must be idempotent", store);
    for (_, value) in store.bindings() {
        assert_eq!(store.apply_to_term(value), *value);
    }
    assert_eq!(
        store.lookup(&int("W")),
        Some(&Term::plus(Term::times(int_term("Z"), Term::int(2)), Term::int(1)))
    );
}
