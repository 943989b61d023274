use super::*;
use crate::options::ConstraintOptions;
use crate::smt::SmtSolver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// =============================================================================
// IMPLICATION
// =============================================================================
//
// left => exists right_only . right
//
// The prover subtracts what the left already establishes, case-splits on
// conditionals and only then consults the SMT solver.

/// A solver that counts implication queries and answers a fixed value.
struct CountingSolver {
    calls: Arc<AtomicUsize>,
    answer: bool,
}

impl SmtSolver for CountingSolver {
    fn check_unsat(&self, _constraint: &Constraint, _timeout: Duration) -> bool {
        false
    }

    fn check_implication(
        &self,
        _left: &Constraint,
        _right: &Constraint,
        _right_only: &HashSet<Var>,
        _timeout: Duration,
    ) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

fn counting_context(answer: bool) -> (Arc<Context>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let context = Context::builder(ConstraintOptions::default())
        .smt(CountingSolver {
            calls: Arc::clone(&calls),
            answer,
        })
        .build();
    (context, calls)
}

// -------------------------------------------------------------------------
// Shared bindings cancel, leaving right-only bindings
// -------------------------------------------------------------------------
#[test]
fn shared_bindings_cancel() {
    let (context, calls) = counting_context(false);
    let (x, y) = (Var::new("x"), Var::new("y"));
    let f_a = Term::app("f", vec![Term::constant("a")]);

    let mut left = Constraint::new(Arc::clone(&context));
    left.add(Term::Var(x.clone()), f_a.clone());
    let mut right = Constraint::new(context);
    right.add(Term::Var(x), f_a);
    right.add(Term::Var(y.clone()), Term::constant("b"));

    assert!(left.implies(&right, &vars(&[y])).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0, "No solver call needed");
}

// -------------------------------------------------------------------------
// Conditionals are split and each branch discharged on its own
// -------------------------------------------------------------------------
#[test]
fn conditional_is_case_split() {
    let (context, calls) = counting_context(false);
    let c = Term::var_with_sort("c", Sort::bool());
    let left = Constraint::new(Arc::clone(&context));
    let mut right = Constraint::new(context);
    right.add(Term::ite(c, int_term("t"), int_term("e")), Term::int(7));

    assert!(left.implies(&right, &vars(&[int("t"), int("e")])).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn undischarged_branch_goes_to_solver() {
    let (context, calls) = counting_context(false);
    let c = Term::var_with_sort("c", Sort::bool());
    let left = Constraint::new(Arc::clone(&context));
    let mut right = Constraint::new(context);
    right.add(Term::ite(c, int_term("t"), int_term("e")), Term::int(7));

    // the then-branch binds a right-only variable; the else-branch does not
    assert!(!left.implies(&right, &vars(&[int("t")])).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn solver_can_prove_residual() {
    let (context, calls) = counting_context(true);
    let mut left = Constraint::new(Arc::clone(&context));
    left.add(Term::lt(int_term("x"), Term::int(0)), Term::bool(true));
    let mut right = Constraint::new(context);
    right.add(Term::lt(int_term("x"), Term::int(5)), Term::bool(true));

    assert!(left.implies(&right, &HashSet::new()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// -------------------------------------------------------------------------
// The left side's bindings are used to discharge conditions
// -------------------------------------------------------------------------
#[test]
fn left_bindings_decide_conditions() {
    let (context, calls) = counting_context(false);
    let mut left = Constraint::new(Arc::clone(&context));
    left.add(int_term("x"), Term::int(1));
    let mut right = Constraint::new(context);
    right.add(Term::le(int_term("x"), Term::int(3)), Term::bool(true));

    assert!(left.implies(&right, &HashSet::new()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// -------------------------------------------------------------------------
// A contradiction on the right is not implied by a satisfiable left
// -------------------------------------------------------------------------
#[test]
fn contradiction_is_not_implied() {
    let (context, calls) = counting_context(true);
    let mut left = Constraint::new(Arc::clone(&context));
    left.add(int_term("x"), Term::int(1));
    let mut right = Constraint::new(context);
    right.add(int_term("x"), Term::int(2));

    assert!(!left.implies(&right, &HashSet::new()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// -------------------------------------------------------------------------
// Implication is reflexive
// -------------------------------------------------------------------------
#[test]
fn implication_is_reflexive() {
    let mut constraint = empty();
    constraint.add(int_term("x"), Term::plus(int_term("y"), Term::int(2)));
    constraint.add(Term::lt(int_term("y"), int_term("z")), Term::bool(true));
    assert!(constraint.implies(&constraint.clone(), &HashSet::new()).unwrap());
}

// -------------------------------------------------------------------------
// Debug logging does not change the outcome
// -------------------------------------------------------------------------
#[test]
fn debug_option_is_transparent() {
    let options = ConstraintOptions {
        debug: true,
        ..ConstraintOptions::default()
    };
    let context = Context::new(options);
    let mut left = Constraint::new(Arc::clone(&context));
    left.add(int_term("x"), Term::int(1));
    let mut right = Constraint::new(context);
    right.add(int_term("x"), int_term("y"));
    assert!(left.implies(&right, &vars(&[int("y")])).unwrap());
}
