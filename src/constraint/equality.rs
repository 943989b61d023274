//! Equalities between terms and their three-valued truth assessment.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::context::Context;
use crate::syntax::{SortOracle, Term};
use crate::unify::Substitution;

/// Three-valued truth of an equality or a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruthValue {
    True,
    False,
    Unknown,
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruthValue::True => write!(f, "true"),
            TruthValue::False => write!(f, "false"),
            TruthValue::Unknown => write!(f, "unknown"),
        }
    }
}

/// One equation `left = right` between evaluated terms.
///
/// Immutable; the truth value is derived from the sides when the equality is
/// built, and equality/hashing consider only the sides.
#[derive(Debug, Clone)]
pub struct Equality {
    left: Term,
    right: Term,
    truth_value: TruthValue,
}

impl Equality {
    /// Evaluate both sides and classify the result.
    pub fn new(left: Term, right: Term, context: &Context) -> Self {
        let evaluator = context.evaluator();
        Equality::classified(
            evaluator.evaluate(&left),
            evaluator.evaluate(&right),
            context.sorts(),
        )
    }

    /// Classify already evaluated sides.
    ///
    /// TRUE when the sides are identical, FALSE when their sorts have no
    /// common subsort or they are provably distinct, UNKNOWN otherwise.
    pub fn classified(left: Term, right: Term, sorts: &dyn SortOracle) -> Self {
        let truth_value = if left == right {
            TruthValue::True
        } else if sorts.greatest_lower_bound(&left.sort(), &right.sort()).is_none()
            || left.provably_distinct(&right)
        {
            TruthValue::False
        } else {
            TruthValue::Unknown
        };
        Equality {
            left,
            right,
            truth_value,
        }
    }

    pub fn left(&self) -> &Term {
        &self.left
    }

    pub fn right(&self) -> &Term {
        &self.right
    }

    pub fn truth_value(&self) -> TruthValue {
        self.truth_value
    }

    pub fn is_true(&self) -> bool {
        self.truth_value == TruthValue::True
    }

    pub fn is_false(&self) -> bool {
        self.truth_value == TruthValue::False
    }

    pub fn is_unknown(&self) -> bool {
        self.truth_value == TruthValue::Unknown
    }

    /// Apply `substitution` to both sides and re-evaluate the sides that
    /// changed. Returns `None` when the result is the same equality.
    pub fn substitute_and_evaluate(
        &self,
        substitution: &Substitution,
        context: &Context,
    ) -> Option<Equality> {
        let left = substitution.substitute(&self.left);
        let right = substitution.substitute(&self.right);
        if left.is_none() && right.is_none() {
            return None;
        }
        let evaluator = context.evaluator();
        let left = left.map_or_else(|| self.left.clone(), |t| evaluator.evaluate(&t));
        let right = right.map_or_else(|| self.right.clone(), |t| evaluator.evaluate(&t));
        let equality = Equality::classified(left, right, context.sorts());
        if equality == *self {
            None
        } else {
            Some(equality)
        }
    }

    /// Rebuild with `f` applied to both sides, without re-evaluating.
    pub(crate) fn map_sides(&self, context: &Context, f: impl Fn(&Term) -> Term) -> Equality {
        Equality::classified(f(&self.left), f(&self.right), context.sorts())
    }

    /// Whether both sides are maps.
    pub fn is_map_equality(&self) -> bool {
        matches!((&self.left, &self.right), (Term::Map(_), Term::Map(_)))
    }
}

impl PartialEq for Equality {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for Equality {}

impl Hash for Equality {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

impl fmt::Display for Equality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =? {}", self.left, self.right)
    }
}
