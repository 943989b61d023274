use std::fmt;

use super::Constraint;

/// Alternative completions of a constraint, at least one of which holds.
///
/// Produced when one equality does not unify to a unique result, as when
/// matching against an associative-commutative map.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunction {
    alternatives: Vec<Constraint>,
}

impl Disjunction {
    pub fn new(alternatives: Vec<Constraint>) -> Self {
        Disjunction { alternatives }
    }

    pub fn alternatives(&self) -> &[Constraint] {
        &self.alternatives
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternatives: Vec<String> = self
            .alternatives
            .iter()
            .map(|alternative| format!("({})", alternative))
            .collect();
        write!(f, "({})", alternatives.join(" \\/ "))
    }
}

impl Constraint {
    /// The pending disjunctions, one per equality that unified ambiguously.
    pub fn multi_constraints(&self) -> &[Disjunction] {
        &self.multi_constraints
    }

    /// Materialize the disjunction: one constraint per element of the cross
    /// product of the pending alternatives, each conjoined with the rest of
    /// this constraint and simplified. False combinations are dropped.
    ///
    /// Without pending disjunctions this is just a copy of `self`.
    pub fn get_multi_constraints(&self) -> Vec<Constraint> {
        if self.multi_constraints.is_empty() {
            return vec![self.clone()];
        }
        let mut base = self.clone();
        base.multi_constraints.clear();
        base.is_normal = false;
        base.normalize();

        let mut combinations = vec![base];
        for disjunction in &self.multi_constraints {
            let mut next = Vec::with_capacity(combinations.len() * disjunction.len());
            for combination in &combinations {
                for alternative in disjunction.alternatives() {
                    let mut extended = combination.clone();
                    extended.add_constraint(alternative);
                    extended.simplify();
                    if !extended.is_false() {
                        next.push(extended);
                    }
                }
            }
            combinations = next;
        }
        combinations
    }
}
