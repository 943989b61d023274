//! Sorts and the subsort ordering consulted by the constraint engine.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A sort name. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sort(Arc<str>);

impl Sort {
    pub fn new(name: impl AsRef<str>) -> Self {
        Sort(Arc::from(name.as_ref()))
    }

    /// The top sort: every sort is a subsort of `K`.
    pub fn k() -> Self {
        Sort::new("K")
    }

    pub fn bool() -> Self {
        Sort::new("Bool")
    }

    pub fn int() -> Self {
        Sort::new("Int")
    }

    pub fn map() -> Self {
        Sort::new("Map")
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_top(&self) -> bool {
        &*self.0 == "K"
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subsort queries.
pub trait SortOracle: Send + Sync {
    /// `sub <= sup` in the subsort order (reflexive).
    fn is_subsorted_eq(&self, sub: &Sort, sup: &Sort) -> bool;

    /// The greatest common subsort of `a` and `b`, if one exists.
    fn greatest_lower_bound(&self, a: &Sort, b: &Sort) -> Option<Sort>;

    /// Whether some sort lies below both `a` and `b`.
    fn have_common_subsort(&self, a: &Sort, b: &Sort) -> bool {
        self.greatest_lower_bound(a, b).is_some()
    }
}

/// A declared subsort order with `K` on top.
///
/// Declarations are closed reflexively and transitively on insertion.
#[derive(Debug, Clone)]
pub struct Subsorts {
    /// sort -> all of its strict supersorts
    supersorts: HashMap<Sort, HashSet<Sort>>,
}

impl Subsorts {
    /// The built-in sorts `Bool`, `Int` and `Map`, all directly below `K`.
    pub fn new() -> Self {
        let mut subsorts = Subsorts {
            supersorts: HashMap::new(),
        };
        subsorts.supersorts.insert(Sort::k(), HashSet::new());
        for sort in [Sort::bool(), Sort::int(), Sort::map()] {
            subsorts.declare(sort, Sort::k());
        }
        subsorts
    }

    /// Declare `sub < sup`.
    pub fn declare(&mut self, sub: Sort, sup: Sort) {
        self.supersorts.entry(sup.clone()).or_default();
        let mut above: HashSet<Sort> = self.supersorts[&sup].clone();
        above.insert(sup);

        // everything at or below `sub` inherits everything at or above `sup`
        let below: Vec<Sort> = self
            .supersorts
            .iter()
            .filter(|(s, sups)| **s == sub || sups.contains(&sub))
            .map(|(s, _)| s.clone())
            .chain(std::iter::once(sub.clone()))
            .collect();
        for sort in below {
            self.supersorts
                .entry(sort)
                .or_default()
                .extend(above.iter().cloned());
        }
    }

    /// All sorts this lattice knows about.
    pub fn sorts(&self) -> impl Iterator<Item = &Sort> {
        self.supersorts.keys()
    }
}

impl Default for Subsorts {
    fn default() -> Self {
        Self::new()
    }
}

impl SortOracle for Subsorts {
    fn is_subsorted_eq(&self, sub: &Sort, sup: &Sort) -> bool {
        sub == sup
            || sup.is_top()
            || self
                .supersorts
                .get(sub)
                .map_or(false, |sups| sups.contains(sup))
    }

    fn greatest_lower_bound(&self, a: &Sort, b: &Sort) -> Option<Sort> {
        if self.is_subsorted_eq(a, b) {
            return Some(a.clone());
        }
        if self.is_subsorted_eq(b, a) {
            return Some(b.clone());
        }
        let lower: Vec<Sort> = self
            .sorts()
            .filter(|s| self.is_subsorted_eq(s, a) && self.is_subsorted_eq(s, b))
            .cloned()
            .collect();
        // unique maximal element, if any
        let mut maximal = Vec::new();
        for candidate in &lower {
            if lower
                .iter()
                .all(|other| other == candidate || !self.is_subsorted_eq(candidate, other))
            {
                maximal.push(candidate.clone());
            }
        }
        if maximal.len() == 1 {
            maximal.pop()
        } else {
            None
        }
    }
}
