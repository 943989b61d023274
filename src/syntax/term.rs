//! Terms: variables, literals, applications, maps and map lookups.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::labels;
use super::Sort;
use crate::unify::Substitution;

static FRESH_VARIABLES: AtomicUsize = AtomicUsize::new(0);

/// A variable.
///
/// Variables carry a sort. Anonymous variables are introduced internally
/// (by the rule compiler or by the unifier) and are preferred for
/// elimination when two variables are equated. A variable with a concrete
/// size stands for a collection with exactly that many elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var {
    name: Arc<str>,
    sort: Sort,
    anonymous: bool,
    concrete_size: Option<usize>,
}

impl Var {
    /// A named variable of the top sort `K`.
    pub fn new(name: impl AsRef<str>) -> Self {
        Var::new_with_sort(name, Sort::k())
    }

    pub fn new_with_sort(name: impl AsRef<str>, sort: Sort) -> Self {
        Var {
            name: Arc::from(name.as_ref()),
            sort,
            anonymous: false,
            concrete_size: None,
        }
    }

    pub fn anonymous(name: impl AsRef<str>, sort: Sort) -> Self {
        Var {
            anonymous: true,
            ..Var::new_with_sort(name, sort)
        }
    }

    /// A fresh anonymous variable, distinct from every variable minted before.
    pub fn fresh(sort: Sort) -> Self {
        let id = FRESH_VARIABLES.fetch_add(1, Ordering::Relaxed);
        Var::anonymous(format!("_{}", id), sort)
    }

    /// A collection variable standing for exactly `size` elements.
    pub fn concrete_collection(name: impl AsRef<str>, sort: Sort, size: usize) -> Self {
        Var {
            concrete_size: Some(size),
            ..Var::new_with_sort(name, sort)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn concrete_size(&self) -> Option<usize> {
        self.concrete_size
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Whether a symbol is a free constructor or a defined function.
///
/// Distinct constructors denote distinct values; nothing is known
/// structurally about function applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Constructor,
    Function,
}

/// A function symbol with its arity and optional result sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnSym {
    pub name: String,
    pub arity: usize,
    pub result_sort: Option<Sort>,
    pub kind: SymbolKind,
}

impl FnSym {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        FnSym {
            name: name.into(),
            arity,
            result_sort: None,
            kind: SymbolKind::Constructor,
        }
    }

    pub fn new_with_sort(name: impl Into<String>, arity: usize, result_sort: Sort) -> Self {
        FnSym {
            result_sort: Some(result_sort),
            ..FnSym::new(name, arity)
        }
    }

    pub fn function(name: impl Into<String>, arity: usize, result_sort: Option<Sort>) -> Self {
        FnSym {
            name: name.into(),
            arity,
            result_sort,
            kind: SymbolKind::Function,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == SymbolKind::Constructor
    }
}

/// A map term: finitely many entries plus an optional frame variable
/// standing for the remaining entries.
///
/// Entries are kept sorted by key so that equal maps are syntactically equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapTerm {
    entries: Vec<(Term, Term)>,
    frame: Option<Var>,
}

impl MapTerm {
    pub fn new(mut entries: Vec<(Term, Term)>, frame: Option<Var>) -> Self {
        entries.sort();
        entries.dedup();
        MapTerm { entries, frame }
    }

    pub fn entries(&self) -> &[(Term, Term)] {
        &self.entries
    }

    pub fn frame(&self) -> Option<&Var> {
        self.frame.as_ref()
    }

    /// Number of entries when the map has no frame.
    pub fn concrete_size(&self) -> Option<usize> {
        match self.frame {
            Some(_) => None,
            None => Some(self.entries.len()),
        }
    }

    /// Rebuild this map with `f` applied to every key, value and the frame.
    ///
    /// A frame mapped to another map is spliced in; a frame mapped to a
    /// variable is renamed. Any other image leaves the frame untouched.
    fn map_parts(&self, f: &mut dyn FnMut(&Term) -> Term) -> Term {
        let mut entries: Vec<(Term, Term)> =
            self.entries.iter().map(|(k, v)| (f(k), f(v))).collect();
        let frame = match &self.frame {
            None => None,
            Some(frame) => match f(&Term::Var(frame.clone())) {
                Term::Var(renamed) => Some(renamed),
                Term::Map(spliced) => {
                    entries.extend(spliced.entries.iter().cloned());
                    spliced.frame.clone()
                }
                _ => Some(frame.clone()),
            },
        };
        Term::Map(Arc::new(MapTerm::new(entries, frame)))
    }
}

/// The constructor-like head of a term, used to detect terms that are
/// provably distinct without knowing their arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head<'a> {
    Bool(bool),
    Int(i64),
    Constructor(&'a str, usize),
    Map(Option<usize>),
}

impl Head<'_> {
    /// Two heads clash when they can never denote the same value.
    pub fn clashes_with(&self, other: &Head<'_>) -> bool {
        match (self, other) {
            (Head::Map(Some(a)), Head::Map(Some(b))) => a != b,
            (Head::Map(_), Head::Map(_)) => false,
            _ => self != other,
        }
    }
}

/// A term.
///
/// Terms are immutable; subterms are shared through reference counting.
/// In S-expression syntax:
/// - Variables: `X`, `Person` (capitalized)
/// - Constants (0-ary constructors): `socrates`, `nil` (lowercase)
/// - Applications: `(f x y)`, `(_+Int_ X 1)`
/// - Maps: `{k |-> v, ..F}`, lookups: `M[k]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A variable
    Var(Var),
    /// A boolean literal
    Bool(bool),
    /// An integer literal
    Int(i64),
    /// Function application: f(t1, ..., tn)
    App(FnSym, Arc<[Term]>),
    /// A map with an optional frame
    Map(Arc<MapTerm>),
    /// Data-structure lookup: map[key]
    Lookup(Arc<Term>, Arc<Term>),
}

impl Term {
    /// Create a variable term of sort `K`.
    pub fn var(name: impl AsRef<str>) -> Self {
        Term::Var(Var::new(name))
    }

    /// Create a sorted variable term.
    pub fn var_with_sort(name: impl AsRef<str>, sort: Sort) -> Self {
        Term::Var(Var::new_with_sort(name, sort))
    }

    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::App(FnSym::new(name, 0), Arc::from(Vec::new()))
    }

    /// Create a sorted constant term (0-ary constructor).
    pub fn constant_with_sort(name: impl Into<String>, sort: Sort) -> Self {
        Term::App(FnSym::new_with_sort(name, 0, sort), Arc::from(Vec::new()))
    }

    /// Create a constructor application term.
    pub fn app(name: impl Into<String>, args: Vec<Term>) -> Self {
        let arity = args.len();
        Term::App(FnSym::new(name, arity), Arc::from(args))
    }

    /// Create a constructor application term with a result sort.
    pub fn app_with_sort(name: impl Into<String>, result_sort: Sort, args: Vec<Term>) -> Self {
        let arity = args.len();
        Term::App(FnSym::new_with_sort(name, arity, result_sort), Arc::from(args))
    }

    /// Create a defined-function application term.
    pub fn function(name: impl Into<String>, result_sort: Option<Sort>, args: Vec<Term>) -> Self {
        let arity = args.len();
        Term::App(FnSym::function(name, arity, result_sort), Arc::from(args))
    }

    /// Apply a built-in label; the result sort comes from the label.
    pub fn builtin(label: &str, args: Vec<Term>) -> Self {
        Term::function(label, labels::result_sort(label), args)
    }

    pub fn bool(value: bool) -> Self {
        Term::Bool(value)
    }

    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }

    pub fn map(entries: Vec<(Term, Term)>, frame: Option<Var>) -> Self {
        Term::Map(Arc::new(MapTerm::new(entries, frame)))
    }

    pub fn lookup(map: Term, key: Term) -> Self {
        Term::Lookup(Arc::new(map), Arc::new(key))
    }

    pub fn and(left: Term, right: Term) -> Self {
        Term::builtin(labels::AND, vec![left, right])
    }

    pub fn or(left: Term, right: Term) -> Self {
        Term::builtin(labels::OR, vec![left, right])
    }

    pub fn not(term: Term) -> Self {
        Term::builtin(labels::NOT, vec![term])
    }

    pub fn eq(left: Term, right: Term) -> Self {
        Term::builtin(labels::EQ, vec![left, right])
    }

    pub fn plus(left: Term, right: Term) -> Self {
        Term::builtin(labels::PLUS, vec![left, right])
    }

    pub fn minus(left: Term, right: Term) -> Self {
        Term::builtin(labels::MINUS, vec![left, right])
    }

    pub fn times(left: Term, right: Term) -> Self {
        Term::builtin(labels::TIMES, vec![left, right])
    }

    pub fn lt(left: Term, right: Term) -> Self {
        Term::builtin(labels::LT, vec![left, right])
    }

    pub fn le(left: Term, right: Term) -> Self {
        Term::builtin(labels::LE, vec![left, right])
    }

    pub fn gt(left: Term, right: Term) -> Self {
        Term::builtin(labels::GT, vec![left, right])
    }

    pub fn ge(left: Term, right: Term) -> Self {
        Term::builtin(labels::GE, vec![left, right])
    }

    pub fn ite(condition: Term, then_branch: Term, else_branch: Term) -> Self {
        Term::builtin(labels::ITE, vec![condition, then_branch, else_branch])
    }

    /// Collect all variables occurring in this term.
    pub fn variables(&self) -> HashSet<Var> {
        let mut set = HashSet::new();
        self.collect_variables(&mut set);
        set
    }

    fn collect_variables(&self, set: &mut HashSet<Var>) {
        match self {
            Term::Var(var) => {
                set.insert(var.clone());
            }
            Term::Bool(_) | Term::Int(_) => {}
            Term::App(_, args) => {
                for arg in args.iter() {
                    arg.collect_variables(set);
                }
            }
            Term::Map(map) => {
                for (key, value) in map.entries() {
                    key.collect_variables(set);
                    value.collect_variables(set);
                }
                if let Some(frame) = map.frame() {
                    set.insert(frame.clone());
                }
            }
            Term::Lookup(map, key) => {
                map.collect_variables(set);
                key.collect_variables(set);
            }
        }
    }

    /// Whether some variable of this term satisfies `pred`.
    pub fn any_var(&self, pred: &mut dyn FnMut(&Var) -> bool) -> bool {
        match self {
            Term::Var(var) => pred(var),
            Term::Bool(_) | Term::Int(_) => false,
            Term::App(_, args) => args.iter().any(|arg| arg.any_var(pred)),
            Term::Map(map) => {
                map.entries()
                    .iter()
                    .any(|(key, value)| key.any_var(pred) || value.any_var(pred))
                    || map.frame().map_or(false, |frame| pred(frame))
            }
            Term::Lookup(map, key) => map.any_var(pred) || key.any_var(pred),
        }
    }

    /// Check if this term contains no variables (is ground).
    pub fn is_ground(&self) -> bool {
        !self.any_var(&mut |_| true)
    }

    /// Apply a substitution to this term.
    pub fn apply_subst(&self, subst: &Substitution) -> Term {
        subst.apply_to_term(self)
    }

    /// Get the root symbol of this term (function name or constant name).
    /// Returns None for variables, literals, maps and lookups.
    pub fn root_symbol(&self) -> Option<&str> {
        match self {
            Term::App(fn_sym, _) => Some(&fn_sym.name),
            _ => None,
        }
    }

    /// Check if a variable occurs in this term (for occurs check in unification).
    pub fn occurs(&self, var: &Var) -> bool {
        self.any_var(&mut |v| v == var)
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Term::Bool(true))
    }

    /// Arguments of an application, empty for every other term.
    pub fn args(&self) -> &[Term] {
        match self {
            Term::App(_, args) => args,
            _ => &[],
        }
    }

    /// Whether this term applies the given built-in label.
    pub fn is_builtin(&self, label: &str) -> bool {
        match self {
            Term::App(sym, _) => sym.kind == SymbolKind::Function && sym.name == label,
            _ => false,
        }
    }

    /// The two conjuncts of an `_andBool_` term.
    pub fn as_and(&self) -> Option<(&Term, &Term)> {
        match self.args() {
            [left, right] if self.is_builtin(labels::AND) => Some((left, right)),
            _ => None,
        }
    }

    pub fn is_ite(&self) -> bool {
        self.is_builtin(labels::ITE) && self.args().len() == 3
    }

    /// Condition and branches of an if-then-else term.
    pub fn as_ite(&self) -> Option<(&Term, &Term, &Term)> {
        match self.args() {
            [condition, then_branch, else_branch] if self.is_ite() => {
                Some((condition, then_branch, else_branch))
            }
            _ => None,
        }
    }

    /// The leftmost innermost if-then-else subterm.
    pub fn find_innermost_ite(&self) -> Option<&Term> {
        match self {
            Term::App(_, args) => args
                .iter()
                .find_map(Term::find_innermost_ite)
                .or_else(|| if self.is_ite() { Some(self) } else { None }),
            Term::Map(map) => map
                .entries()
                .iter()
                .find_map(|(key, value)| key.find_innermost_ite().or_else(|| value.find_innermost_ite())),
            Term::Lookup(map, key) => map.find_innermost_ite().or_else(|| key.find_innermost_ite()),
            Term::Var(_) | Term::Bool(_) | Term::Int(_) => None,
        }
    }

    /// Whether this term contains an unresolved data-structure lookup.
    pub fn has_lookup(&self) -> bool {
        match self {
            Term::Lookup(_, _) => true,
            Term::App(_, args) => args.iter().any(Term::has_lookup),
            Term::Map(map) => map
                .entries()
                .iter()
                .any(|(key, value)| key.has_lookup() || value.has_lookup()),
            Term::Var(_) | Term::Bool(_) | Term::Int(_) => false,
        }
    }

    /// The sort of this term.
    pub fn sort(&self) -> Sort {
        match self {
            Term::Var(var) => var.sort().clone(),
            Term::Bool(_) => Sort::bool(),
            Term::Int(_) => Sort::int(),
            Term::App(sym, _) => match &sym.result_sort {
                Some(sort) => sort.clone(),
                None => self
                    .as_ite()
                    .map_or_else(Sort::k, |(_, then_branch, _)| then_branch.sort()),
            },
            Term::Map(_) => Sort::map(),
            Term::Lookup(_, _) => Sort::k(),
        }
    }

    /// The constructor-like head of this term, if it has one.
    pub fn head(&self) -> Option<Head<'_>> {
        match self {
            Term::Bool(b) => Some(Head::Bool(*b)),
            Term::Int(i) => Some(Head::Int(*i)),
            Term::App(sym, _) if sym.is_constructor() => {
                Some(Head::Constructor(&sym.name, sym.arity))
            }
            Term::Map(map) => Some(Head::Map(map.concrete_size())),
            _ => None,
        }
    }

    /// Whether the heads of two terms clash (the terms are provably distinct).
    pub fn heads_clash(&self, other: &Term) -> bool {
        match (self.head(), other.head()) {
            (Some(a), Some(b)) => a.clashes_with(&b),
            _ => false,
        }
    }

    /// Whether two terms can never denote the same value: their heads clash,
    /// or they share a constructor head and some pair of arguments is
    /// provably distinct.
    pub fn provably_distinct(&self, other: &Term) -> bool {
        if self.heads_clash(other) {
            return true;
        }
        match (self, other) {
            (Term::App(f, xs), Term::App(g, ys)) if f.is_constructor() && g.is_constructor() => xs
                .iter()
                .zip(ys.iter())
                .any(|(x, y)| x.provably_distinct(y)),
            _ => false,
        }
    }

    /// Rebuild this term with `f` applied to each immediate subterm.
    pub fn map_children(&self, f: &mut dyn FnMut(&Term) -> Term) -> Term {
        match self {
            Term::Var(_) | Term::Bool(_) | Term::Int(_) => self.clone(),
            Term::App(sym, args) => {
                let new_args: Vec<Term> = args.iter().map(|arg| f(arg)).collect();
                Term::App(sym.clone(), Arc::from(new_args))
            }
            Term::Map(map) => map.map_parts(f),
            Term::Lookup(map, key) => Term::lookup(f(map), f(key)),
        }
    }

    /// Replace subterms according to `replacements`.
    ///
    /// A term found in the map is replaced without descending into it;
    /// otherwise its children are rewritten first and the rebuilt term is
    /// looked up again.
    pub fn replace_subterms(&self, replacements: &HashMap<Term, Term>) -> Term {
        if let Some(replacement) = replacements.get(self) {
            return replacement.clone();
        }
        if matches!(self, Term::Var(_) | Term::Bool(_) | Term::Int(_)) {
            return self.clone();
        }
        let rebuilt = self.map_children(&mut |child| child.replace_subterms(replacements));
        match replacements.get(&rebuilt) {
            Some(replacement) => replacement.clone(),
            None => rebuilt,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(var) => write!(f, "{}", var),
            Term::Bool(b) => write!(f, "{}", b),
            Term::Int(i) => write!(f, "{}", i),
            Term::App(fn_sym, args) => {
                if args.is_empty() {
                    // Constant (0-ary function)
                    write!(f, "{}", fn_sym.name)
                } else {
                    // Function application in S-expression format
                    write!(f, "({}", fn_sym.name)?;
                    for arg in args.iter() {
                        write!(f, " {}", arg)?;
                    }
                    write!(f, ")")
                }
            }
            Term::Map(map) => {
                if map.entries().is_empty() && map.frame().is_none() {
                    return write!(f, ".Map");
                }
                write!(f, "{{")?;
                let mut first = true;
                for (key, value) in map.entries() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{} |-> {}", key, value)?;
                }
                if let Some(frame) = map.frame() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "..{}", frame)?;
                }
                write!(f, "}}")
            }
            Term::Lookup(map, key) => write!(f, "{}[{}]", map, key),
        }
    }
}
