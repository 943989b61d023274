//! Syntax types: sorts, variables, terms and the built-in labels.

pub mod labels;
mod sort;
mod term;

pub use sort::{Sort, SortOracle, Subsorts};
pub use term::{FnSym, Head, MapTerm, SymbolKind, Term, Var};
