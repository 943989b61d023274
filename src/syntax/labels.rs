//! Labels of the built-in function symbols understood by the evaluator,
//! the SMT translation and the implication prover.

use super::Sort;

pub const AND: &str = "_andBool_";
pub const OR: &str = "_orBool_";
pub const NOT: &str = "notBool_";
pub const EQ: &str = "_==K_";
pub const PLUS: &str = "_+Int_";
pub const MINUS: &str = "_-Int_";
pub const TIMES: &str = "_*Int_";
pub const LT: &str = "_<Int_";
pub const LE: &str = "_<=Int_";
pub const GT: &str = "_>Int_";
pub const GE: &str = "_>=Int_";
pub const ITE: &str = "#if_#then_#else_#fi";

/// Result sort of a built-in label. `None` for unknown labels and for
/// if-then-else, whose sort is that of its branches.
pub fn result_sort(label: &str) -> Option<Sort> {
    match label {
        AND | OR | NOT | EQ | LT | LE | GT | GE => Some(Sort::bool()),
        PLUS | MINUS | TIMES => Some(Sort::int()),
        _ => None,
    }
}

pub fn is_builtin(label: &str) -> bool {
    label == ITE || result_sort(label).is_some()
}
