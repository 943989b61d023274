//! Translation of constraints to SMT-LIB 2 scripts over integers and
//! booleans.

use std::collections::HashSet;
use std::fmt::Write as _;

use indexmap::IndexMap;

use super::{SmtError, SmtResult};
use crate::constraint::Constraint;
use crate::syntax::{labels, Sort, Term, Var};

/// A script whose `check-sat` answers `unsat` exactly when `constraint` is
/// unsatisfiable.
pub fn translate_constraint(constraint: &Constraint) -> SmtResult<String> {
    let mut translator = Translator::default();
    let formula = translator.constraint(constraint)?;

    let mut script = String::new();
    translator.declare(&mut script, |_| true);
    let _ = writeln!(script, "(assert {})", formula);
    script.push_str("(check-sat)\n");
    Ok(script)
}

/// A script whose `check-sat` answers `unsat` exactly when `left` implies
/// `exists right_only . right`.
///
/// Variables of `right_only` that also occur in `left` are shared with it
/// rather than quantified.
pub fn translate_implication(
    left: &Constraint,
    right: &Constraint,
    right_only: &HashSet<Var>,
) -> SmtResult<String> {
    let mut translator = Translator::default();
    let premise = translator.constraint(left)?;
    let shared: HashSet<Var> = translator.declarations.keys().cloned().collect();
    let conclusion = translator.constraint(right)?;

    let quantified = |var: &Var| right_only.contains(var) && !shared.contains(var);
    let binders: Vec<String> = translator
        .declarations
        .iter()
        .filter(|&(var, _)| quantified(var))
        .map(|(_, declaration)| format!("({} {})", declaration.symbol, declaration.sort))
        .collect();

    let mut script = String::new();
    translator.declare(&mut script, |var| !quantified(var));
    let _ = writeln!(script, "(assert {})", premise);
    if binders.is_empty() {
        let _ = writeln!(script, "(assert (not {}))", conclusion);
    } else {
        let _ = writeln!(
            script,
            "(assert (not (exists ({}) {})))",
            binders.join(" "),
            conclusion
        );
    }
    script.push_str("(check-sat)\n");
    Ok(script)
}

/// The SMT constant standing for one variable.
struct Declaration {
    symbol: String,
    sort: &'static str,
}

#[derive(Default)]
struct Translator {
    declarations: IndexMap<Var, Declaration>,
}

impl Translator {
    fn declare(&self, script: &mut String, include: impl Fn(&Var) -> bool) {
        for (var, declaration) in &self.declarations {
            if include(var) {
                let _ = writeln!(
                    script,
                    "(declare-const {} {})",
                    declaration.symbol, declaration.sort
                );
            }
        }
    }

    fn constraint(&mut self, constraint: &Constraint) -> SmtResult<String> {
        if constraint.is_false() {
            return Ok("false".to_string());
        }
        let mut conjuncts = Vec::new();
        for equality in constraint.equalities() {
            conjuncts.push(self.equation(equality.left(), equality.right())?);
        }
        for (var, term) in constraint.substitution().bindings() {
            conjuncts.push(self.equation(&Term::Var(var.clone()), term)?);
        }
        for disjunction in constraint.multi_constraints() {
            let alternatives = disjunction
                .alternatives()
                .iter()
                .map(|alternative| self.constraint(alternative))
                .collect::<SmtResult<Vec<_>>>()?;
            conjuncts.push(apply("or", &alternatives, "false"));
        }
        Ok(apply("and", &conjuncts, "true"))
    }

    fn equation(&mut self, left: &Term, right: &Term) -> SmtResult<String> {
        Ok(format!("(= {} {})", self.term(left)?, self.term(right)?))
    }

    fn term(&mut self, term: &Term) -> SmtResult<String> {
        match term {
            Term::Var(var) => self.var(var),
            Term::Bool(value) => Ok(value.to_string()),
            Term::Int(value) if *value < 0 => Ok(format!("(- {})", value.unsigned_abs())),
            Term::Int(value) => Ok(value.to_string()),
            Term::App(sym, args) if !sym.is_constructor() => {
                let operator = operator(&sym.name).ok_or_else(|| {
                    SmtError::Untranslatable(format!("function {}", sym.name))
                })?;
                let args = args
                    .iter()
                    .map(|arg| self.term(arg))
                    .collect::<SmtResult<Vec<_>>>()?;
                Ok(format!("({} {})", operator, args.join(" ")))
            }
            _ => Err(SmtError::Untranslatable(term.to_string())),
        }
    }

    fn var(&mut self, var: &Var) -> SmtResult<String> {
        let sort = if *var.sort() == Sort::int() {
            "Int"
        } else if *var.sort() == Sort::bool() {
            "Bool"
        } else {
            return Err(SmtError::Untranslatable(format!("{} : {}", var, var.sort())));
        };
        if var.name().contains(['|', '\\']) {
            return Err(SmtError::Untranslatable(format!("variable name {}", var.name())));
        }
        if let Some(declaration) = self.declarations.get(var) {
            return Ok(declaration.symbol.clone());
        }
        let symbol = self.fresh_symbol(var.name());
        self.declarations.insert(
            var.clone(),
            Declaration {
                symbol: symbol.clone(),
                sort,
            },
        );
        Ok(symbol)
    }

    /// `|name|`, suffixed when a variable of another sort already took it.
    fn fresh_symbol(&self, name: &str) -> String {
        let taken = |symbol: &str| self.declarations.values().any(|d| d.symbol == symbol);
        let mut symbol = format!("|{}|", name);
        let mut index = 0;
        while taken(&symbol) {
            index += 1;
            symbol = format!("|{}~{}|", name, index);
        }
        symbol
    }
}

fn operator(label: &str) -> Option<&'static str> {
    Some(match label {
        labels::AND => "and",
        labels::OR => "or",
        labels::NOT => "not",
        labels::EQ => "=",
        labels::PLUS => "+",
        labels::MINUS => "-",
        labels::TIMES => "*",
        labels::LT => "<",
        labels::LE => "<=",
        labels::GT => ">",
        labels::GE => ">=",
        labels::ITE => "ite",
        _ => return None,
    })
}

fn apply(operator: &str, operands: &[String], unit: &str) -> String {
    match operands {
        [] => unit.to_string(),
        [single] => single.clone(),
        _ => format!("({} {})", operator, operands.join(" ")),
    }
}
