//! The immutable bundle of collaborators and options shared by constraints.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::eval::{BuiltinEvaluator, TermEvaluator};
use crate::options::{ConstraintOptions, SmtBackend};
use crate::smt::{NoSolver, SmtSolver, Z3Solver};
use crate::syntax::{SortOracle, Subsorts};
use crate::unify::{SyntacticUnifier, Unifier};

/// Everything a constraint consults besides its own state.
///
/// Built once and shared through an `Arc` by every constraint created from it.
pub struct Context {
    evaluator: Box<dyn TermEvaluator>,
    unifier: Box<dyn Unifier>,
    sorts: Box<dyn SortOracle>,
    smt: Box<dyn SmtSolver>,
    options: ConstraintOptions,
}

impl Context {
    pub fn new(options: ConstraintOptions) -> Arc<Self> {
        Context::builder(options).build()
    }

    /// Built-in collaborators and default options.
    pub fn with_defaults() -> Arc<Self> {
        Context::new(ConstraintOptions::default())
    }

    pub fn builder(options: ConstraintOptions) -> ContextBuilder {
        ContextBuilder {
            options,
            evaluator: None,
            unifier: None,
            sorts: None,
            smt: None,
        }
    }

    pub fn evaluator(&self) -> &dyn TermEvaluator {
        self.evaluator.as_ref()
    }

    pub fn unifier(&self) -> &dyn Unifier {
        self.unifier.as_ref()
    }

    pub fn sorts(&self) -> &dyn SortOracle {
        self.sorts.as_ref()
    }

    pub fn smt(&self) -> &dyn SmtSolver {
        self.smt.as_ref()
    }

    pub fn options(&self) -> &ConstraintOptions {
        &self.options
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Context`]. Collaborators left unset get the built-in ones;
/// the SMT solver defaults to the backend selected in the options.
pub struct ContextBuilder {
    options: ConstraintOptions,
    evaluator: Option<Box<dyn TermEvaluator>>,
    unifier: Option<Box<dyn Unifier>>,
    sorts: Option<Box<dyn SortOracle>>,
    smt: Option<Box<dyn SmtSolver>>,
}

impl ContextBuilder {
    pub fn evaluator(mut self, evaluator: impl TermEvaluator + 'static) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn unifier(mut self, unifier: impl Unifier + 'static) -> Self {
        self.unifier = Some(Box::new(unifier));
        self
    }

    pub fn sorts(mut self, sorts: impl SortOracle + 'static) -> Self {
        self.sorts = Some(Box::new(sorts));
        self
    }

    pub fn smt(mut self, smt: impl SmtSolver + 'static) -> Self {
        self.smt = Some(Box::new(smt));
        self
    }

    pub fn build(self) -> Arc<Context> {
        let smt: Box<dyn SmtSolver> = match (self.smt, self.options.smt) {
            (Some(smt), _) => smt,
            (None, SmtBackend::None) => Box::new(NoSolver),
            (None, SmtBackend::Z3) => {
                let path = self
                    .options
                    .z3_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("z3"));
                Box::new(Z3Solver::new(path))
            }
        };
        Arc::new(Context {
            evaluator: self.evaluator.unwrap_or_else(|| Box::new(BuiltinEvaluator)),
            unifier: self.unifier.unwrap_or_else(|| Box::new(SyntacticUnifier)),
            sorts: self.sorts.unwrap_or_else(|| Box::new(Subsorts::new())),
            smt,
            options: self.options,
        })
    }
}
