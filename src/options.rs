//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which external decision procedure discharges residual obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtBackend {
    /// No solver: every query answers "cannot decide".
    #[default]
    None,
    /// An external `z3` process.
    Z3,
}

/// Options fixed for the lifetime of a [`Context`](crate::context::Context).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintOptions {
    pub smt: SmtBackend,
    /// Path of the `z3` executable; looked up on `PATH` when absent.
    pub z3_path: Option<PathBuf>,
    /// Timeout for satisfiability checks of a single constraint.
    pub constraint_timeout_ms: u64,
    /// Timeout for each residual implication obligation.
    pub implication_timeout_ms: u64,
    /// Log implication-proof progress.
    pub debug: bool,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        ConstraintOptions {
            smt: SmtBackend::None,
            z3_path: None,
            constraint_timeout_ms: 50,
            implication_timeout_ms: 500,
            debug: false,
        }
    }
}

impl ConstraintOptions {
    /// Parse options from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn constraint_timeout(&self) -> Duration {
        Duration::from_millis(self.constraint_timeout_ms)
    }

    pub fn implication_timeout(&self) -> Duration {
        Duration::from_millis(self.implication_timeout_ms)
    }
}
