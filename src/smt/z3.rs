//! Z3 run as an external process fed SMT-LIB 2 on standard input.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use super::{translate_constraint, translate_implication, SmtError, SmtResult, SmtSolver};
use crate::constraint::Constraint;
use crate::syntax::Var;

/// Slack past z3's own `-t` limit before the process is killed.
const KILL_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Sat,
    Unsat,
    Unknown,
}

/// A `z3` executable.
#[derive(Debug, Clone)]
pub struct Z3Solver {
    path: PathBuf,
}

impl Z3Solver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Z3Solver { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run(&self, script: &str, timeout: Duration) -> SmtResult<Answer> {
        let mut child = Command::new(&self.path)
            .arg("-in")
            .arg("-smt2")
            .arg(format!("-t:{}", timeout.as_millis()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes())?;
        }
        let deadline = timeout + KILL_GRACE;
        let output = match child.wait_timeout(deadline)? {
            Some(_) => child.wait_with_output()?,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SmtError::Timeout(deadline));
            }
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("z3 stdout: {}", stdout.trim());
        parse_answer(&stdout)
    }

    /// Whether `script` is proved unsatisfiable; every failure is "no".
    fn proves_unsat(&self, script: SmtResult<String>, timeout: Duration) -> bool {
        let result = script.and_then(|script| self.run(&script, timeout));
        match result {
            Ok(answer) => answer == Answer::Unsat,
            Err(SmtError::Untranslatable(reason)) => {
                warn!("not sent to z3: {}", reason);
                false
            }
            Err(err) => {
                warn!("z3 query failed: {}", err);
                false
            }
        }
    }
}

impl SmtSolver for Z3Solver {
    fn check_unsat(&self, constraint: &Constraint, timeout: Duration) -> bool {
        self.proves_unsat(translate_constraint(constraint), timeout)
    }

    fn check_implication(
        &self,
        left: &Constraint,
        right: &Constraint,
        right_only: &HashSet<Var>,
        timeout: Duration,
    ) -> bool {
        self.proves_unsat(translate_implication(left, right, right_only), timeout)
    }
}

fn parse_answer(stdout: &str) -> SmtResult<Answer> {
    for line in stdout.lines() {
        match line.trim() {
            "unsat" => return Ok(Answer::Unsat),
            "sat" => return Ok(Answer::Sat),
            "unknown" | "timeout" => return Ok(Answer::Unknown),
            _ => {}
        }
    }
    Err(SmtError::Solver(
        stdout.lines().take(3).collect::<Vec<_>>().join("; "),
    ))
}
