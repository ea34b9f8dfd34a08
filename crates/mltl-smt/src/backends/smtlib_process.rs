use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use thiserror::Error;

use crate::backends::smtlib_printer::{quote_symbol, to_smtlib};
use crate::solver::{SatResult, SmtSolver};
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum SmtLibProcessError {
    #[error("solver I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("solver not found: {0}")]
    NotFound(String),
    #[error("solver error: {0}")]
    SolverError(String),
}

/// Any SMT-LIB2 solver driven interactively over stdin/stdout.
///
/// The process must answer `(check-sat)` with one line and stay silent on
/// declarations and assertions (the default for z3 and cvc5).
pub struct SmtLibProcess {
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: Option<BufReader<ChildStderr>>,
    /// `set-option` keyword taking a per-query limit in milliseconds.
    limit_option: Option<&'static str>,
    limit_ms: Option<u64>,
}

/// How long a dropped process may take to honour `(exit)` before it is killed.
const EXIT_GRACE: Duration = Duration::from_millis(500);
const EXIT_POLL: Duration = Duration::from_millis(10);

impl SmtLibProcess {
    /// `z3 -in`, with a per-query limit when `timeout_secs > 0`.
    pub fn z3(timeout_secs: u64) -> Result<Self, SmtLibProcessError> {
        let mut args = vec!["-in".to_string(), "-smt2".to_string()];
        if timeout_secs > 0 {
            args.push(format!("-t:{}", timeout_secs.saturating_mul(1000)));
        }
        let mut solver = Self::with_command("z3", &args)?;
        solver.limit_option = Some(":timeout");
        Ok(solver)
    }

    /// `cvc5 --lang smt2 --incremental`, with a per-query limit when
    /// `timeout_secs > 0`.
    pub fn cvc5(timeout_secs: u64) -> Result<Self, SmtLibProcessError> {
        let mut args = vec![
            "--lang".to_string(),
            "smt2".to_string(),
            "--incremental".to_string(),
        ];
        if timeout_secs > 0 {
            args.push(format!("--tlimit-per={}", timeout_secs.saturating_mul(1000)));
        }
        let mut solver = Self::with_command("cvc5", &args)?;
        solver.limit_option = Some(":tlimit-per");
        Ok(solver)
    }

    pub fn with_command(program: &str, args: &[String]) -> Result<Self, SmtLibProcessError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SmtLibProcessError::NotFound(format!("{program}: {e}")))?;

        let stdin = child.stdin.take().ok_or_else(|| {
            SmtLibProcessError::SolverError(format!("failed to capture {program} stdin"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            SmtLibProcessError::SolverError(format!("failed to capture {program} stdout"))
        })?;
        let stderr = child.stderr.take().map(BufReader::new);

        let mut solver = Self {
            program: program.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr,
            limit_option: None,
            limit_ms: None,
        };
        tracing::debug!(program, ?args, "spawned SMT-LIB solver process");
        solver.send_command_no_response("(set-logic QF_UF)")?;
        Ok(solver)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn send_command(&mut self, cmd: &str) -> Result<String, SmtLibProcessError> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;

        let mut response = String::new();
        self.stdout.read_line(&mut response)?;
        if response.is_empty() {
            let stderr = self.drain_stderr();
            return Err(SmtLibProcessError::SolverError(format!(
                "No response from {} for command `{cmd}`. stderr: {}",
                self.program,
                stderr.trim()
            )));
        }
        Ok(response.trim_end().to_string())
    }

    fn send_command_no_response(&mut self, cmd: &str) -> Result<(), SmtLibProcessError> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn send_limit(&mut self) -> Result<(), SmtLibProcessError> {
        if let (Some(option), Some(ms)) = (self.limit_option, self.limit_ms) {
            self.send_command_no_response(&format!("(set-option {option} {ms})"))?;
        }
        Ok(())
    }

    /// Only called once stdout hit EOF, so the process is gone and reading
    /// stderr to the end cannot block.
    fn drain_stderr(&mut self) -> String {
        let mut text = String::new();
        if let Some(mut stderr) = self.stderr.take() {
            let _ = stderr.read_to_string(&mut text);
        }
        text
    }
}

impl Drop for SmtLibProcess {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "(exit)");
        let _ = self.stdin.flush();
        let mut waited = Duration::ZERO;
        while waited < EXIT_GRACE {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => {
                    std::thread::sleep(EXIT_POLL);
                    waited += EXIT_POLL;
                }
                Err(_) => break,
            }
        }
        tracing::debug!(program = %self.program, "solver did not exit; killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl SmtSolver for SmtLibProcess {
    type Error = SmtLibProcessError;

    fn backend_name(&self) -> &'static str {
        "smtlib-process"
    }

    fn declare_bool(&mut self, name: &str) -> Result<(), SmtLibProcessError> {
        self.send_command_no_response(&format!("(declare-const {} Bool)", quote_symbol(name)))
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), SmtLibProcessError> {
        self.send_command_no_response(&format!("(assert {})", to_smtlib(term)))
    }

    fn check_sat(&mut self) -> Result<SatResult, SmtLibProcessError> {
        let response = self.send_command("(check-sat)")?;
        parse_check_sat_response(&self.program, &response)
    }

    fn reset(&mut self) -> Result<(), SmtLibProcessError> {
        self.send_command_no_response("(reset)")?;
        self.send_limit()?;
        self.send_command_no_response("(set-logic QF_UF)")?;
        Ok(())
    }

    fn set_timeout_secs(&mut self, secs: u64) -> Result<(), SmtLibProcessError> {
        self.limit_ms = (secs > 0).then(|| secs.saturating_mul(1000));
        if self.limit_option.is_none() {
            tracing::debug!(program = %self.program, "no per-query limit option for this solver");
        }
        self.send_limit()
    }
}

fn parse_check_sat_response(program: &str, response: &str) -> Result<SatResult, SmtLibProcessError> {
    match response.trim() {
        "sat" => Ok(SatResult::Sat),
        "unsat" => Ok(SatResult::Unsat),
        "unknown" | "timeout" => Ok(SatResult::Unknown(format!("{program} returned {response}"))),
        other => Err(SmtLibProcessError::SolverError(other.to_string())),
    }
}
