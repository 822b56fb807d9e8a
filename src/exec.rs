//! External command execution behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs on behalf of host resources.
///
/// Resources never spawn processes directly; they go through this trait so
/// that unit tests can substitute canned results.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns the result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;

        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// [`Executor`] wrapper that runs every command through `sudo`.
///
/// Lookups via [`Executor::which`] are forwarded unchanged so that tool
/// checks see the real program name.
#[derive(Debug)]
pub struct SudoExecutor<'a> {
    inner: &'a dyn Executor,
}

impl<'a> SudoExecutor<'a> {
    /// Wrap `inner` so that every command is prefixed with `sudo`.
    #[must_use]
    pub const fn new(inner: &'a dyn Executor) -> Self {
        Self { inner }
    }

    fn prefixed<'b>(program: &'b str, args: &[&'b str]) -> Vec<&'b str> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(program);
        full.extend_from_slice(args);
        full
    }
}

impl Executor for SudoExecutor<'_> {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.inner.run("sudo", &Self::prefixed(program, args))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.inner.run_unchecked("sudo", &Self::prefixed(program, args))
    }

    fn which(&self, program: &str) -> bool {
        self.inner.which(program)
    }
}
