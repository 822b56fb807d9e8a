//! Core logging types: pass entries, status, and the [`Log`] trait.

/// Convergence pass result for summary reporting.
#[derive(Debug, Clone)]
pub struct PassEntry {
    /// Human-readable pass name.
    pub name: String,
    /// Final status of the pass.
    pub status: PassStatus,
    /// Optional detail message (usually the pass counts).
    pub message: Option<String>,
}

/// Status of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// Every step succeeded.
    Ok,
    /// No step failed, but at least one was skipped.
    Skipped,
    /// At least one step failed.
    Failed,
}

impl PassStatus {
    /// Summary icon and its ANSI colour.
    #[must_use]
    pub const fn icon(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// Abstraction over logging backends.
///
/// The convergence engine logs through this trait so that it can run against
/// the console [`Logger`](super::logger::Logger) or a recording test double.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a pass result for the summary.
    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>);
}
