//! Structured logger with pass summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{Log, PassEntry, PassStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// [`Log`] backed by [`tracing`] that remembers each pass for the summary.
///
/// Every message also lands in the run log of the command (see
/// [`LOG_DIR_ENV_VAR`](super::LOG_DIR_ENV_VAR)), debug lines included.
#[derive(Debug)]
pub struct Logger {
    passes: Mutex<Vec<PassEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            passes: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded pass entries (test-only).
    #[cfg(test)]
    pub(crate) fn pass_entries(&self) -> Vec<PassEntry> {
        self.passes.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a pass result for the summary.
    pub fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.passes.lock() {
            guard.push(PassEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return `true` if any recorded pass has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.passes
            .lock()
            .is_ok_and(|guard| guard.iter().any(|p| p.status == PassStatus::Failed))
    }

    /// Print the summary of all recorded passes.
    pub fn print_summary(&self) {
        let passes = match self.passes.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if passes.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        for pass in &passes {
            let (icon, colour) = pass.status.icon();
            let suffix = pass
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{colour}{icon} {}{suffix}\x1b[0m", pass.name));
        }

        let failed = passes
            .iter()
            .filter(|p| p.status == PassStatus::Failed)
            .count();
        if failed > 0 {
            self.error(&format!("{failed} of {} passes had failures", passes.len()));
        }

        if let Some(path) = &self.log_file {
            println!();
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
        self.record_pass(name, status, message);
    }
}
