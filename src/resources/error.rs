//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Resources return these variants
//! wrapped in [`anyhow::Error`]; the system gateway downcasts them to decide
//! how a failed step is reported.

use thiserror::Error;

use crate::exec::ExecResult;

/// Lower-cased stderr fragments that indicate missing privileges.
const PRIVILEGE_MARKERS: &[&str] = &[
    "permission denied",
    "operation not permitted",
    "cannot lock",
    "only root",
    "password is required",
    "not in the sudoers",
];

/// Programs from the shadow suite whose exit codes 1 and 10 mean
/// "cannot update the password/group file".
const SHADOW_TOOLS: &[&str] = &["groupadd", "useradd", "usermod"];

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// An operation was denied due to insufficient privileges.
    #[error("permission denied running '{program}': {detail}")]
    PermissionDenied {
        /// Program that was denied.
        program: String,
        /// Captured error detail.
        detail: String,
    },
}

impl ResourceError {
    /// Classify a failed command result.
    ///
    /// Shadow-suite "cannot update file" exit codes and well-known privilege
    /// messages map to [`ResourceError::PermissionDenied`]; everything else
    /// is [`ResourceError::ExecutionFailed`].
    #[must_use]
    pub fn from_exec(program: &str, result: &ExecResult) -> Self {
        let exit_code = result.code.unwrap_or(-1);
        let stderr = result.stderr.trim().to_string();
        let lowered = stderr.to_lowercase();

        let shadow_privilege = SHADOW_TOOLS.contains(&program) && matches!(exit_code, 1 | 10);
        if shadow_privilege || PRIVILEGE_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Self::PermissionDenied {
                program: program.to_string(),
                detail: if stderr.is_empty() {
                    format!("exit {exit_code}")
                } else {
                    stderr
                },
            };
        }

        Self::ExecutionFailed {
            program: program.to_string(),
            exit_code,
            stderr,
        }
    }

    /// Whether this error means the process lacked the needed privileges.
    #[must_use]
    pub const fn is_privilege_error(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
