//! Step outcomes: success, no-op, skip, or failure.
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::registry::RoleId;

/// Why a step failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepFailure {
    /// The host refused the change for lack of privileges.
    #[error("privilege denied: {detail}")]
    PrivilegeDenied {
        /// Error detail reported by the host.
        detail: String,
    },

    /// An external command failed for any other reason (invalid name,
    /// unknown group, I/O error reported by the tool, …).
    #[error("command failed: {detail}")]
    ExternalCommandFailure {
        /// Error detail reported by the host.
        detail: String,
    },

    /// A directory could not be created.
    #[error("cannot create {path}: {detail}")]
    PathCreationFailure {
        /// Directory that could not be created.
        path: String,
        /// Error detail reported by the host.
        detail: String,
    },

    /// The target of the step is unusable (missing path, unknown user).
    #[error("invalid target: {reason}")]
    InvalidTarget {
        /// Why the target is unusable.
        reason: String,
    },
}

/// Why a step was not attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No employee holds the role that owns the directory.
    TargetMissingForOwnership {
        /// The role nobody holds.
        role: RoleId,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetMissingForOwnership { role } => {
                write!(f, "no employee holds role {role}; ownership not assigned")
            }
        }
    }
}

/// Result of one provisioning step.
///
/// Gateways only produce [`Outcome::Applied`], [`Outcome::AlreadySatisfied`]
/// and [`Outcome::Failed`]; [`Outcome::Skipped`] is recorded by the engine.
///
/// # Examples
///
/// ```
/// use provision_cli::gateway::Outcome;
///
/// assert!(Outcome::Applied.success());
/// assert!(Outcome::AlreadySatisfied.success());
/// assert!(Outcome::AlreadySatisfied.already_satisfied());
/// assert!(!Outcome::Applied.already_satisfied());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The host was changed.
    Applied,
    /// The host already matched; nothing was changed.
    AlreadySatisfied,
    /// The step was not attempted.
    Skipped {
        /// Why the step was skipped.
        reason: SkipReason,
    },
    /// The step was attempted and failed.
    Failed {
        /// What went wrong.
        error: StepFailure,
    },
}

impl Outcome {
    /// Shorthand for [`Outcome::Failed`].
    #[must_use]
    pub const fn failed(error: StepFailure) -> Self {
        Self::Failed { error }
    }

    /// Shorthand for [`Outcome::Skipped`].
    #[must_use]
    pub const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// Whether the host now matches the desired state for this step.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Applied | Self::AlreadySatisfied)
    }

    /// Whether the desired state was already present.
    #[must_use]
    pub const fn already_satisfied(&self) -> bool {
        matches!(self, Self::AlreadySatisfied)
    }

    /// Whether the step genuinely failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Human-readable error or skip detail, if any.
    #[must_use]
    pub fn error_detail(&self) -> Option<String> {
        match self {
            Self::Applied | Self::AlreadySatisfied => None,
            Self::Skipped { reason } => Some(reason.to_string()),
            Self::Failed { error } => Some(error.to_string()),
        }
    }
}
