//! Convergence report: one entry per attempted or skipped step.
use std::fmt;

use serde::Serialize;

use crate::gateway::Outcome;
use crate::logging::PassStatus;

/// The three passes of a convergence run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Groups and users.
    Identity,
    /// Directory creation, ownership and permissions.
    Directories,
    /// Privileged employee group memberships.
    Privileges,
}

impl Pass {
    /// Every pass, in execution order.
    pub const ALL: [Self; 3] = [Self::Identity, Self::Directories, Self::Privileges];
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identity => "Identity",
            Self::Directories => "Directories",
            Self::Privileges => "Privileges",
        })
    }
}

/// Kind of step recorded in a [`ConvergenceReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Ensure a role group exists.
    CreateGroup,
    /// Ensure an employee user exists in its role group.
    CreateUser,
    /// Ensure a company directory exists.
    CreateDirectory,
    /// Find the employee owning a directory.  Only recorded when no employee
    /// holds the directory's role.
    ResolveOwner,
    /// Ensure directory ownership.
    SetOwnership,
    /// Ensure directory permission bits.
    SetPermissionMode,
    /// Ensure the privileged employee belongs to a role group.
    AddGroupMember,
}

impl StepKind {
    /// The pass this step belongs to.
    #[must_use]
    pub const fn pass(self) -> Pass {
        match self {
            Self::CreateGroup | Self::CreateUser => Pass::Identity,
            Self::CreateDirectory
            | Self::ResolveOwner
            | Self::SetOwnership
            | Self::SetPermissionMode => Pass::Directories,
            Self::AddGroupMember => Pass::Privileges,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateGroup => "group",
            Self::CreateUser => "user",
            Self::CreateDirectory => "directory",
            Self::ResolveOwner => "owner",
            Self::SetOwnership => "ownership",
            Self::SetPermissionMode => "mode",
            Self::AddGroupMember => "membership",
        })
    }
}

/// One step of a convergence run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// What was attempted.
    pub kind: StepKind,
    /// What it was attempted on: a group name for group and membership
    /// steps, a user name for user steps, a path for directory steps.
    pub subject: String,
    /// Extra context, e.g. `Julius:Legal` for ownership or `770` for modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// How it went.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ReportEntry {
    /// Human-readable one-line rendering of the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use provision_cli::engine::{ReportEntry, StepKind};
    /// use provision_cli::gateway::Outcome;
    ///
    /// let entry = ReportEntry {
    ///     kind: StepKind::SetPermissionMode,
    ///     subject: "/srv/Legal".to_string(),
    ///     target: Some("770".to_string()),
    ///     outcome: Outcome::Applied,
    /// };
    /// assert_eq!(entry.detail(), "mode /srv/Legal -> 770: applied");
    /// ```
    #[must_use]
    pub fn detail(&self) -> String {
        let target = self
            .target
            .as_ref()
            .map_or_else(String::new, |t| format!(" -> {t}"));
        let status = match &self.outcome {
            Outcome::Applied => "applied".to_string(),
            Outcome::AlreadySatisfied => "already ok".to_string(),
            Outcome::Skipped { reason } => format!("skipped: {reason}"),
            Outcome::Failed { error } => format!("failed: {error}"),
        };
        format!("{} {}{target}: {status}", self.kind, self.subject)
    }
}

/// Step counters for one pass or a whole run.
///
/// # Examples
///
/// ```
/// use provision_cli::engine::PassStats;
///
/// let stats = PassStats { changed: 5, already_ok: 12, skipped: 0, failed: 0 };
/// assert_eq!(stats.summary(), "5 changed, 12 already ok");
///
/// let stats = PassStats { changed: 0, already_ok: 3, skipped: 1, failed: 2 };
/// assert_eq!(stats.summary(), "0 changed, 3 already ok, 1 skipped, 2 failed");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Steps that changed the host.
    pub changed: u32,
    /// Steps whose desired state was already present.
    pub already_ok: u32,
    /// Steps that were not attempted.
    pub skipped: u32,
    /// Steps that failed.
    pub failed: u32,
}

impl PassStats {
    fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Applied => self.changed += 1,
            Outcome::AlreadySatisfied => self.already_ok += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!("{} changed, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            summary.push_str(&format!(", {} failed", self.failed));
        }
        summary
    }

    /// Overall status for the run summary.
    #[must_use]
    pub const fn status(&self) -> PassStatus {
        if self.failed > 0 {
            PassStatus::Failed
        } else if self.skipped > 0 {
            PassStatus::Skipped
        } else {
            PassStatus::Ok
        }
    }
}

/// Ordered record of every step of a convergence run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvergenceReport {
    entries: Vec<ReportEntry>,
}

impl ConvergenceReport {
    pub(crate) fn record(
        &mut self,
        kind: StepKind,
        subject: impl Into<String>,
        target: Option<String>,
        outcome: Outcome,
    ) {
        self.entries.push(ReportEntry {
            kind,
            subject: subject.into(),
            target,
            outcome,
        });
    }

    /// All entries in execution order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Entries whose outcome is [`Outcome::Failed`].
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }

    /// Whether any step failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Whether the host already matched: no step changed or failed.
    /// Ownership skips for unheld roles repeat on every run and are allowed.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.entries.iter().all(|e| match &e.outcome {
            Outcome::AlreadySatisfied | Outcome::Skipped { .. } => true,
            Outcome::Applied | Outcome::Failed { .. } => false,
        })
    }

    /// Entries about `subject`, in execution order.
    pub fn entries_for<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a ReportEntry> {
        self.entries.iter().filter(move |e| e.subject == subject)
    }

    /// Counters over the whole run.
    #[must_use]
    pub fn stats(&self) -> PassStats {
        let mut stats = PassStats::default();
        for entry in &self.entries {
            stats.count(&entry.outcome);
        }
        stats
    }

    /// Counters over one pass.
    #[must_use]
    pub fn stats_for(&self, pass: Pass) -> PassStats {
        let mut stats = PassStats::default();
        for entry in self.entries.iter().filter(|e| e.kind.pass() == pass) {
            stats.count(&entry.outcome);
        }
        stats
    }
}
