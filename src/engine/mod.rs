//! Convergence engine: drives the host towards the role registry.
//!
//! A run is three sequential passes over the [`RoleRegistry`]:
//!
//! 1. **Identity**: every role group and every employee user.
//! 2. **Directories**: every company directory with its owner and
//!    permission tier.
//! 3. **Privileges**: the privileged employee joins every directory role
//!    group except the administrator's.
//!
//! No step aborts the run.  Every request to the [`IdentityGateway`] is
//! recorded in the returned [`ConvergenceReport`], so the caller decides what
//! a failure means.
mod directories;
mod identity;
mod privileges;
mod report;

use std::path::{Component, Path, PathBuf};

use crate::gateway::{IdentityGateway, Outcome};
use crate::logging::Log;
use crate::policy::PrivilegedIdentity;
use crate::registry::{RoleId, RoleRegistry};

pub use directories::{ProvisionedDirectory, plan};
pub use report::{ConvergenceReport, Pass, PassStats, ReportEntry, StepKind};

/// Host-independent settings of a convergence run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Absolute directory under which company directories are created.
    pub company_root: PathBuf,
    /// Employee granted cross-role membership and the elevated tier.
    pub privileged: PrivilegedIdentity,
    /// Role whose group the privileged employee is never added to.
    pub admin_role: RoleId,
}

impl EngineSettings {
    /// Path of the company directory named `directory_name`, or `None` when
    /// the name would not resolve to a direct child of the company root.
    #[must_use]
    pub fn directory_path(&self, directory_name: &str) -> Option<PathBuf> {
        is_single_component(directory_name).then(|| self.company_root.join(directory_name))
    }
}

/// Whether `name` is exactly one normal path component: not empty, no
/// separator, not `.` or `..`, not absolute.
///
/// # Examples
///
/// ```
/// use provision_cli::engine::is_single_component;
///
/// assert!(is_single_component("Employee-Data"));
/// assert!(!is_single_component("/etc"));
/// assert!(!is_single_component(".."));
/// assert!(!is_single_component(""));
/// ```
#[must_use]
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains('/')
        && matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
}

/// State shared by the passes of one run.
struct Run<'a> {
    settings: &'a EngineSettings,
    registry: &'a RoleRegistry,
    gateway: &'a dyn IdentityGateway,
    log: &'a dyn Log,
    report: ConvergenceReport,
}

impl Run<'_> {
    /// Log a step at a level matching its outcome, then record it.
    fn record(
        &mut self,
        kind: StepKind,
        subject: impl Into<String>,
        target: Option<String>,
        outcome: Outcome,
    ) {
        let entry = ReportEntry {
            kind,
            subject: subject.into(),
            target,
            outcome,
        };
        match &entry.outcome {
            Outcome::Applied => self.log.info(&entry.detail()),
            Outcome::AlreadySatisfied => self.log.debug(&entry.detail()),
            Outcome::Skipped { .. } => self.log.warn(&entry.detail()),
            Outcome::Failed { .. } => self.log.error(&entry.detail()),
        }
        self.report.record(entry.kind, entry.subject, entry.target, entry.outcome);
    }

    /// Log a stage header, run `pass`, then log and record its counters.
    fn pass(&mut self, pass: Pass, body: fn(&mut Self)) {
        self.log.stage(&pass.to_string());
        body(self);
        let stats = self.report.stats_for(pass);
        let summary = stats.summary();
        self.log.info(&summary);
        self.log
            .record_pass(&pass.to_string(), stats.status(), Some(&summary));
    }
}

/// Converge the host behind `gateway` to `registry`.
///
/// Runs the identity, directory and privilege passes in that order and
/// returns every step taken.  Never fails: problems are recorded as
/// [`Outcome::Failed`] or [`Outcome::Skipped`] entries.
///
/// # Examples
///
/// ```
/// use provision_cli::engine::{EngineSettings, converge};
/// use provision_cli::gateway::InMemoryGateway;
/// use provision_cli::logging::Logger;
/// use provision_cli::policy::PrivilegedIdentity;
/// use provision_cli::registry::RoleRegistry;
///
/// let registry = RoleRegistry::new(
///     [("Julius".into(), "Legal".into()), ("Bach".into(), "CEO".into())],
///     [("Contract-Documents".to_string(), "Legal".into())],
/// );
/// let settings = EngineSettings {
///     company_root: "/srv/company".into(),
///     privileged: PrivilegedIdentity { employee: "Bach".into(), role: "CEO".into() },
///     admin_role: "System-Administrator".into(),
/// };
/// let gateway = InMemoryGateway::new();
///
/// let report = converge(&settings, &registry, &gateway, &Logger::new("doctest"));
/// assert!(!report.has_failures());
/// assert!(gateway.is_member(&"Bach".into(), &"Legal".into()));
/// ```
pub fn converge(
    settings: &EngineSettings,
    registry: &RoleRegistry,
    gateway: &dyn IdentityGateway,
    log: &dyn Log,
) -> ConvergenceReport {
    let mut run = Run {
        settings,
        registry,
        gateway,
        log,
        report: ConvergenceReport::default(),
    };
    run.pass(Pass::Identity, identity::run);
    run.pass(Pass::Directories, directories::run);
    run.pass(Pass::Privileges, privileges::run);
    run.report
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::EngineSettings;
    use crate::logging::{Log, PassStatus};
    use crate::policy::PrivilegedIdentity;

    /// [`Log`] that keeps every line in memory.
    #[derive(Debug, Default)]
    pub struct RecordingLog {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLog {
        pub fn lines(&self) -> Vec<String> {
            self.lines
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }

        fn push(&self, level: &str, msg: &str) {
            self.lines
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(format!("{level} {msg}"));
        }
    }

    impl Log for RecordingLog {
        fn stage(&self, msg: &str) {
            self.push("stage", msg);
        }
        fn info(&self, msg: &str) {
            self.push("info", msg);
        }
        fn debug(&self, msg: &str) {
            self.push("debug", msg);
        }
        fn warn(&self, msg: &str) {
            self.push("warn", msg);
        }
        fn error(&self, msg: &str) {
            self.push("error", msg);
        }
        fn record_pass(&self, name: &str, status: PassStatus, message: Option<&str>) {
            self.push("pass", &format!("{name} {status:?} {}", message.unwrap_or("")));
        }
    }

    pub fn settings() -> EngineSettings {
        EngineSettings {
            company_root: "/c".into(),
            privileged: PrivilegedIdentity {
                employee: "Bach".into(),
                role: "CEO".into(),
            },
            admin_role: "System-Administrator".into(),
        }
    }
}
