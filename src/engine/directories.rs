//! Directory pass: company directories, their owners and permission tiers.
use std::path::PathBuf;

use serde::Serialize;

use super::{EngineSettings, Run, StepKind};
use crate::gateway::{Outcome, SkipReason, StepFailure};
use crate::policy::{PermissionTier, permission_tier};
use crate::registry::{EmployeeId, RoleId, RoleRegistry};

/// Desired state of one company directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedDirectory {
    /// Declared directory name.
    pub name: String,
    /// Absolute directory path; `None` when the name does not denote a
    /// direct child of the company root.
    pub path: Option<PathBuf>,
    /// First declared employee of the role, if anyone holds it.
    pub owner: Option<EmployeeId>,
    /// Owning group.
    pub group: RoleId,
    /// Permission tier; `None` when there is no owner to decide it for.
    pub tier: Option<PermissionTier>,
}

/// Desired state of every company directory, in declaration order.
#[must_use]
pub fn plan(settings: &EngineSettings, registry: &RoleRegistry) -> Vec<ProvisionedDirectory> {
    registry
        .directory_requirements()
        .iter()
        .map(|requirement| {
            let group = requirement.required_role.clone();
            let owner = registry.first_employee_for_role(&group).cloned();
            let tier = owner
                .as_ref()
                .map(|owner| permission_tier(&group, owner, &settings.privileged));
            ProvisionedDirectory {
                name: requirement.directory_name.clone(),
                path: settings.directory_path(&requirement.directory_name),
                owner,
                group,
                tier,
            }
        })
        .collect()
}

/// Create each required directory, then hand it to the first employee of
/// its role with the policy's permission bits.
///
/// Names that would leave the company root are rejected without touching
/// the host.  Ownership and mode are left alone when the directory could
/// not be created, and skipped with a report entry when nobody holds the
/// role.
pub(super) fn run(run: &mut Run<'_>) {
    for directory in plan(run.settings, run.registry) {
        let Some(path) = &directory.path else {
            let reason = format!(
                "directory name {:?} is not a single path component under {}",
                directory.name,
                run.settings.company_root.display()
            );
            run.record(
                StepKind::CreateDirectory,
                directory.name.clone(),
                None,
                Outcome::failed(StepFailure::InvalidTarget { reason }),
            );
            continue;
        };
        let subject = path.display().to_string();
        let role = &directory.group;

        let created = run.gateway.create_directory(path);
        let usable = !created.is_failure();
        run.record(StepKind::CreateDirectory, subject.clone(), None, created);
        if !usable {
            run.log
                .debug(&format!("not assigning ownership of {subject}: directory unavailable"));
            continue;
        }

        let (Some(owner), Some(tier)) = (&directory.owner, directory.tier) else {
            run.record(
                StepKind::ResolveOwner,
                subject,
                None,
                Outcome::skipped(SkipReason::TargetMissingForOwnership { role: role.clone() }),
            );
            continue;
        };
        let holders = run.registry.employees_by_role(role);
        if holders.len() > 1 {
            let names: Vec<&str> = holders.iter().map(|e| e.as_str()).collect();
            run.log.debug(&format!(
                "{role} is held by {}; {owner} owns {subject}",
                names.join(", ")
            ));
        }

        let outcome = run.gateway.set_ownership(path, owner, role);
        run.record(
            StepKind::SetOwnership,
            subject.clone(),
            Some(format!("{owner}:{role}")),
            outcome,
        );

        let outcome = run.gateway.set_permission_mode(path, tier.mode());
        run.record(
            StepKind::SetPermissionMode,
            subject,
            Some(tier.to_string()),
            outcome,
        );
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::Path;

    use super::super::ConvergenceReport;
    use super::super::test_support::{RecordingLog, settings};
    use super::*;
    use crate::gateway::{InMemoryGateway, Operation};

    fn directories_only(
        registry: &RoleRegistry,
        gateway: &InMemoryGateway,
        log: &RecordingLog,
    ) -> ConvergenceReport {
        let settings = settings();
        let mut state = Run {
            settings: &settings,
            registry,
            gateway,
            log,
            report: ConvergenceReport::default(),
        };
        run(&mut state);
        state.report
    }

    fn host() -> InMemoryGateway {
        InMemoryGateway::new()
            .with_group("Legal")
            .with_group("CEO")
            .with_group("Finance-Manager")
            .with_user("Julius", &["Legal"])
            .with_user("Bach", &["CEO"])
            .with_user("Ogochukwu", &["Finance-Manager"])
            .with_user("Ifeoma", &["Finance-Manager"])
    }

    #[test]
    fn plan_resolves_owner_and_tier() {
        let registry = RoleRegistry::new(
            [("Bach".into(), "CEO".into()), ("Julius".into(), "Legal".into())],
            [
                ("Vision".to_string(), "CEO".into()),
                ("Contract-Documents".to_string(), "Legal".into()),
                ("Marketing-Plans".to_string(), "Marketing".into()),
            ],
        );
        let planned = plan(&settings(), &registry);
        assert_eq!(planned[0].tier, Some(PermissionTier::Elevated));
        assert_eq!(planned[1].owner, Some(EmployeeId::new("Julius")));
        assert_eq!(planned[1].tier, Some(PermissionTier::Standard));
        assert_eq!(planned[2].path, Some(PathBuf::from("/c/Marketing-Plans")));
        assert_eq!(planned[2].owner, None);
        assert_eq!(planned[2].tier, None);
    }

    #[test]
    fn standard_directory_gets_770() {
        let registry = RoleRegistry::new(
            [("Julius".into(), "Legal".into())],
            [("Contract-Documents".to_string(), "Legal".into())],
        );
        let gateway = host();
        directories_only(&registry, &gateway, &RecordingLog::default());

        let dir = gateway.directory(Path::new("/c/Contract-Documents")).unwrap();
        assert_eq!(dir.ownership, Some(("Julius".into(), "Legal".into())));
        assert_eq!(dir.mode, 0o770);
    }

    #[test]
    fn privileged_directory_gets_774() {
        let registry = RoleRegistry::new(
            [("Bach".into(), "CEO".into())],
            [("Vision".to_string(), "CEO".into())],
        );
        let gateway = host();
        let report = directories_only(&registry, &gateway, &RecordingLog::default());

        assert_eq!(gateway.directory(Path::new("/c/Vision")).unwrap().mode, 0o774);
        assert_eq!(report.entries()[2].target.as_deref(), Some("774"));
    }

    #[test]
    fn unheld_role_skips_ownership_once() {
        let registry = RoleRegistry::new(
            [("Julius".into(), "Legal".into())],
            [("Marketing-Plans".to_string(), "Marketing".into())],
        );
        let gateway = host();
        let report = directories_only(&registry, &gateway, &RecordingLog::default());

        let kinds: Vec<StepKind> = report.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StepKind::CreateDirectory, StepKind::ResolveOwner]);
        assert_eq!(
            report.entries()[1].outcome,
            Outcome::skipped(SkipReason::TargetMissingForOwnership {
                role: "Marketing".into()
            })
        );
        let dir = gateway.directory(Path::new("/c/Marketing-Plans")).unwrap();
        assert_eq!(dir.ownership, None);
    }

    #[test]
    fn first_declared_holder_owns_and_duplicates_are_logged() {
        let registry = RoleRegistry::new(
            [
                ("Ogochukwu".into(), "Finance-Manager".into()),
                ("Ifeoma".into(), "Finance-Manager".into()),
            ],
            [("Finance-Budgets".to_string(), "Finance-Manager".into())],
        );
        let gateway = host();
        let log = RecordingLog::default();
        directories_only(&registry, &gateway, &log);

        let dir = gateway.directory(Path::new("/c/Finance-Budgets")).unwrap();
        assert_eq!(
            dir.ownership,
            Some(("Ogochukwu".into(), "Finance-Manager".into()))
        );
        assert!(
            log.lines()
                .iter()
                .any(|l| l.starts_with("debug Finance-Manager is held by Ogochukwu, Ifeoma")),
            "{:?}",
            log.lines()
        );
    }

    #[test]
    fn failed_creation_skips_only_that_directory() {
        let registry = RoleRegistry::new(
            [("Julius".into(), "Legal".into()), ("Bach".into(), "CEO".into())],
            [
                ("Contract-Documents".to_string(), "Legal".into()),
                ("Vision".to_string(), "CEO".into()),
            ],
        );
        let gateway = host().fail_on(
            Operation::CreateDirectory,
            "/c/Contract-Documents",
            StepFailure::PathCreationFailure {
                path: "/c/Contract-Documents".to_string(),
                detail: "Permission denied (os error 13)".to_string(),
            },
        );
        let report = directories_only(&registry, &gateway, &RecordingLog::default());

        assert_eq!(report.entries_for("/c/Contract-Documents").count(), 1);
        assert_eq!(report.entries_for("/c/Vision").count(), 3);
        assert!(gateway.directory(Path::new("/c/Vision")).is_some());
    }

    #[test]
    fn names_outside_the_root_are_rejected() {
        let registry = RoleRegistry::new(
            [("Julius".into(), "Legal".into())],
            [
                ("/etc".to_string(), "Legal".into()),
                ("..".to_string(), "Legal".into()),
                (String::new(), "Legal".into()),
                ("Legal/Sub".to_string(), "Legal".into()),
                ("Contract-Documents".to_string(), "Legal".into()),
            ],
        );
        let gateway = host();
        let report = directories_only(&registry, &gateway, &RecordingLog::default());

        for name in ["/etc", "..", "", "Legal/Sub"] {
            let entries: Vec<_> = report.entries_for(name).collect();
            assert_eq!(entries.len(), 1, "{name:?}");
            assert!(matches!(
                entries[0].outcome,
                Outcome::Failed {
                    error: StepFailure::InvalidTarget { .. }
                }
            ));
        }
        assert!(gateway.directory(Path::new("/etc")).is_none());
        assert!(gateway.directory(Path::new("/")).is_none());
        assert!(gateway.directory(Path::new("/c")).is_none());
        let touched: Vec<String> = gateway.calls().into_iter().map(|c| c.subject).collect();
        assert!(
            touched.iter().all(|s| s == "/c/Contract-Documents"),
            "{touched:?}"
        );
    }
}
