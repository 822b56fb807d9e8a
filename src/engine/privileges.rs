//! Privilege pass: the privileged employee joins the directory role groups.
use super::{Run, StepKind};

/// Add the privileged employee to every role group that owns a directory,
/// except the administrator role.
pub(super) fn run(run: &mut Run<'_>) {
    let registry = run.registry;
    let settings = run.settings;
    let privileged = &settings.privileged.employee;

    for role in registry.directory_roles() {
        if role == &settings.admin_role {
            run.log
                .debug(&format!("not adding {privileged} to administrator group {role}"));
            continue;
        }
        let outcome = run.gateway.add_group_member(privileged, role);
        run.record(
            StepKind::AddGroupMember,
            role.as_str(),
            Some(privileged.to_string()),
            outcome,
        );
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::super::ConvergenceReport;
    use super::super::test_support::{RecordingLog, settings};
    use super::*;
    use crate::gateway::{InMemoryGateway, Outcome, StepFailure};
    use crate::registry::RoleRegistry;

    fn privileges_only(registry: &RoleRegistry, gateway: &InMemoryGateway) -> ConvergenceReport {
        let settings = settings();
        let log = RecordingLog::default();
        let mut state = Run {
            settings: &settings,
            registry,
            gateway,
            log: &log,
            report: ConvergenceReport::default(),
        };
        run(&mut state);
        state.report
    }

    fn registry() -> RoleRegistry {
        RoleRegistry::new(
            [("Bach".into(), "CEO".into())],
            [
                ("Contract-Documents".to_string(), "Legal".into()),
                ("Employee-Data".to_string(), "HR".into()),
                ("Legal-Archive".to_string(), "Legal".into()),
                ("Vision".to_string(), "CEO".into()),
                ("Server-Configuration-Script".to_string(), "System-Administrator".into()),
            ],
        )
    }

    #[test]
    fn joins_each_distinct_role_except_admin() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_group("HR")
            .with_group("CEO")
            .with_group("System-Administrator")
            .with_user("Bach", &["CEO"]);
        let report = privileges_only(&registry(), &gateway);

        let roles: Vec<&str> = report.entries().iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(roles, vec!["Legal", "HR", "CEO"]);
        assert_eq!(report.entries()[2].outcome, Outcome::AlreadySatisfied);
        assert!(gateway.is_member(&"Bach".into(), &"Legal".into()));
        assert!(gateway.is_member(&"Bach".into(), &"HR".into()));
        assert!(!gateway.is_member(&"Bach".into(), &"System-Administrator".into()));
    }

    #[test]
    fn missing_privileged_user_fails_each_membership() {
        let gateway = InMemoryGateway::new()
            .with_group("Legal")
            .with_group("HR")
            .with_group("CEO");
        let report = privileges_only(&registry(), &gateway);

        assert_eq!(report.failures().count(), 3);
        assert!(report.failures().all(|e| matches!(
            e.outcome,
            Outcome::Failed {
                error: StepFailure::InvalidTarget { .. }
            }
        )));
    }
}
