//! Identity pass: role groups and employee users.
use super::{Run, StepKind};

/// Create every employee's role group and user, then the groups of roles
/// that only directories reference.
///
/// Group and user creation are attempted independently: a failed group does
/// not prevent the user request, which reports its own failure.
pub(super) fn run(run: &mut Run<'_>) {
    let registry = run.registry;
    for employee in registry.employees() {
        let outcome = run.gateway.create_group(&employee.role);
        run.record(StepKind::CreateGroup, employee.role.as_str(), None, outcome);

        let outcome = run.gateway.create_user(&employee.name, &employee.role);
        run.record(
            StepKind::CreateUser,
            employee.name.as_str(),
            Some(employee.role.to_string()),
            outcome,
        );
    }

    for role in registry.all_roles() {
        if registry.first_employee_for_role(&role).is_some() {
            continue;
        }
        run.log
            .debug(&format!("no employee holds {role}; creating the group anyway"));
        let outcome = run.gateway.create_group(&role);
        run.record(StepKind::CreateGroup, role.as_str(), None, outcome);
    }
}
