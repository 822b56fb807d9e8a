//! Host-backed gateway that converges each request as a resource.
use std::path::Path;

use super::{IdentityGateway, Outcome, StepFailure};
use crate::exec::Executor;
use crate::registry::{EmployeeId, RoleId};
use crate::resources::chmod::ChmodResource;
use crate::resources::directory::DirectoryResource;
use crate::resources::group::GroupResource;
use crate::resources::membership::MembershipResource;
use crate::resources::ownership::OwnershipResource;
use crate::resources::user::UserResource;
use crate::resources::{Resource, ResourceChange, ResourceError, ResourceState};

/// [`IdentityGateway`] backed by the host's shadow tools and filesystem.
///
/// Each request is expressed as a [`Resource`]: the current state is checked
/// first, and the change is only applied when the state is missing or
/// incorrect.
#[derive(Debug)]
pub struct SystemGateway<'a> {
    executor: &'a dyn Executor,
}

impl<'a> SystemGateway<'a> {
    /// Create a gateway that runs commands through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

/// Check a resource and apply it if needed, folding every error into an
/// [`Outcome`].
fn converge(resource: &dyn Resource, classify: impl Fn(&anyhow::Error) -> StepFailure) -> Outcome {
    let description = resource.description();
    let state = match resource.current_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::debug!(
                resource = %description,
                error = %format!("{e:#}"),
                "state check failed"
            );
            return Outcome::failed(classify(&e));
        }
    };
    tracing::debug!(resource = %description, ?state, "checked");

    if let ResourceState::Invalid { reason } = state {
        return Outcome::failed(StepFailure::InvalidTarget { reason });
    }
    if !state.needs_change() {
        return Outcome::AlreadySatisfied;
    }
    match resource.apply() {
        Ok(ResourceChange::Applied) => {
            tracing::debug!(resource = %description, "applied");
            Outcome::Applied
        }
        Ok(ResourceChange::AlreadyCorrect) => Outcome::AlreadySatisfied,
        Err(e) => Outcome::failed(classify(&e)),
    }
}

/// Map a command error to a privilege or command failure.
fn command_failure(err: &anyhow::Error) -> StepFailure {
    let detail = format!("{err:#}");
    match err.downcast_ref::<ResourceError>() {
        Some(e) if e.is_privilege_error() => StepFailure::PrivilegeDenied { detail },
        _ => StepFailure::ExternalCommandFailure { detail },
    }
}

impl IdentityGateway for SystemGateway<'_> {
    fn create_group(&self, group: &RoleId) -> Outcome {
        let resource = GroupResource::new(group.clone(), self.executor);
        converge(&resource, command_failure)
    }

    fn create_user(&self, user: &EmployeeId, primary_group: &RoleId) -> Outcome {
        let resource = UserResource::new(user.clone(), primary_group.clone(), self.executor);
        converge(&resource, command_failure)
    }

    fn add_group_member(&self, user: &EmployeeId, group: &RoleId) -> Outcome {
        let resource = MembershipResource::new(user.clone(), group.clone(), self.executor);
        converge(&resource, command_failure)
    }

    fn create_directory(&self, path: &Path) -> Outcome {
        let resource = DirectoryResource::new(path.to_path_buf(), self.executor);
        let display = path.display().to_string();
        let outcome = converge(&resource, |e| StepFailure::PathCreationFailure {
            path: display.clone(),
            detail: format!("{e:#}"),
        });
        // A non-directory in the way is a creation failure, not a bad target.
        match outcome {
            Outcome::Failed {
                error: StepFailure::InvalidTarget { reason },
            } => Outcome::failed(StepFailure::PathCreationFailure {
                path: display,
                detail: reason,
            }),
            other => other,
        }
    }

    fn set_ownership(&self, path: &Path, owner: &EmployeeId, group: &RoleId) -> Outcome {
        let resource = OwnershipResource::new(
            path.to_path_buf(),
            owner.clone(),
            group.clone(),
            self.executor,
        );
        converge(&resource, command_failure)
    }

    fn set_permission_mode(&self, path: &Path, mode: u32) -> Outcome {
        let resource = ChmodResource::new(path.to_path_buf(), mode, self.executor);
        converge(&resource, command_failure)
    }
}
