//! Supplementary group membership via `usermod -aG`.
use anyhow::Result;

use super::user::user_groups;
use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;
use crate::registry::{EmployeeId, RoleId};

/// Secondary membership of an existing user in a role group.
#[derive(Debug)]
pub struct MembershipResource<'a> {
    /// Member to ensure.
    pub user: EmployeeId,
    /// Group the user must belong to.
    pub group: RoleId,
    executor: &'a dyn Executor,
}

impl<'a> MembershipResource<'a> {
    /// Create a new membership resource.
    #[must_use]
    pub const fn new(user: EmployeeId, group: RoleId, executor: &'a dyn Executor) -> Self {
        Self {
            user,
            group,
            executor,
        }
    }
}

impl Resource for MembershipResource<'_> {
    fn description(&self) -> String {
        format!("{} member of {}", self.user, self.group)
    }

    fn current_state(&self) -> Result<ResourceState> {
        match user_groups(self.executor, &self.user)? {
            None => Ok(ResourceState::Invalid {
                reason: format!("user {} does not exist", self.user),
            }),
            Some(groups) if groups.iter().any(|g| g == self.group.as_str()) => {
                Ok(ResourceState::Correct)
            }
            Some(groups) => Ok(ResourceState::Incorrect {
                current: groups.join(","),
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_unchecked(
            "usermod",
            &["-aG", self.group.as_str(), self.user.as_str()],
        )?;
        if !result.success {
            return Err(ResourceError::from_exec("usermod", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}
