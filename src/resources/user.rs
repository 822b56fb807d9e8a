//! Employee accounts created with `useradd`.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;
use crate::registry::{EmployeeId, RoleId};

/// `useradd` exit code for "username already in use".
const USERADD_EXISTS: i32 = 9;

/// Look up the group names `user` belongs to via `id -nG`.
///
/// Returns `None` when the user does not exist.
///
/// # Errors
///
/// Returns an error if `id` cannot be spawned.
pub fn user_groups(executor: &dyn Executor, user: &EmployeeId) -> Result<Option<Vec<String>>> {
    let result = executor.run_unchecked("id", &["-nG", user.as_str()])?;
    if !result.success {
        return Ok(None);
    }
    Ok(Some(
        result
            .stdout
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    ))
}

/// A host user account for an employee, with a home directory and
/// membership in the employee's role group.
#[derive(Debug)]
pub struct UserResource<'a> {
    /// Account to ensure.
    pub name: EmployeeId,
    /// Role group the account must belong to.
    pub group: RoleId,
    executor: &'a dyn Executor,
}

impl<'a> UserResource<'a> {
    /// Create a new user resource.
    #[must_use]
    pub const fn new(name: EmployeeId, group: RoleId, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            group,
            executor,
        }
    }
}

impl Resource for UserResource<'_> {
    fn description(&self) -> String {
        format!("user {} in group {}", self.name, self.group)
    }

    fn current_state(&self) -> Result<ResourceState> {
        match user_groups(self.executor, &self.name)? {
            None => Ok(ResourceState::Missing),
            Some(groups) if groups.iter().any(|g| g == self.group.as_str()) => {
                Ok(ResourceState::Correct)
            }
            Some(groups) => Ok(ResourceState::Incorrect {
                current: groups.join(","),
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        // An account that exists outside the role group only needs the
        // membership; recreating it would fail with "already exists".
        if let ResourceState::Incorrect { .. } = self.current_state()? {
            let result = self.executor.run_unchecked(
                "usermod",
                &["-aG", self.group.as_str(), self.name.as_str()],
            )?;
            if !result.success {
                return Err(ResourceError::from_exec("usermod", &result).into());
            }
            return Ok(ResourceChange::Applied);
        }

        let result = self.executor.run_unchecked(
            "useradd",
            &["-m", "-G", self.group.as_str(), self.name.as_str()],
        )?;
        if result.success {
            return Ok(ResourceChange::Applied);
        }
        if result.code == Some(USERADD_EXISTS) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        Err(ResourceError::from_exec("useradd", &result).into())
    }
}
