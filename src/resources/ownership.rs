//! Directory owner and group via `chown`.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;
use crate::registry::{EmployeeId, RoleId};

/// `owner:group` ownership of a path.
#[derive(Debug)]
pub struct OwnershipResource<'a> {
    /// Target path (absolute).
    pub target: PathBuf,
    /// Owning user.
    pub owner: EmployeeId,
    /// Owning group.
    pub group: RoleId,
    executor: &'a dyn Executor,
}

impl<'a> OwnershipResource<'a> {
    /// Create a new ownership resource.
    #[must_use]
    pub const fn new(
        target: PathBuf,
        owner: EmployeeId,
        group: RoleId,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            target,
            owner,
            group,
            executor,
        }
    }

    fn owner_group(&self) -> String {
        format!("{}:{}", self.owner, self.group)
    }
}

impl Resource for OwnershipResource<'_> {
    fn description(&self) -> String {
        format!("{} {}", self.owner_group(), self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.target.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("target does not exist: {}", self.target.display()),
            });
        }

        let target = self.target.to_string_lossy();
        let result = self
            .executor
            .run("stat", &["-c", "%U:%G", &target])
            .with_context(|| format!("reading ownership of {target}"))?;
        let current = result.stdout.trim();

        if current == self.owner_group() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: current.to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let target = self.target.to_string_lossy();
        let owner_group = self.owner_group();
        let result = self.executor.run_unchecked("chown", &[&owner_group, &target])?;
        if !result.success {
            return Err(ResourceError::from_exec("chown", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}
