//! Role groups created with `groupadd`.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;
use crate::registry::RoleId;

/// `groupadd` exit code for "group name not unique".
const GROUPADD_EXISTS: i32 = 9;

/// A host group named after a role.
#[derive(Debug)]
pub struct GroupResource<'a> {
    /// Group to ensure.
    pub name: RoleId,
    executor: &'a dyn Executor,
}

impl<'a> GroupResource<'a> {
    /// Create a new group resource.
    #[must_use]
    pub const fn new(name: RoleId, executor: &'a dyn Executor) -> Self {
        Self { name, executor }
    }
}

impl Resource for GroupResource<'_> {
    fn description(&self) -> String {
        format!("group {}", self.name)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked("getent", &["group", self.name.as_str()])?;
        if result.success {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self
            .executor
            .run_unchecked("groupadd", &[self.name.as_str()])?;
        if result.success {
            return Ok(ResourceChange::Applied);
        }
        if result.code == Some(GROUPADD_EXISTS) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        Err(ResourceError::from_exec("groupadd", &result).into())
    }
}
