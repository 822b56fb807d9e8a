//! Permission bits via `chmod`.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;

/// A permission-mode resource for a single path (not recursive).
#[derive(Debug)]
pub struct ChmodResource<'a> {
    /// Target path (absolute).
    pub target: PathBuf,
    /// Permission bits (e.g. `0o770`).
    pub mode: u32,
    executor: &'a dyn Executor,
}

impl<'a> ChmodResource<'a> {
    /// Create a new chmod resource.
    #[must_use]
    pub const fn new(target: PathBuf, mode: u32, executor: &'a dyn Executor) -> Self {
        Self {
            target,
            mode,
            executor,
        }
    }
}

impl Resource for ChmodResource<'_> {
    fn description(&self) -> String {
        format!("{:o} {}", self.mode, self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.target.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("target does not exist: {}", self.target.display()),
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let current_mode = std::fs::metadata(&self.target)
                .with_context(|| format!("reading mode of {}", self.target.display()))?
                .permissions()
                .mode()
                & 0o7777;

            if current_mode == self.mode {
                Ok(ResourceState::Correct)
            } else {
                Ok(ResourceState::Incorrect {
                    current: format!("{current_mode:o}"),
                })
            }
        }

        #[cfg(not(unix))]
        {
            Ok(ResourceState::Invalid {
                reason: "chmod not supported on this platform".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mode = format!("{:o}", self.mode);
        let target = self.target.to_string_lossy();
        let result = self.executor.run_unchecked("chmod", &[&mode, &target])?;
        if !result.success {
            return Err(ResourceError::from_exec("chmod", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::exec::SystemExecutor;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn chmod_resource_description() {
        let executor = MockExecutor::with_responses(vec![]);
        let resource = ChmodResource::new(PathBuf::from("/srv/company/Vision"), 0o774, &executor);
        assert_eq!(resource.description(), "774 /srv/company/Vision");
    }

    #[test]
    fn chmod_resource_invalid_when_target_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::with_responses(vec![]);
        let resource = ChmodResource::new(temp_dir.path().join("nonexistent"), 0o770, &executor);

        let state = resource.current_state().unwrap();
        assert!(matches!(state, ResourceState::Invalid { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn chmod_resource_detects_correct_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("Legal");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o770)).unwrap();

        let executor = MockExecutor::with_responses(vec![]);
        let resource = ChmodResource::new(dir, 0o770, &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn chmod_resource_detects_incorrect_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("Legal");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        let executor = MockExecutor::with_responses(vec![]);
        let resource = ChmodResource::new(dir, 0o770, &executor);
        match resource.current_state().unwrap() {
            ResourceState::Incorrect { current } => assert_eq!(current, "755"),
            other => panic!("Expected Incorrect state, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn chmod_resource_applies_change() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("Legal");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        let resource = ChmodResource::new(dir.clone(), 0o770, &SystemExecutor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);

        let current_mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o7777;
        assert_eq!(current_mode, 0o770);
    }

    #[test]
    fn apply_passes_octal_mode() {
        let executor = MockExecutor::ok("");
        let resource = ChmodResource::new(PathBuf::from("/srv/company/Vision"), 0o774, &executor);
        resource.apply().unwrap();
        assert_eq!(executor.calls(), vec!["chmod 774 /srv/company/Vision"]);
    }
}
